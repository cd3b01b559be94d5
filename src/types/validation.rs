use once_cell::sync::Lazy;
use regex::Regex;

/// Verification codes are always this many digits long.
pub const CODE_LENGTH: usize = 6;

// E.164: a plus sign, a non-zero leading digit, at most 15 digits total.
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9][0-9]{1,14}$").expect("compile phone regex"));

/// Strips the separators people type into phone numbers so that the
/// same number always produces the same lookup digest.
pub fn normalize_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

pub fn has_country_prefix(phone: &str, prefix: &str) -> bool {
    phone.starts_with(prefix)
}

pub fn is_valid_code(code: &str) -> bool {
    code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+45 60 55 07 09"), "+4560550709");
        assert_eq!(normalize_phone("+45-6055-0709"), "+4560550709");
        assert_eq!(normalize_phone("(+45)60550709"), "+4560550709");
        assert_eq!(normalize_phone("+4560550709"), "+4560550709");
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("+4560550709"));
        assert!(is_valid_phone("+12025550123"));

        assert!(!is_valid_phone("4560550709"));
        assert!(!is_valid_phone("+0123456"));
        assert!(!is_valid_phone("+45 60 55 07 09"));
        assert!(!is_valid_phone("+456055070912345678"));
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("+"));
    }

    #[test]
    fn test_has_country_prefix() {
        assert!(has_country_prefix("+4560550709", "+45"));
        assert!(!has_country_prefix("+4660550709", "+45"));
    }

    #[test]
    fn test_is_valid_code() {
        assert!(is_valid_code("482913"));
        assert!(is_valid_code("000000"));

        assert!(!is_valid_code("48291"));
        assert!(!is_valid_code("4829131"));
        assert!(!is_valid_code("48291a"));
        assert!(!is_valid_code(""));
    }
}
