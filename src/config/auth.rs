use serde::Deserialize;
use std::num::NonZeroU64;
use validator::{Validate, ValidateError};

use crate::util::Sensitive;

#[derive(Debug, Deserialize)]
pub struct Auth {
    /// Key for the phone lookup digest and the symmetric encryption
    /// of stored codes. Rotating it invalidates every stored phone
    /// digest, which locks all existing accounts out of the lookup.
    /// Rotation requires re-digesting phone numbers out of band.
    ///
    /// **Environment variables**:
    /// - `DAGLIG_AUTH_SECRET_KEY`
    pub secret_key: Sensitive<String>,
    /// Country calling code all phone numbers must carry.
    ///
    /// **Environment variables**:
    /// - `DAGLIG_AUTH_COUNTRY_PREFIX`
    #[serde(default = "Auth::default_country_prefix")]
    pub country_prefix: String,
    /// How long an issued code stays valid.
    ///
    /// **Environment variables**:
    /// - `DAGLIG_AUTH_OTP_TTL_SECS`
    #[serde(default = "Auth::default_otp_ttl_secs")]
    pub otp_ttl_secs: NonZeroU64,
    /// How long a phone number must wait before another code can be
    /// issued for it. The client shows the same value as a countdown,
    /// but this window is the one that counts.
    ///
    /// **Environment variables**:
    /// - `DAGLIG_AUTH_RESEND_COOLDOWN_SECS`
    #[serde(default = "Auth::default_resend_cooldown_secs")]
    pub resend_cooldown_secs: NonZeroU64,
}

impl Validate for Auth {
    fn validate(&self) -> Result<(), ValidateError> {
        let mut fields = ValidateError::field_builder();
        fields.insert("secret_key", {
            let mut error = ValidateError::msg_builder();
            if !validator::extras::validate_length(
                &self.secret_key.as_str(),
                Some(12),
                Some(1024),
                None,
            ) {
                error.insert("Invalid secret key");
            }
            error.build()
        });
        fields.insert("country_prefix", {
            let mut error = ValidateError::msg_builder();
            let digits = self.country_prefix.strip_prefix('+');
            if !digits.is_some_and(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit())) {
                error.insert("Country prefix must look like \"+45\"");
            }
            error.build()
        });
        fields.build().into_result()
    }
}

impl Auth {
    const DEFAULT_OTP_TTL_SECS: u64 = 600;
    const DEFAULT_RESEND_COOLDOWN_SECS: u64 = 5;

    fn default_country_prefix() -> String {
        "+45".to_string()
    }

    // Required by serde
    const fn default_otp_ttl_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_OTP_TTL_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_OTP_TTL_SECS is accidentally set to 0"),
        }
    }

    const fn default_resend_cooldown_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_RESEND_COOLDOWN_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_RESEND_COOLDOWN_SECS is accidentally set to 0"),
        }
    }
}
