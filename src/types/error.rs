use serde::ser::SerializeMap;
use serde::Serialize;
use validator::ValidateError;

/// Every failure a client can observe, as a closed set of tags.
///
/// Clients match on the `error` field of the response body instead of
/// string-matching free-form messages, so this enum is the whole wire
/// contract for failures.
#[derive(Debug)]
pub enum Error {
    /// Something failed on our side. Carries no detail across the
    /// boundary; the report behind it is logged server-side.
    Internal,
    /// The submitted phone/code pair does not match any stored,
    /// current code. Deliberately covers "never requested", "expired"
    /// and "wrong code" without distinguishing them.
    InvalidCredential,
    /// Code issuance was requested for a phone number we do not know.
    /// Kept generic so the endpoint cannot be used to enumerate
    /// registered numbers.
    UnknownPhone,
    /// The phone number does not carry the supported country prefix.
    WrongCountryCode,
    /// Verification was attempted without the consent box ticked.
    ConsentRequired,
    /// A code was issued recently; another one cannot be requested
    /// until the window passes.
    CooldownActive { retry_after_secs: u64 },
    /// The request body failed validation.
    InvalidFormBody(ValidateError),
}

impl Error {
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::InvalidCredential => "invalid_credential",
            Self::UnknownPhone => "unknown",
            Self::WrongCountryCode => "wrong_country_code",
            Self::ConsentRequired => "consent_required",
            Self::CooldownActive { .. } => "cooldown",
            Self::InvalidFormBody(..) => "invalid_form_body",
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let len = match self {
            Self::CooldownActive { .. } | Self::InvalidFormBody(..) => 2,
            _ => 1,
        };

        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("error", self.tag())?;
        match self {
            Self::CooldownActive { retry_after_secs } => {
                map.serialize_entry("retry_after_secs", retry_after_secs)?;
            }
            Self::InvalidFormBody(fields) => {
                map.serialize_entry("fields", fields)?;
            }
            _ => {}
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_tags() {
        let body = serde_json::to_value(Error::WrongCountryCode).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "wrong_country_code" }));

        let body = serde_json::to_value(Error::InvalidCredential).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "invalid_credential" }));

        let body = serde_json::to_value(Error::UnknownPhone).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "unknown" }));
    }

    #[test]
    fn test_cooldown_carries_remaining_secs() {
        let body = serde_json::to_value(Error::CooldownActive {
            retry_after_secs: 3,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "error": "cooldown", "retry_after_secs": 3 })
        );
    }

    #[test]
    fn test_form_errors_carry_fields() {
        let mut msg = ValidateError::msg_builder();
        msg.insert("Invalid phone number");
        let mut fields = ValidateError::field_builder();
        fields.insert("phone", msg.build());

        let body = serde_json::to_value(Error::InvalidFormBody(fields.build())).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "error": "invalid_form_body",
                "fields": { "phone": { "_errors": ["Invalid phone number"] } },
            })
        );
    }
}
