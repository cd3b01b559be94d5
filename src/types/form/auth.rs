use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateError};

use crate::types::id::{marker::SurveyMarker, Id};
use crate::types::validation::{is_valid_code, is_valid_phone, normalize_phone};
use crate::util::Sensitive;

pub mod authorize {
    use super::*;

    /// Body of `POST /auth/authorize`: asks for a fresh code to be
    /// texted to `phone`.
    #[derive(Debug, Deserialize, Serialize)]
    pub struct Request {
        pub phone: Sensitive<String>,
        /// BCP 47-ish tag picked by the language selector; only used
        /// to choose the text message wording.
        pub language: String,
    }

    impl Validate for Request {
        fn validate(&self) -> Result<(), ValidateError> {
            let mut fields = ValidateError::field_builder();
            fields.insert("phone", {
                let mut error = ValidateError::msg_builder();
                if !is_valid_phone(&normalize_phone(self.phone.as_str())) {
                    error.insert("Invalid phone number");
                }
                error.build()
            });
            fields.insert("language", {
                let mut error = ValidateError::msg_builder();
                if self.language.is_empty() || self.language.len() > 32 {
                    error.insert("Invalid language tag");
                }
                error.build()
            });
            fields.build().into_result()
        }
    }
}

pub mod verify {
    use super::*;

    /// Body of `POST /auth/verify`: the credentials plus the two
    /// preference checkboxes.
    #[derive(Debug, Deserialize, Serialize)]
    pub struct Request {
        pub phone: Sensitive<String>,
        pub code: Sensitive<String>,
        pub reminders: bool,
        pub consent: bool,
    }

    impl Validate for Request {
        fn validate(&self) -> Result<(), ValidateError> {
            let mut fields = ValidateError::field_builder();
            fields.insert("phone", {
                let mut error = ValidateError::msg_builder();
                if !is_valid_phone(&normalize_phone(self.phone.as_str())) {
                    error.insert("Invalid phone number");
                }
                error.build()
            });
            fields.insert("code", {
                let mut error = ValidateError::msg_builder();
                if !is_valid_code(self.code.as_str()) {
                    error.insert("Code must be 6 digits");
                }
                error.build()
            });
            fields.build().into_result()
        }
    }

    #[derive(Debug, Deserialize, Serialize)]
    pub struct Response {
        /// The survey the caller is now attached to for today.
        pub id: Id<SurveyMarker>,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn must_fail<T: Validate>(value: &T, args: std::fmt::Arguments<'_>) {
        if value.validate().is_ok() {
            panic!("expected to fail but passed (entry = {args})");
        }
    }

    #[test]
    fn test_authorize_request() {
        let form = authorize::Request {
            phone: "+45 60 55 07 09".to_string().into(),
            language: "da".into(),
        };
        assert!(form.validate().is_ok());

        static INVALID_PHONES: &[&str] = &["", "60550709", "+45", "+45605507a9", "hello"];
        for phone in INVALID_PHONES {
            let form = authorize::Request {
                phone: phone.to_string().into(),
                language: "da".into(),
            };
            must_fail(&form, format_args!("{phone:?}"));
        }

        let form = authorize::Request {
            phone: "+4560550709".to_string().into(),
            language: String::new(),
        };
        must_fail(&form, format_args!("empty language"));
    }

    #[test]
    fn test_verify_request() {
        let form = verify::Request {
            phone: "+4560550709".to_string().into(),
            code: "482913".to_string().into(),
            reminders: true,
            consent: true,
        };
        assert!(form.validate().is_ok());

        static INVALID_CODES: &[&str] = &["", "48291", "4829131", "48x913", "482 13"];
        for code in INVALID_CODES {
            let form = verify::Request {
                phone: "+4560550709".to_string().into(),
                code: code.to_string().into(),
                reminders: false,
                consent: true,
            };
            must_fail(&form, format_args!("{code:?}"));
        }

        // consent is a business rule, not a form rule; the form
        // itself accepts consent = false
        let form = verify::Request {
            phone: "+4560550709".to_string().into(),
            code: "482913".to_string().into(),
            reminders: false,
            consent: false,
        };
        assert!(form.validate().is_ok());
    }
}
