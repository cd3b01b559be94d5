use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config;
use crate::types::validation::CODE_LENGTH;

#[derive(Debug, Error)]
#[error("Failed to deliver verification code")]
pub struct SendCodeError;

/// Out-of-band delivery of verification codes.
///
/// The server only cares that a code ends up with the holder of the
/// phone number; how it gets there belongs to the provider behind
/// this trait. Implementations must not log the phone number.
#[async_trait]
pub trait CodeSender: std::fmt::Debug + Send + Sync {
    async fn send_code(
        &self,
        phone: &str,
        code: &str,
        language: &str,
    ) -> error_stack::Result<(), SendCodeError>;
}

/// Generates a fresh numeric verification code.
pub fn generate_code() -> String {
    random_string::generate(CODE_LENGTH, "0123456789")
}

/// Writes the code to the log instead of sending it anywhere, so the
/// flow can be exercised without an SMS account.
#[derive(Debug)]
pub struct LogCodeSender;

#[async_trait]
impl CodeSender for LogCodeSender {
    async fn send_code(
        &self,
        _phone: &str,
        code: &str,
        language: &str,
    ) -> error_stack::Result<(), SendCodeError> {
        info!(language, "verification code for <hidden>: {code}");
        Ok(())
    }
}

pub fn from_config(config: &config::Sms) -> Arc<dyn CodeSender> {
    match config.provider {
        config::SmsProvider::Log => Arc::new(LogCodeSender),
    }
}

#[cfg(test)]
mod tests {
    use super::generate_code;

    #[test]
    fn test_generate_code() {
        for _ in 0..64 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
        }
    }
}
