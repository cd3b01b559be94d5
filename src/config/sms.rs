use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Sms {
    /// Which delivery backend to hand generated codes to.
    ///
    /// **Environment variables**:
    /// - `DAGLIG_SMS_PROVIDER`
    #[serde(default)]
    pub provider: SmsProvider,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsProvider {
    /// Writes the code to the log instead of sending anything.
    /// Development and test environments only.
    #[default]
    Log,
}
