use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use validator::{Validate, ValidateError};

use super::ParseError;
use crate::util::{figment::FigmentErrorAttachable, validator::IntoValidatorReport};

#[derive(Debug, Deserialize)]
pub struct Server {
    /// **Environment variables**:
    /// - `DAGLIG_IP`
    #[serde(default = "Server::default_ip")]
    pub ip: IpAddr,
    /// **Environment variables**:
    /// - `DAGLIG_PORT`
    #[serde(default = "Server::default_port")]
    pub port: u16,
    pub db: super::Database,
    pub auth: super::Auth,
    #[serde(default)]
    pub sms: super::Sms,
}

impl Validate for Server {
    fn validate(&self) -> std::result::Result<(), ValidateError> {
        let mut fields = ValidateError::field_builder();
        if let Err(error) = self.db.validate() {
            fields.insert("db", error);
        }
        if let Err(error) = self.auth.validate() {
            fields.insert("auth", error);
        }
        fields.build().into_result()
    }
}

impl Server {
    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();

        let config = Self::figment()
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config
            .validate()
            .into_validator_report()
            .change_context(ParseError)?;

        Ok(config)
    }
}

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "daglig.toml";

    const fn default_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    const fn default_port() -> u16 {
        3000
    }

    /// Creates the default [`figment::Figment`] object used to load
    /// server configuration. Split out of [`Server::load`] for tests.
    pub(crate) fn figment() -> figment::Figment {
        use figment::{
            providers::{Env, Format, Toml},
            Figment,
        };

        Figment::new()
            .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
            // Figment's env provider cannot tell a `_` inside a key
            // name from a `_` separating nesting levels, so every key
            // that contains one needs its own mapping.
            .merge(Env::prefixed("DAGLIG_").map(|v| match v.as_str() {
                "DB_PRIMARY_MIN_IDLE" => "db.primary.min_idle".into(),
                "DB_PRIMARY_POOL_SIZE" => "db.primary.pool_size".into(),

                "DB_REPLICA_MIN_IDLE" => "db.replica.min_idle".into(),
                "DB_REPLICA_POOL_SIZE" => "db.replica.pool_size".into(),

                "DB_ENFORCE_TLS" => "db.enforce_tls".into(),
                "DB_TIMEOUT_SECS" => "db.timeout_secs".into(),

                "AUTH_SECRET_KEY" => "auth.secret_key".into(),
                "AUTH_COUNTRY_PREFIX" => "auth.country_prefix".into(),
                "AUTH_OTP_TTL_SECS" => "auth.otp_ttl_secs".into(),
                "AUTH_RESEND_COOLDOWN_SECS" => "auth.resend_cooldown_secs".into(),

                "SMS_PROVIDER" => "sms.provider".into(),

                _ => v.as_str().replace('_', ".").into(),
            }))
            // Environment variable aliases
            .merge(Env::raw().map(|v| match v.as_str() {
                "DATABASE_URL" => "db.primary.url".into(),
                _ => v.into(),
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::num::{NonZeroU32, NonZeroU64};

    #[test]
    fn env_aliases() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "postgres://localhost/daglig");

            jail.set_env("DAGLIG_DB_PRIMARY_MIN_IDLE", "2");
            jail.set_env("DAGLIG_DB_PRIMARY_POOL_SIZE", "12");

            jail.set_env("DAGLIG_DB_REPLICA_URL", "postgres://replica/daglig");
            jail.set_env("DAGLIG_DB_REPLICA_POOL_SIZE", "7");

            jail.set_env("DAGLIG_DB_ENFORCE_TLS", "false");
            jail.set_env("DAGLIG_DB_TIMEOUT_SECS", "30");

            jail.set_env("DAGLIG_AUTH_SECRET_KEY", "correct horse battery staple");
            jail.set_env("DAGLIG_AUTH_COUNTRY_PREFIX", "+46");
            jail.set_env("DAGLIG_AUTH_OTP_TTL_SECS", "120");
            jail.set_env("DAGLIG_AUTH_RESEND_COOLDOWN_SECS", "10");

            let config: Server = Server::figment().extract()?;
            assert_eq!(config.db.primary.url.as_str(), "postgres://localhost/daglig");
            assert_eq!(
                config.db.primary.min_idle,
                Some(NonZeroU32::new(2).unwrap())
            );
            assert_eq!(config.db.primary.pool_size, NonZeroU32::new(12).unwrap());
            assert_eq!(
                config.db.replica.as_ref().unwrap().url.as_str(),
                "postgres://replica/daglig"
            );
            assert_eq!(
                config.db.replica.as_ref().unwrap().pool_size,
                NonZeroU32::new(7).unwrap()
            );

            assert_eq!(config.db.enforce_tls, false);
            assert_eq!(config.db.timeout_secs, NonZeroU64::new(30).unwrap());

            assert_eq!(config.auth.secret_key.as_str(), "correct horse battery staple");
            assert_eq!(config.auth.country_prefix, "+46");
            assert_eq!(config.auth.otp_ttl_secs, NonZeroU64::new(120).unwrap());
            assert_eq!(
                config.auth.resend_cooldown_secs,
                NonZeroU64::new(10).unwrap()
            );

            Ok(())
        });
    }

    #[test]
    fn defaults() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "postgres://localhost/daglig");
            jail.set_env("DAGLIG_AUTH_SECRET_KEY", "correct horse battery staple");

            let config: Server = Server::figment().extract()?;
            assert_eq!(config.port, 3000);
            assert_eq!(config.auth.country_prefix, "+45");
            assert_eq!(config.auth.otp_ttl_secs, NonZeroU64::new(600).unwrap());
            assert_eq!(
                config.auth.resend_cooldown_secs,
                NonZeroU64::new(5).unwrap()
            );
            assert_eq!(config.sms.provider, crate::config::SmsProvider::Log);

            Ok(())
        });
    }
}
