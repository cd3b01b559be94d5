use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use validator::{Validate, ValidateError};

use crate::util::Sensitive;

#[derive(Debug, Deserialize)]
pub struct Database {
    /// Writable primary database.
    pub primary: DbPoolConfig,
    /// A read-only replica used for lookups that can tolerate a
    /// little staleness; writes never go here.
    pub replica: Option<DbPoolConfig>,
    /// Forces all database connections to be encrypted with TLS
    /// (if possible).
    ///
    /// **Environment variables**:
    /// - `DAGLIG_DB_ENFORCE_TLS`
    #[serde(default = "DbPoolConfig::default_enforce_tls")]
    pub enforce_tls: bool,
    /// How long the server waits for a database connection to be
    /// acknowledged or successfully established.
    ///
    /// **Environment variables**:
    /// - `DAGLIG_DB_TIMEOUT_SECS`
    #[serde(default = "DbPoolConfig::default_pool_timeout_secs")]
    pub timeout_secs: NonZeroU64,
}

impl Validate for Database {
    fn validate(&self) -> Result<(), ValidateError> {
        let mut fields = ValidateError::field_builder();
        if let Err(error) = self.primary.validate() {
            fields.insert("primary", error);
        }
        if let Some(replica) = self.replica.as_ref() {
            if let Err(error) = replica.validate() {
                fields.insert("replica", error);
            }
        }
        fields.build().into_result()
    }
}

/// Configuration for connecting to any Postgres database
#[derive(Debug, Deserialize)]
pub struct DbPoolConfig {
    /// Minimum idle database connections to keep around, so spare
    /// hardware resources are not wasted on the database server.
    ///
    /// **Environment variables**:
    /// - `DAGLIG_DB_PRIMARY_MIN_IDLE`
    /// - `DAGLIG_DB_REPLICA_MIN_IDLE`
    pub min_idle: Option<NonZeroU32>,
    /// Maximum amount of connections in the pool.
    ///
    /// **Environment variables**:
    /// - `DAGLIG_DB_PRIMARY_POOL_SIZE`
    /// - `DAGLIG_DB_REPLICA_POOL_SIZE`
    #[serde(default = "DbPoolConfig::default_pool_size")]
    pub pool_size: NonZeroU32,
    /// Connection URL of the Postgres database.
    ///
    /// **Environment variables**:
    /// - `DAGLIG_DB_PRIMARY_URL` or `DATABASE_URL`
    /// - `DAGLIG_DB_REPLICA_URL`
    pub url: Sensitive<String>,
}

impl Validate for DbPoolConfig {
    fn validate(&self) -> Result<(), ValidateError> {
        let mut fields = ValidateError::field_builder();
        fields.insert("url", {
            let mut error = ValidateError::msg_builder();
            if !validator::extras::validate_url(self.url.as_str()) {
                error.insert("Invalid Postgres connection URL");
            }
            error.build()
        });
        fields.build().into_result()
    }
}

impl DbPoolConfig {
    const DEFAULT_POOL_SIZE: u32 = 5;
    const DEFAULT_POOL_TIMEOUT_SECS: u64 = 5;

    // Required by serde
    const fn default_pool_size() -> NonZeroU32 {
        match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
        }
    }

    const fn default_pool_timeout_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_POOL_TIMEOUT_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_TIMEOUT_SECS is accidentally set to 0"),
        }
    }

    const fn default_enforce_tls() -> bool {
        true
    }
}
