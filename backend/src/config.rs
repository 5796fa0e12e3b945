//! Account store configuration loaded via OrthoConfig.
//!
//! Values come from `ACCOUNT_STORE_*` environment variables, a config file, or
//! command-line flags, in OrthoConfig's usual precedence.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::{PoolConfig, WriteDurability};

const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_MIN_IDLE: u32 = 2;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Errors raised when settings cannot form a usable pool configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// No database URL was supplied.
    #[error("ACCOUNT_STORE_DATABASE_URL must be set")]
    MissingDatabaseUrl,
}

/// Connection and durability settings for the PostgreSQL backend.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACCOUNT_STORE")]
pub struct AccountStoreSettings {
    /// PostgreSQL connection URL.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub max_connections: Option<u32>,
    /// Idle connections kept warm.
    pub min_idle: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout_secs: Option<u64>,
    /// Wait for synchronous replicas to apply each write before it succeeds.
    #[ortho_config(default = false)]
    pub replicated_writes: bool,
}

impl AccountStoreSettings {
    /// Configured pool size, falling back to the default.
    pub fn max_connections(&self) -> u32 {
        self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    /// Configured idle floor, falling back to the default.
    pub fn min_idle(&self) -> u32 {
        self.min_idle.unwrap_or(DEFAULT_MIN_IDLE)
    }

    /// Configured checkout timeout, falling back to the default.
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(
            self.connection_timeout_secs
                .unwrap_or(DEFAULT_CONNECTION_TIMEOUT_SECS),
        )
    }

    /// Write acknowledgement level implied by `replicated_writes`.
    pub fn write_durability(&self) -> WriteDurability {
        if self.replicated_writes {
            WriteDurability::Replicated
        } else {
            WriteDurability::Local
        }
    }

    /// Build the pool configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when no URL is set.
    pub fn to_pool_config(&self) -> Result<PoolConfig, SettingsError> {
        let url = self
            .database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)?;

        Ok(PoolConfig::new(url)
            .with_max_size(self.max_connections())
            .with_min_idle(Some(self.min_idle()))
            .with_connection_timeout(self.connection_timeout())
            .with_write_durability(self.write_durability()))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for account store configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "ACCOUNT_STORE_DATABASE_URL",
        "ACCOUNT_STORE_MAX_CONNECTIONS",
        "ACCOUNT_STORE_MIN_IDLE",
        "ACCOUNT_STORE_CONNECTION_TIMEOUT_SECS",
        "ACCOUNT_STORE_REPLICATED_WRITES",
    ];

    fn load_from_empty_args() -> AccountStoreSettings {
        AccountStoreSettings::load_from_iter([OsString::from("account-store")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.max_connections(), 10);
        assert_eq!(settings.min_idle(), 2);
        assert_eq!(settings.connection_timeout(), Duration::from_secs(30));
        assert_eq!(settings.write_durability(), WriteDurability::Local);
        assert_eq!(
            settings.to_pool_config().expect_err("no url"),
            SettingsError::MissingDatabaseUrl
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "ACCOUNT_STORE_DATABASE_URL",
                Some("postgres://db/accounts".to_owned()),
            ),
            ("ACCOUNT_STORE_MAX_CONNECTIONS", Some("4".to_owned())),
            ("ACCOUNT_STORE_MIN_IDLE", Some("1".to_owned())),
            ("ACCOUNT_STORE_CONNECTION_TIMEOUT_SECS", Some("5".to_owned())),
            ("ACCOUNT_STORE_REPLICATED_WRITES", Some("true".to_owned())),
        ]);

        let pool = load_from_empty_args()
            .to_pool_config()
            .expect("url is set");
        assert_eq!(pool.database_url(), "postgres://db/accounts");
        assert_eq!(pool.max_size(), 4);
        assert_eq!(pool.min_idle(), Some(1));
        assert_eq!(pool.connection_timeout(), Duration::from_secs(5));
        assert_eq!(pool.write_durability(), WriteDurability::Replicated);
    }

    #[rstest]
    fn blank_database_url_counts_as_missing() {
        let _guard = lock_env([("ACCOUNT_STORE_DATABASE_URL", Some("  ".to_owned()))]);

        assert_eq!(
            load_from_empty_args().to_pool_config().expect_err("blank url"),
            SettingsError::MissingDatabaseUrl
        );
    }
}
