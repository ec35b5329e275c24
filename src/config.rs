//! Runtime configuration.
//!
//! Layered with figment: built-in defaults, then an optional `config.toml`,
//! then `BLOG_`-prefixed environment variables (`__` separates sections,
//! e.g. `BLOG_DATABASE__HOST=localhost`).

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

use crate::error::BlogError;

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "BLOG_";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub loglevel: String,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub startup: StartupConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            loglevel: "info".to_string(),
            database: DatabaseConfig::default(),
            server: ServerConfig::default(),
            startup: StartupConfig::default(),
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, BlogError> {
        Ok(Self::figment().extract()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub username: String,
    pub password_file: PathBuf,
    pub acquire_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "db".to_string(),
            port: 3306,
            name: "example".to_string(),
            username: "root".to_string(),
            password_file: PathBuf::from("/run/secrets/db-password"),
            acquire_timeout_ms: 30_000,
        }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub row_scan: RowScanPolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            row_scan: RowScanPolicy::default(),
        }
    }
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StartupConfig {
    /// 0 skips the readiness poll entirely.
    pub readiness_attempts: u32,
    pub readiness_interval_ms: u64,
    pub on_readiness_timeout: ReadinessTimeoutPolicy,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            readiness_attempts: 60,
            readiness_interval_ms: 1_000,
            on_readiness_timeout: ReadinessTimeoutPolicy::default(),
        }
    }
}

impl StartupConfig {
    pub fn readiness_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_interval_ms)
    }
}

/// What a row that fails to decode does to a listing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RowScanPolicy {
    /// Drop the row, log it, keep going.
    #[default]
    Skip,
    /// Keep the row's slot as an empty title, so the array length matches
    /// the row count.
    Empty,
    /// Fail the whole listing.
    Abort,
}

/// What startup does once every readiness attempt has failed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessTimeoutPolicy {
    #[default]
    Fail,
    /// Warn and run the schema reset anyway.
    Proceed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_match_the_compose_deployment() {
        let cfg = Config::default();
        assert_eq!(cfg.database.host, "db");
        assert_eq!(cfg.database.port, 3306);
        assert_eq!(cfg.database.name, "example");
        assert_eq!(cfg.database.username, "root");
        assert_eq!(
            cfg.database.password_file,
            PathBuf::from("/run/secrets/db-password")
        );
        assert_eq!(cfg.server.bind_address(), "0.0.0.0:8000");
        assert_eq!(cfg.startup.readiness_attempts, 60);
        assert_eq!(cfg.startup.readiness_interval(), Duration::from_secs(1));
        assert_eq!(cfg.startup.on_readiness_timeout, ReadinessTimeoutPolicy::Fail);
        assert_eq!(cfg.server.row_scan, RowScanPolicy::Skip);
    }

    #[test]
    fn env_overrides_nested_sections() {
        Jail::expect_with(|jail| {
            jail.set_env("BLOG_DATABASE__HOST", "127.0.0.1");
            jail.set_env("BLOG_DATABASE__PORT", "3307");
            jail.set_env("BLOG_SERVER__ROW_SCAN", "abort");
            jail.set_env("BLOG_STARTUP__ON_READINESS_TIMEOUT", "proceed");
            jail.set_env("BLOG_LOGLEVEL", "debug");

            let cfg = Config::load().expect("config should load");
            assert_eq!(cfg.database.host, "127.0.0.1");
            assert_eq!(cfg.database.port, 3307);
            assert_eq!(cfg.database.name, "example");
            assert_eq!(cfg.server.row_scan, RowScanPolicy::Abort);
            assert_eq!(
                cfg.startup.on_readiness_timeout,
                ReadinessTimeoutPolicy::Proceed
            );
            assert_eq!(cfg.loglevel, "debug");
            Ok(())
        });
    }

    #[test]
    fn toml_file_is_layered_under_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                [server]
                port = 9000

                [startup]
                readiness_attempts = 5
                "#,
            )?;
            jail.set_env("BLOG_SERVER__PORT", "9100");

            let cfg = Config::load().expect("config should load");
            assert_eq!(cfg.server.port, 9100);
            assert_eq!(cfg.startup.readiness_attempts, 5);
            assert_eq!(cfg.startup.readiness_interval_ms, 1_000);
            Ok(())
        });
    }

    #[test]
    fn empty_row_scan_policy_is_accepted() {
        Jail::expect_with(|jail| {
            jail.set_env("BLOG_SERVER__ROW_SCAN", "empty");
            let cfg = Config::load().expect("config should load");
            assert_eq!(cfg.server.row_scan, RowScanPolicy::Empty);
            Ok(())
        });
    }

    #[test]
    fn bad_policy_value_is_a_config_error() {
        Jail::expect_with(|jail| {
            jail.set_env("BLOG_SERVER__ROW_SCAN", "sometimes");
            assert!(matches!(Config::load(), Err(BlogError::Config(_))));
            Ok(())
        });
    }
}
