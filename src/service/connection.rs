use crate::config::DatabaseConfig;
use crate::db::mysql::PostsStorage;
use crate::error::BlogError;
use crate::service::credential_loader::load_secret;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use std::time::Duration;

/// Builds MySQL handles from the database section of the config.
///
/// The password is re-read from the secret file on every call, so a
/// rotated secret is picked up by the next request.
#[derive(Debug, Clone)]
pub struct ConnectionFactory {
    cfg: DatabaseConfig,
}

impl ConnectionFactory {
    pub fn new(cfg: DatabaseConfig) -> Self {
        Self { cfg }
    }

    pub fn connect_options(&self) -> Result<MySqlConnectOptions, BlogError> {
        let password = load_secret(&self.cfg.password_file)?;
        Ok(MySqlConnectOptions::new()
            .host(&self.cfg.host)
            .port(self.cfg.port)
            .username(&self.cfg.username)
            .password(&password)
            .database(&self.cfg.name))
    }

    /// A lazily connecting pool; nothing touches the network until the
    /// first query or acquire.
    pub fn connect(&self) -> Result<PostsStorage, BlogError> {
        self.connect_with_acquire_timeout(self.cfg.acquire_timeout())
    }

    /// Same as [`connect`](Self::connect) with a caller-chosen acquire timeout.
    pub fn connect_with_acquire_timeout(
        &self,
        acquire_timeout: Duration,
    ) -> Result<PostsStorage, BlogError> {
        let opts = self.connect_options()?;
        let pool = MySqlPoolOptions::new()
            .acquire_timeout(acquire_timeout)
            .connect_lazy_with(opts);
        Ok(PostsStorage::new(pool))
    }
}
