use axum::{http::StatusCode, response::IntoResponse};
use sqlx::Error as SqlxError;
use std::path::PathBuf;
use thiserror::Error as ThisError;
use tracing::warn;

#[derive(Debug, ThisError)]
pub enum BlogError {
    #[error("failed to read secret {}: {source}", .path.display())]
    Secret {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("database still unreachable after {attempts} readiness attempts")]
    ReadinessTimeout { attempts: u32 },

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BlogError {
    /// Errors worth another readiness attempt. A missing secret will not
    /// appear between two polls, so it short-circuits the loop.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BlogError::DatabaseError(_))
    }
}

/// Clients only ever see a bare 500; the detail stays in the log.
impl IntoResponse for BlogError {
    fn into_response(self) -> axum::response::Response {
        warn!(error = %self, "request failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
