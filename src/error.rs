//! Error types shared by every tokenwatch component

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}")]
    UpstreamStatus { service: &'static str, status: u16 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl TokenwatchError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TokenwatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_status_message() {
        let err = TokenwatchError::UpstreamStatus {
            service: "DexScreener",
            status: 503,
        };
        assert_eq!(err.to_string(), "DexScreener returned HTTP 503");
    }

    #[test]
    fn test_config_error_message() {
        let err = TokenwatchError::config_error("missing filters");
        assert_eq!(err.to_string(), "Configuration error: missing filters");
    }
}
