//! Startup error type for the shared layer

use thiserror::Error;

/// Failures raised before the server is able to accept traffic.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_convert() {
        let err: AppError = config::ConfigError::NotFound("database.url".to_string()).into();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("database.url"));
    }
}
