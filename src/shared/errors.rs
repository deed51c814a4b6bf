//! Error handling for the application

use thiserror::Error;

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Extraction error: {0}")]
    ExtractionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Persistence error: {0}")]
    PersistenceError(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::NetworkError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::PersistenceError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::PersistenceError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_maps_to_persistence() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert!(matches!(err, AppError::PersistenceError(_)));
        assert_eq!(err.to_string(), "Persistence error: denied");
    }

    #[test]
    fn test_config_error_message() {
        let err = AppError::ConfigError("SUPABASE_URL is not set".to_string());
        assert_eq!(err.to_string(), "Configuration error: SUPABASE_URL is not set");
    }
}
