//! Custom error types for webconsole.

use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for webconsole operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse RON file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Invalid JSON envelope: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid origin (expected http:// or https://): {0}")]
    InvalidOrigin(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

/// Result type alias using our custom Error.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::config::ClientConfig;

    #[test]
    fn test_config_syntax_error_is_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("webconsole.ron");
        std::fs::write(&path, "ClientConfig(origin: ").unwrap();

        let err = ClientConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
        assert!(format!("{}", err).contains("Failed to parse RON file"));
    }

    #[test]
    fn test_error_display_config_not_found() {
        let err = Error::ConfigNotFound(PathBuf::from("/path/to/webconsole.ron"));
        let display = format!("{}", err);
        assert!(display.contains("Config file not found"));
        assert!(display.contains("/path/to/webconsole.ron"));
    }

    #[test]
    fn test_error_display_invalid_origin() {
        let err = Error::InvalidOrigin("ftp://host".to_string());
        let display = format!("{}", err);
        assert!(display.contains("Invalid origin"));
        assert!(display.contains("ftp://host"));
    }

    #[test]
    fn test_json_error_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_unreadable_config_is_io() {
        // The path exists but is a directory, so reading it fails.
        let dir = tempfile::tempdir().unwrap();
        let err = ClientConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(format!("{}", err).starts_with("IO error"));
    }
}
