//! Configuration errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid URL pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_pattern_names_pattern() {
        let err = ConfigError::InvalidPattern {
            pattern: "/*".to_string(),
            message: "missing host".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid URL pattern '/*': missing host");
    }

    #[test]
    fn test_toml_error_from() {
        let parse = toml::from_str::<toml::Table>("[[sites]\npattern = 1").unwrap_err();
        let err = ConfigError::from(parse);
        assert!(matches!(err, ConfigError::TomlParse(_)));
        assert!(err.to_string().starts_with("TOML parse error"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::from(io_err);
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }
}
