use thiserror::Error;

/// Errors raised while loading or validating tuning data.
///
/// The per-tick decision path never returns these; only configuration and
/// trick catalog loading is fallible.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported config format: {path}")]
    UnsupportedFormat { path: String },

    #[error("Invalid {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { field: field.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_message() {
        let err = ConfigError::invalid("aerial.min_boost", "must be non-negative");
        assert_eq!(err.to_string(), "Invalid aerial.min_boost: must be non-negative");
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<u32, _> = serde_json::from_str("not json");
        let err: ConfigError = parse.unwrap_err().into();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
