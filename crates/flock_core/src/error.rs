use thiserror::Error;

/// Errors raised while loading or validating a simulation configuration.
///
/// The simulation itself never fails: once a [`crate::SimConfig`] has been
/// accepted, every runtime "failure" is a guard condition or a no-op.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Unsupported config format: {path}")]
    UnsupportedFormat { path: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Whether retrying with a corrected file could succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ConfigError::Io(_) => true,
            ConfigError::Yaml(_) | ConfigError::Json(_) => true,
            ConfigError::Invalid { .. } => true,
            ConfigError::UnsupportedFormat { .. } => true,
            ConfigError::UnknownPreset(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_message() {
        let err = ConfigError::invalid("hunter.max_energy", "must be finite");
        assert_eq!(
            err.to_string(),
            "Invalid value for hunter.max_energy: must be finite"
        );
    }

    #[test]
    fn test_unknown_preset_not_recoverable() {
        assert!(!ConfigError::UnknownPreset("arcade".into()).is_recoverable());
        assert!(ConfigError::invalid("seed", "x").is_recoverable());
    }
}
