use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failure of a checked cast between handle views.
///
/// This is the only error the handle reports. Dereferencing an empty handle
/// panics instead, and a broken share count aborts the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CastError {
    #[error("type mismatch: cannot view a {actual} as {expected}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

impl CastError {
    pub fn type_mismatch(expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch { expected, actual }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {format} config: {message}")]
    Parse { format: &'static str, message: String },

    #[error("unsupported config format '{extension}' (expected .toml or .json)")]
    UnsupportedFormat { extension: String },

    #[error("unknown demo '{name}' (available: {available})")]
    UnknownDemo { name: String, available: String },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse {
            format: "TOML",
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse {
            format: "JSON",
            message: format!("line {}, column {}: {err}", err.line(), err.column()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let err = CastError::type_mismatch("Square", "Circle");
        let display = err.to_string();
        assert!(display.contains("Square"));
        assert!(display.contains("Circle"));
    }

    #[test]
    fn test_unknown_demo_display() {
        let err = ConfigError::UnknownDemo {
            name: "interpreter".to_string(),
            available: "chain, composite".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("'interpreter'"));
        assert!(display.contains("composite"));
    }

    #[test]
    fn test_json_error_keeps_location() {
        let err: ConfigError = serde_json::from_str::<serde_json::Value>("{\n  \"a\": ,\n}")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("line 2"));
    }
}
