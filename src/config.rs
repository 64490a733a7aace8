//! Runner configuration, read from TOML or JSON.
//!
//! ```toml
//! log_level = "info"
//! color = false
//! demos = ["composite", "visitor"]
//!
//! [memento]
//! snapshots = 4
//!
//! [singleton]
//! threads = 3
//! ```

use std::fs;
use std::path::Path;

use itertools::Itertools;
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::patterns;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    pub log_level: String,
    pub color: bool,
    pub demos: Vec<String>,
    pub memento: MementoConfig,
    pub singleton: SingletonConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MementoConfig {
    /// Backups taken before rolling back.
    pub snapshots: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SingletonConfig {
    /// Threads racing to initialise the instance.
    pub threads: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            log_level: "warn".to_string(),
            color: true,
            demos: patterns::names().map(str::to_string).collect(),
            memento: MementoConfig::default(),
            singleton: SingletonConfig::default(),
        }
    }
}

impl Default for MementoConfig {
    fn default() -> Self {
        MementoConfig { snapshots: 3 }
    }
}

impl Default for SingletonConfig {
    fn default() -> Self {
        SingletonConfig { threads: 2 }
    }
}

impl RunnerConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: RunnerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: RunnerConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file, picking the format from the extension and
    /// falling back to sniffing the content when there is none.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            Some(other) => Err(ConfigError::UnsupportedFormat {
                extension: other.to_string(),
            }),
            None => {
                let trimmed = content.trim_start();
                if trimmed.starts_with('{') {
                    Self::from_json(&content)
                } else {
                    Self::from_toml(&content)
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| {
                ConfigError::invalid_value(
                    "log_level",
                    format!("'{}' is not a log level", self.log_level),
                )
            })?;

        if let Some(name) = self.demos.iter().find(|name| patterns::find(name).is_none()) {
            return Err(ConfigError::UnknownDemo {
                name: name.clone(),
                available: patterns::names().join(", "),
            });
        }

        if self.memento.snapshots == 0 {
            return Err(ConfigError::invalid_value("memento.snapshots", "must be at least 1"));
        }
        if self.singleton.threads == 0 {
            return Err(ConfigError::invalid_value("singleton.threads", "must be at least 1"));
        }
        Ok(())
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Warn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{Builder, NamedTempFile};

    #[test]
    fn test_defaults_are_valid() {
        let config = RunnerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.level_filter(), LevelFilter::Warn);
        assert_eq!(config.demos.len(), patterns::DEMOS.len());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RunnerConfig::from_toml("color = false\n[memento]\nsnapshots = 5\n").unwrap();
        assert!(!config.color);
        assert_eq!(config.memento.snapshots, 5);
        assert_eq!(config.singleton.threads, 2);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_json_config() {
        let config =
            RunnerConfig::from_json(r#"{"log_level": "debug", "demos": ["observer"]}"#).unwrap();
        assert_eq!(config.level_filter(), LevelFilter::Debug);
        assert_eq!(config.demos, vec!["observer".to_string()]);
    }

    #[test]
    fn test_unknown_demo_rejected() {
        let err = RunnerConfig::from_toml("demos = [\"interpreter\"]").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnknownDemo { ref name, .. } if name == "interpreter"
        ));
    }

    #[test]
    fn test_bad_level_rejected() {
        let err = RunnerConfig::from_toml("log_level = \"loud\"").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "log_level"));
    }

    #[test]
    fn test_zero_threads_rejected() {
        let err = RunnerConfig::from_toml("[singleton]\nthreads = 0").unwrap_err();
        assert!(err.to_string().contains("singleton.threads"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RunnerConfig::from_toml("colour = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "TOML", .. }));
    }

    #[test]
    fn test_load_by_extension() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "demos = [\"chain\", \"memento\"]").unwrap();

        let config = RunnerConfig::load(file.path()).unwrap();
        assert_eq!(config.demos, vec!["chain", "memento"]);
    }

    #[test]
    fn test_load_sniffs_json_without_extension() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"color\": false}}").unwrap();

        let config = RunnerConfig::load(file.path()).unwrap();
        assert!(!config.color);
    }

    #[test]
    fn test_load_rejects_other_extensions() {
        let file = Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = RunnerConfig::load(file.path()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnsupportedFormat { ref extension } if extension == "yaml"
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RunnerConfig::load(Path::new("/nonexistent/patterns.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
