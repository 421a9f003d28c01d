//! Config loading, validation, and utility operations.

use super::model::Config;
use crate::error::{Result, TasktmplError};
use crate::naming::DefaultTaskNamer;
use std::path::{Path, PathBuf};

/// Config file picked up from the current directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "tasktmpl.yaml";

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are kept in `extra` for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            TasktmplError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the config for a CLI invocation.
    ///
    /// An explicit path must exist. Otherwise `tasktmpl.yaml` in the current
    /// directory is used when present, and defaults when it is not.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let implicit = PathBuf::from(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            Self::load(implicit)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    ///
    /// Unknown fields in the YAML are kept in `extra` for forward compatibility.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // serde_yaml rejects an empty document; treat it as "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml).map_err(|e| {
            TasktmplError::UserError(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            TasktmplError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `slot_separator` must be non-empty
    /// - `events_log`, when set, must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.slot_separator.is_empty() {
            return Err(TasktmplError::UserError(
                "config validation failed: slot_separator must not be empty".to_string(),
            ));
        }

        if let Some(path) = &self.events_log {
            if path.trim().is_empty() {
                return Err(TasktmplError::UserError(
                    "config validation failed: events_log must not be empty when set (omit it to disable event logging)"
                        .to_string(),
                ));
            }
        }

        Ok(())
    }

    /// The task naming convention configured for this invocation.
    pub fn task_namer(&self) -> DefaultTaskNamer {
        DefaultTaskNamer::with_separator(self.slot_separator.as_str())
    }

    /// Event log location, if event logging is enabled.
    pub fn events_log_path(&self) -> Option<PathBuf> {
        self.events_log.as_ref().map(PathBuf::from)
    }
}
