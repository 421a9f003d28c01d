//! Reading and writing container specs as YAML.

use super::ContainerSpec;
use crate::error::{Result, TasktmplError};
use std::path::Path;

impl ContainerSpec {
    /// Load a container spec from a YAML or JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TasktmplError::UserError(format!(
                "failed to read container spec '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse a container spec from a YAML string.
    ///
    /// Unknown fields are kept so they survive a round trip through
    /// expansion.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(yaml).map_err(|e| {
            TasktmplError::UserError(format!("failed to parse container spec YAML: {}", e))
        })
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            TasktmplError::UserError(format!("failed to serialize container spec: {}", e))
        })
    }
}
