//! Loading scheduling facts from disk.

use super::{NodeDescription, Task};
use crate::error::{Result, TasktmplError};
use serde::de::DeserializeOwned;
use std::path::Path;

impl Task {
    /// Load a task fact from a YAML or JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_fact(path.as_ref(), "task")
    }

    /// Parse a task fact from a YAML or JSON string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        parse_fact(yaml, "task")
    }
}

impl NodeDescription {
    /// Load a node description from a YAML or JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        load_fact(path.as_ref(), "node")
    }

    /// Parse a node description from a YAML or JSON string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        parse_fact(yaml, "node")
    }
}

fn load_fact<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        TasktmplError::UserError(format!(
            "failed to read {} file '{}': {}",
            what,
            path.display(),
            e
        ))
    })?;

    parse_fact(&content, what).map_err(|e| match e {
        TasktmplError::UserError(msg) => {
            TasktmplError::UserError(format!("{} ('{}')", msg, path.display()))
        }
        other => other,
    })
}

fn parse_fact<T: DeserializeOwned>(content: &str, what: &str) -> Result<T> {
    // An empty document is a fact with every field unset.
    let content = if content.trim().is_empty() { "{}" } else { content };

    serde_yaml::from_str(content)
        .map_err(|e| TasktmplError::UserError(format!("failed to parse {} fact: {}", what, e)))
}
