//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for the tasktmpl CLI.
///
/// This struct represents the contents of `tasktmpl.yaml`.
/// Unknown fields are kept in `extra` for forward compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether a failed expansion aborts the command or falls back to the
    /// original text.
    #[serde(default)]
    pub on_template_error: OnTemplateError,

    /// Path of the NDJSON event log. Absent disables event logging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_log: Option<String>,

    /// Separator used when deriving task display names (default: ".").
    #[serde(default = "default_slot_separator")]
    pub slot_separator: String,

    /// Keys this version does not know about, written back by `to_yaml`.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            on_template_error: OnTemplateError::default(),
            events_log: None,
            slot_separator: default_slot_separator(),
            extra: BTreeMap::new(),
        }
    }
}
