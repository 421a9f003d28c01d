//! Configuration types and defaults for tasktmpl.

use serde::{Deserialize, Serialize};

/// What the CLI does when a template fails to parse or execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OnTemplateError {
    /// Abort with a template failure exit code (default).
    #[default]
    Fail,
    /// Print the original text, warn on stderr, and keep going.
    Fallback,
}

impl OnTemplateError {
    /// Parse a policy from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fail" => Some(Self::Fail),
            "fallback" => Some(Self::Fallback),
            _ => None,
        }
    }
}

// Default value functions for serde
pub(crate) fn default_slot_separator() -> String {
    crate::naming::DEFAULT_SEPARATOR.to_string()
}
