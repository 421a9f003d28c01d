//! Container specs and the fields of them that may carry templates.
//!
//! Only string fields the orchestrator resolves at dispatch time are
//! templated:
//!
//! - `env` values (the part after the first `=`; keys are left alone)
//! - mount `source` and `target`
//! - `hostname`
//!
//! Everything else, unknown fields included, is passed through untouched.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod expand;
mod io;

pub use expand::{ContainerExpandError, expand_container_spec, expand_task_spec};

/// Kind of a container mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MountType {
    #[default]
    Bind,
    Volume,
    Tmpfs,
}

/// A filesystem mount for a container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Mount {
    #[serde(rename = "type")]
    pub kind: MountType,

    pub source: String,

    pub target: String,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// The container portion of a task's workload definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerSpec {
    pub image: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub hostname: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub dir: String,

    /// `KEY=VALUE` entries.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mounts: Vec<Mount>,

    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Unknown fields preserved for forward compatibility.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}
