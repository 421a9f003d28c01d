//! Scheduling facts consumed by context construction.
//!
//! These are the shapes the orchestrator hands over when a task is being
//! prepared for dispatch: the task itself (with a snapshot of its service's
//! annotations) and, when known, a description of the node it was assigned to.
//!
//! # File Format
//!
//! Facts are usually loaded from YAML (or JSON) documents:
//!
//! ```text
//! id: t1a2b3
//! service_id: svc9
//! node_id: node-abc
//! slot: 3
//! service_annotations:
//!   name: web
//!   labels:
//!     tier: backend
//! ```
//!
//! Missing fields take their zero values, mirroring how the scheduler leaves
//! fields unset rather than failing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod io;

/// Name and labels attached to an object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    /// Human-readable name.
    pub name: String,

    /// Arbitrary user-set metadata.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// A schedulable unit of work, as seen at spec-preparation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    /// Task identifier.
    pub id: String,

    /// Identifier of the owning service (empty for unowned tasks).
    pub service_id: String,

    /// Node the task is assigned to. This is the intended node and may not
    /// have a live node record yet.
    pub node_id: String,

    /// Replica index; zero for tasks outside a replicated service.
    pub slot: u64,

    /// The task's own annotations. Only the name is consulted, by the
    /// display-name convention.
    pub annotations: Annotations,

    /// Snapshot of the service annotations taken when the task was created
    /// or last updated.
    pub service_annotations: Annotations,
}

/// CPU architecture and OS family reported by a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePlatform {
    pub architecture: String,
    pub os: String,
}

/// What the scheduler knows about a worker node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDescription {
    pub hostname: String,
    pub platform: NodePlatform,
}

impl Task {
    /// Slot discriminator: the slot number when set, otherwise the node ID.
    ///
    /// Global-mode tasks have no slot, so the node they run on is the only
    /// stable way to tell them apart.
    pub fn slot_or_node_id(&self) -> String {
        if self.slot != 0 {
            self.slot.to_string()
        } else {
            self.node_id.clone()
        }
    }
}
