//! The substitution namespace exposed to templates.
//!
//! A [`Context`] is assembled from a task and, when the scheduler has one, a
//! description of the node the task was assigned to. Its shape is closed:
//!
//! | Path | Source |
//! |------|--------|
//! | `.Service.ID` | `task.service_id` |
//! | `.Service.Name` | `task.service_annotations.name` |
//! | `.Service.Labels` | `task.service_annotations.labels` |
//! | `.Node.ID` | `task.node_id` |
//! | `.Node.Hostname` | `node.hostname` |
//! | `.Node.Platform.Architecture` / `.OS` | `node.platform` |
//! | `.Task.ID` | `task.id` |
//! | `.Task.Name` | naming convention |
//! | `.Task.Slot` | slot number, or the node ID for global tasks |
//!
//! Tasks deliberately expose no labels. Labels belong to the service (and
//! end up on the container), so templates should use `.Service.Labels`.

use super::Template;
use super::error::ExpandError;
use crate::facts::{NodeDescription, Task};
use crate::naming::{DefaultTaskNamer, TaskNamer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Architecture and OS family of a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    #[serde(rename = "Architecture")]
    pub architecture: String,
    #[serde(rename = "OS")]
    pub os: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceContext {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Labels")]
    pub labels: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeContext {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Hostname")]
    pub hostname: String,
    #[serde(rename = "Platform")]
    pub platform: Platform,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskContext {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Slot")]
    pub slot: String,
}

/// Values available to a template, copied out of the scheduling facts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    #[serde(rename = "Service")]
    pub service: ServiceContext,
    #[serde(rename = "Node")]
    pub node: NodeContext,
    #[serde(rename = "Task")]
    pub task: TaskContext,
}

impl Context {
    /// Build a context using the default task naming convention.
    ///
    /// Passing `None` for `node` is normal when the node record is not known
    /// yet; hostname and platform are then left empty.
    pub fn build(node: Option<&NodeDescription>, task: &Task) -> Self {
        Self::build_with(node, task, &DefaultTaskNamer::new())
    }

    /// Build a context, deriving `.Task.Name` with `namer`.
    pub fn build_with(node: Option<&NodeDescription>, task: &Task, namer: &impl TaskNamer) -> Self {
        let mut ctx = Context::default();

        ctx.service.id = task.service_id.clone();
        ctx.service.name = task.service_annotations.name.clone();
        ctx.service.labels = task.service_annotations.labels.clone();

        ctx.node.id = task.node_id.clone();
        if let Some(node) = node {
            ctx.node.hostname = node.hostname.clone();
            ctx.node.platform = Platform {
                architecture: node.platform.architecture.clone(),
                os: node.platform.os.clone(),
            };
        }

        ctx.task.id = task.id.clone();
        ctx.task.name = namer.task_name(task);
        ctx.task.slot = task.slot_or_node_id();

        ctx
    }

    /// Treat `s` as a template and render it with this context.
    ///
    /// On failure the error carries `s` unmodified; nothing partially
    /// rendered is ever returned.
    ///
    /// ```
    /// use tasktmpl::Context;
    ///
    /// let mut ctx = Context::default();
    /// ctx.service.name = "web".to_string();
    /// ctx.task.slot = "3".to_string();
    ///
    /// let out = ctx.expand("{{.Service.Name}}-{{.Task.Slot}}").unwrap();
    /// assert_eq!(out, "web-3");
    ///
    /// let err = ctx.expand("{{invalid").unwrap_err();
    /// assert_eq!(err.original(), "{{invalid");
    /// ```
    pub fn expand(&self, s: &str) -> Result<String, ExpandError> {
        let template = Template::parse(s).map_err(|e| ExpandError::new(e, s))?;
        template.execute(self).map_err(|e| ExpandError::new(e, s))
    }

    /// Like [`Context::expand`], but falls back to `s` on any error.
    pub fn expand_or_original(&self, s: &str) -> String {
        self.expand(s).unwrap_or_else(ExpandError::into_original)
    }
}
