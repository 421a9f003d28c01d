//! tasktmpl: scheduling-time template expansion for tasks.
//!
//! When a task is dispatched, a handful of its string fields may reference
//! facts that are only known at that point: the service name, the slot, the
//! node's hostname. This crate builds the [`Context`] holding those facts and
//! expands `{{.Service.Name}}`-style placeholders against it.
//!
//! ```
//! use tasktmpl::{Annotations, Context, Task};
//!
//! let task = Task {
//!     id: "t1".to_string(),
//!     slot: 2,
//!     service_annotations: Annotations {
//!         name: "api".to_string(),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! let ctx = Context::build(None, &task);
//!
//! assert_eq!(ctx.expand("{{.Service.Name}}.{{.Task.Slot}}").unwrap(), "api.2");
//!
//! // On failure the original string travels with the error.
//! let err = ctx.expand("{{.Service.Bogus}}").unwrap_err();
//! assert_eq!(err.original(), "{{.Service.Bogus}}");
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod container;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod facts;
pub mod naming;
pub mod template;

#[cfg(test)]
mod test_support;

pub use container::{ContainerSpec, Mount, MountType, expand_container_spec, expand_task_spec};
pub use facts::{Annotations, NodeDescription, NodePlatform, Task};
pub use naming::{DefaultTaskNamer, TaskNamer};
pub use template::{Context, ExpandError, Template, TemplateError, expand};
