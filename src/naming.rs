//! Display-name conventions for tasks.
//!
//! The context builder does not hard-code how a task's display name is
//! derived. It takes a [`TaskNamer`], so callers (and tests) can swap the
//! convention without touching any global state.

use crate::facts::Task;

/// Default separator between the parts of a generated task name.
pub const DEFAULT_SEPARATOR: &str = ".";

/// Derives a stable display name from a task's identity.
pub trait TaskNamer {
    fn task_name(&self, task: &Task) -> String;
}

impl<F> TaskNamer for F
where
    F: Fn(&Task) -> String,
{
    fn task_name(&self, task: &Task) -> String {
        self(task)
    }
}

/// The orchestrator's naming convention.
///
/// Format: `{service_name}{sep}{slot_or_node_id}{sep}{task_id}`
/// Example: `web.3.t1a2b3`
///
/// A task that carries its own name keeps it verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultTaskNamer {
    separator: String,
}

impl DefaultTaskNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `separator` between name parts instead of `.`.
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }
}

impl Default for DefaultTaskNamer {
    fn default() -> Self {
        Self::with_separator(DEFAULT_SEPARATOR)
    }
}

impl TaskNamer for DefaultTaskNamer {
    fn task_name(&self, task: &Task) -> String {
        if !task.annotations.name.is_empty() {
            return task.annotations.name.clone();
        }

        let slot = task.slot_or_node_id();
        [
            task.service_annotations.name.as_str(),
            slot.as_str(),
            task.id.as_str(),
        ]
        .join(&self.separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replicated_task() -> Task {
        let mut task = Task {
            id: "t1a2b3".to_string(),
            node_id: "node-abc".to_string(),
            slot: 3,
            ..Default::default()
        };
        task.service_annotations.name = "web".to_string();
        task
    }

    #[test]
    fn test_replicated_task_name() {
        let namer = DefaultTaskNamer::new();
        assert_eq!(namer.task_name(&replicated_task()), "web.3.t1a2b3");
    }

    #[test]
    fn test_global_task_uses_node_id() {
        let mut task = replicated_task();
        task.slot = 0;

        let namer = DefaultTaskNamer::new();
        assert_eq!(namer.task_name(&task), "web.node-abc.t1a2b3");
    }

    #[test]
    fn test_explicit_task_name_wins() {
        let mut task = replicated_task();
        task.annotations.name = "custom-name".to_string();

        assert_eq!(DefaultTaskNamer::new().task_name(&task), "custom-name");
    }

    #[test]
    fn test_custom_separator() {
        let namer = DefaultTaskNamer::with_separator("_");
        assert_eq!(namer.separator(), "_");
        assert_eq!(namer.task_name(&replicated_task()), "web_3_t1a2b3");
    }

    #[test]
    fn test_closure_namer() {
        let namer = |t: &Task| format!("task-{}", t.id);
        assert_eq!(namer.task_name(&replicated_task()), "task-t1a2b3");
    }
}
