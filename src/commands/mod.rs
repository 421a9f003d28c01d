//! Command implementations for tasktmpl.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the helpers they share: loading facts into a
//! context, resolving the error policy, and recording events.

mod check;
mod container;
mod context;
mod expand;


use crate::cli::{Cli, Command, FactArgs};
use crate::config::{Config, OnTemplateError};
use crate::error::{Result, TasktmplError};
use crate::events::{Event, append_event};
use crate::facts::{NodeDescription, Task};
use crate::template::{Context, ExpandError};

/// Dispatch a command to its implementation.
///
/// Config is resolved once here so every command sees the same settings.
pub fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.config.as_deref())?;

    match cli.command {
        Command::Context(args) => context::cmd_context(args, &config),
        Command::Expand(args) => expand::cmd_expand(args, &config),
        Command::Container(args) => container::cmd_container(args, &config),
        Command::Check(args) => check::cmd_check(args, &config),
    }
}

/// Load the fact files and build the template context.
///
/// Returns the task alongside the context so callers can tag events with it.
pub(crate) fn load_context(facts: &FactArgs, config: &Config) -> Result<(Context, Task)> {
    let task = Task::load(&facts.task)?;
    let node = facts
        .node
        .as_ref()
        .map(NodeDescription::load)
        .transpose()?;

    let ctx = Context::build_with(node.as_ref(), &task, &config.task_namer());
    Ok((ctx, task))
}

/// Pick the error policy: an explicit flag wins over the config.
pub(crate) fn resolve_policy(flag: Option<&str>, config: &Config) -> Result<OnTemplateError> {
    match flag {
        None => Ok(config.on_template_error),
        Some(value) => OnTemplateError::from_str(value).ok_or_else(|| {
            TasktmplError::UserError(format!(
                "invalid error policy '{}'. Expected 'fail' or 'fallback'.",
                value
            ))
        }),
    }
}

/// One-line description of a failed expansion for users.
pub(crate) fn describe_failure(err: &ExpandError) -> String {
    format!("'{}': {}", err.original(), err.error())
}

/// Append an event when event logging is configured.
///
/// Logging problems are reported as warnings and never fail the command.
pub(crate) fn log_event(config: &Config, event: Event) {
    let Some(path) = config.events_log_path() else {
        return;
    };

    if let Err(e) = append_event(&path, &event) {
        eprintln!("Warning: failed to log {} event: {}", event.action, e);
    }
}
