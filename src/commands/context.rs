//! Implementation of the `tasktmpl context` command.
//!
//! Prints the values a template would see for the given facts, using the
//! same names templates use (`Service.Name`, `Node.Hostname`, ...).

use super::{load_context, log_event};
use crate::cli::{ContextArgs, OutputFormat};
use crate::config::Config;
use crate::error::{Result, TasktmplError};
use crate::events::{Event, EventAction};
use crate::template::Context;
use serde_json::json;

/// Serialize a context in the requested format.
pub(crate) fn render_context(ctx: &Context, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(ctx).map_err(|e| {
            TasktmplError::UserError(format!("failed to serialize context to YAML: {}", e))
        }),
        OutputFormat::Json => serde_json::to_string_pretty(ctx).map_err(|e| {
            TasktmplError::UserError(format!("failed to serialize context to JSON: {}", e))
        }),
    }
}

/// Execute the `tasktmpl context` command.
pub fn cmd_context(args: ContextArgs, config: &Config) -> Result<()> {
    let (ctx, task) = load_context(&args.facts, config)?;
    let rendered = render_context(&ctx, args.format)?;

    log_event(
        config,
        Event::new(EventAction::Context)
            .with_task(task.id.as_str())
            .with_details(json!({ "node_known": args.facts.node.is_some() })),
    );

    println!("{}", rendered.trim_end());
    Ok(())
}
