//! Implementation of the `tasktmpl expand` command.
//!
//! Expands each template argument against the task's context and prints the
//! results, one per line, in argument order.

use super::{describe_failure, load_context, log_event, resolve_policy};
use crate::cli::ExpandArgs;
use crate::config::{Config, OnTemplateError};
use crate::error::{Result, TasktmplError};
use crate::events::{Event, EventAction};
use crate::template::{Context, ExpandError};
use serde_json::json;

/// Results of expanding a batch of templates.
#[derive(Debug)]
pub(crate) struct Expansion {
    /// One entry per template; failed templates hold their original text.
    pub lines: Vec<String>,
    pub failures: Vec<ExpandError>,
}

/// Expand every template, keeping going past failures.
pub(crate) fn expand_templates(ctx: &Context, templates: &[String]) -> Expansion {
    let mut lines = Vec::with_capacity(templates.len());
    let mut failures = Vec::new();

    for template in templates {
        match ctx.expand(template) {
            Ok(expanded) => lines.push(expanded),
            Err(err) => {
                lines.push(err.original().to_string());
                failures.push(err);
            }
        }
    }

    Expansion { lines, failures }
}

/// Execute the `tasktmpl expand` command.
///
/// Under the `fail` policy any failed template aborts before anything is
/// printed. Under `fallback` failed templates print as their original text
/// and a warning goes to stderr.
pub fn cmd_expand(args: ExpandArgs, config: &Config) -> Result<()> {
    let policy = resolve_policy(args.on_error.as_deref(), config)?;
    let (ctx, task) = load_context(&args.facts, config)?;

    let expansion = expand_templates(&ctx, &args.templates);

    log_event(
        config,
        Event::new(EventAction::Expand)
            .with_task(task.id.as_str())
            .with_details(json!({
                "templates": args.templates.len(),
                "failed": expansion.failures.len(),
                "on_template_error": policy,
            })),
    );

    if let Some(first) = expansion.failures.first() {
        if policy == OnTemplateError::Fail {
            let mut message = describe_failure(first);
            if expansion.failures.len() > 1 {
                message.push_str(&format!(
                    " (and {} more failed template(s))",
                    expansion.failures.len() - 1
                ));
            }
            return Err(TasktmplError::TemplateError(message));
        }

        for failure in &expansion.failures {
            eprintln!(
                "Warning: using original text for {}",
                describe_failure(failure)
            );
        }
    }

    for line in &expansion.lines {
        println!("{}", line);
    }

    Ok(())
}
