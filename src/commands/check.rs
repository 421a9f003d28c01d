//! Implementation of the `tasktmpl check` command.
//!
//! Parses each template without rendering it, so syntax errors can be caught
//! before any task exists.

use super::log_event;
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{Result, TasktmplError};
use crate::events::{Event, EventAction};
use crate::template::{ParseError, Template};
use serde_json::json;

/// Parse each template, returning the failures in argument order.
pub(crate) fn check_templates(templates: &[String]) -> Vec<(&str, ParseError)> {
    templates
        .iter()
        .filter_map(|t| Template::parse(t).err().map(|e| (t.as_str(), e)))
        .collect()
}

/// Execute the `tasktmpl check` command.
pub fn cmd_check(args: CheckArgs, config: &Config) -> Result<()> {
    let failures = check_templates(&args.templates);

    log_event(
        config,
        Event::new(EventAction::Check).with_details(json!({
            "templates": args.templates.len(),
            "failed": failures.len(),
        })),
    );

    if failures.is_empty() {
        println!("{} template(s) OK", args.templates.len());
        return Ok(());
    }

    for (template, err) in &failures {
        eprintln!("'{}': {}", template, err);
    }

    Err(TasktmplError::TemplateError(format!(
        "{} of {} template(s) failed to parse",
        failures.len(),
        args.templates.len()
    )))
}
