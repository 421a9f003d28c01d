//! Implementation of the `tasktmpl container` command.
//!
//! Loads a container spec, expands its templated fields against the task's
//! context, and prints the result as YAML.

use super::{describe_failure, load_context, log_event, resolve_policy};
use crate::cli::ContainerArgs;
use crate::config::{Config, OnTemplateError};
use crate::container::{ContainerSpec, expand_container_spec};
use crate::error::{Result, TasktmplError};
use crate::events::{Event, EventAction};
use serde_json::json;

/// Execute the `tasktmpl container` command.
///
/// Under the `fallback` policy a failed expansion prints the spec as it was
/// loaded, unexpanded. `--on-error` overrides the configured policy.
pub fn cmd_container(args: ContainerArgs, config: &Config) -> Result<()> {
    let policy = resolve_policy(args.on_error.as_deref(), config)?;
    let (ctx, task) = load_context(&args.facts, config)?;
    let spec = ContainerSpec::load(&args.spec)?;

    let result = expand_container_spec(&ctx, &spec);

    log_event(
        config,
        Event::new(EventAction::Container)
            .with_task(task.id.as_str())
            .with_details(json!({
                "spec": args.spec.display().to_string(),
                "failed_field": result.as_ref().err().map(|e| e.field.clone()),
                "on_template_error": policy,
            })),
    );

    let output = match result {
        Ok(expanded) => expanded,
        Err(err) => {
            let message = format!("{}: {}", err.field, describe_failure(&err.source));
            if policy == OnTemplateError::Fail {
                return Err(TasktmplError::TemplateError(message));
            }
            eprintln!("Warning: leaving container spec unexpanded, {}", message);
            spec
        }
    };

    print!("{}", output.to_yaml()?);
    Ok(())
}
