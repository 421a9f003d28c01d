//! Template expansion over a container spec.

use super::{ContainerSpec, Mount};
use crate::facts::{NodeDescription, Task};
use crate::template::{Context, ExpandError};
use thiserror::Error;

/// A templated field of a container spec failed to expand.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expanding {field} failed: {source}")]
pub struct ContainerExpandError {
    /// Which field failed, e.g. `env "PORT={{.Bad}}"` or `hostname`.
    pub field: String,
    #[source]
    pub source: ExpandError,
}

impl ContainerExpandError {
    fn new(field: impl Into<String>, source: ExpandError) -> Self {
        Self {
            field: field.into(),
            source,
        }
    }
}

/// Expand the templated fields of `spec` against `ctx`.
///
/// The input is not modified. The first failing field aborts expansion.
pub fn expand_container_spec(
    ctx: &Context,
    spec: &ContainerSpec,
) -> Result<ContainerSpec, ContainerExpandError> {
    let mut expanded = spec.clone();

    expanded.env = expand_env(ctx, &spec.env)?;
    expanded.mounts = expand_mounts(ctx, &spec.mounts)?;
    expanded.hostname = ctx
        .expand(&spec.hostname)
        .map_err(|e| ContainerExpandError::new("hostname", e))?;

    Ok(expanded)
}

/// Build the context for `task` and expand `spec` with it.
pub fn expand_task_spec(
    node: Option<&NodeDescription>,
    task: &Task,
    spec: &ContainerSpec,
) -> Result<ContainerSpec, ContainerExpandError> {
    let ctx = Context::build(node, task);
    expand_container_spec(&ctx, spec)
}

/// Only the value side of `KEY=VALUE` is expanded. Entries without `=` are
/// copied as-is.
fn expand_env(ctx: &Context, env: &[String]) -> Result<Vec<String>, ContainerExpandError> {
    env.iter()
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) => ctx
                .expand(value)
                .map(|expanded| format!("{}={}", key, expanded))
                .map_err(|e| ContainerExpandError::new(format!("env {:?}", entry), e)),
            None => Ok(entry.clone()),
        })
        .collect()
}

fn expand_mounts(ctx: &Context, mounts: &[Mount]) -> Result<Vec<Mount>, ContainerExpandError> {
    mounts
        .iter()
        .map(|mount| {
            let mut expanded = mount.clone();
            expanded.source = ctx.expand(&mount.source).map_err(|e| {
                ContainerExpandError::new(format!("mount source {:?}", mount.source), e)
            })?;
            expanded.target = ctx.expand(&mount.target).map_err(|e| {
                ContainerExpandError::new(format!("mount target {:?}", mount.target), e)
            })?;
            Ok(expanded)
        })
        .collect()
}
