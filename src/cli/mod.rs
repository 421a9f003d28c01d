//! CLI argument parsing for tasktmpl.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// tasktmpl: expand scheduling-time templates for tasks.
///
/// Builds the template context for a task (and, when known, its node) and
/// substitutes `{{.Service.Name}}`-style placeholders in strings or in a
/// container spec.
#[derive(Parser, Debug)]
#[command(name = "tasktmpl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: ./tasktmpl.yaml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands for tasktmpl.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the template context built from task and node facts.
    Context(ContextArgs),

    /// Expand template strings against a task's context.
    ///
    /// Each expanded template is printed on its own line.
    Expand(ExpandArgs),

    /// Expand the templated fields of a container spec.
    ///
    /// Env values, mount sources and targets, and the hostname are expanded;
    /// the result is printed as YAML.
    Container(ContainerArgs),

    /// Check template syntax without rendering.
    Check(CheckArgs),
}

/// Scheduling fact files shared by commands that build a context.
#[derive(Args, Debug)]
pub struct FactArgs {
    /// Task fact file (YAML or JSON).
    #[arg(long)]
    pub task: PathBuf,

    /// Node description file (YAML or JSON). Omit when the node is unknown.
    #[arg(long)]
    pub node: Option<PathBuf>,
}

/// Output format for structured output.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Arguments for the `context` command.
#[derive(Args, Debug)]
pub struct ContextArgs {
    #[command(flatten)]
    pub facts: FactArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

/// Arguments for the `expand` command.
#[derive(Args, Debug)]
pub struct ExpandArgs {
    #[command(flatten)]
    pub facts: FactArgs,

    /// Override the configured error policy (fail, fallback).
    #[arg(long)]
    pub on_error: Option<String>,

    /// Template strings to expand.
    #[arg(required = true)]
    pub templates: Vec<String>,
}

/// Arguments for the `container` command.
#[derive(Args, Debug)]
pub struct ContainerArgs {
    #[command(flatten)]
    pub facts: FactArgs,

    /// Container spec file (YAML or JSON).
    #[arg(long)]
    pub spec: PathBuf,

    /// Override the configured error policy (fail, fallback).
    #[arg(long)]
    pub on_error: Option<String>,
}

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Template strings to check.
    #[arg(required = true)]
    pub templates: Vec<String>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
