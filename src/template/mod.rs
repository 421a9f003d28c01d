//! Scheduling-time template expansion.
//!
//! This module provides:
//!
//! - **Context**: the closed set of values a template may reference
//! - **Template**: parsing and execution of the placeholder grammar
//! - **expand**: parse-and-render in one call, returning the original text
//!   alongside any error
//!
//! # Template Syntax
//!
//! Placeholders use double braces and dotted paths:
//!
//! ```text
//! svc={{.Service.Name}} host={{.Node.Hostname}} slot={{.Task.Slot}}
//! tier={{index .Service.Labels "tier"}}
//! {{join "-" .Service.Name .Task.Slot}}
//! {{.Task.ID | printf "task-%s"}}
//! ```
//!
//! `{{- ` and ` -}}` trim surrounding whitespace and `{{/* ... */}}` is a
//! comment. Available functions are `index`, `len`, `print`, `printf`,
//! `println` and `join`. Control flow (`if`, `range`, `with`, ...) and
//! variables are not supported. Parenthesized pipelines nest at most 100
//! deep.
//!
//! Literals are narrower than Go's: numbers are decimal integers only (no
//! `0x1F`, `1e3` or `'a'`), and quoted strings accept only the `\"`, `\'`,
//! `\\`, `\n`, `\r`, `\t` and `\0` escapes. `printf` understands
//! `%s %v %d %q %%` with the `-+# 0` flags, width and precision; any other
//! verb is an error.

mod context;
mod error;
mod exec;
mod funcs;
mod parse;

#[cfg(test)]
mod tests;

pub use context::{Context, NodeContext, Platform, ServiceContext, TaskContext};
pub use error::{ExecError, ExpandError, ParseError, TemplateError};

use parse::Node;

/// A parsed template, ready to be executed against any number of contexts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parse `src` in the placeholder grammar.
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        Ok(Self {
            nodes: parse::parse(src)?,
        })
    }

    /// Render the template with values from `ctx`.
    pub fn execute(&self, ctx: &Context) -> Result<String, ExecError> {
        exec::execute(&self.nodes, ctx)
    }

    /// Whether the template contains any actions.
    pub fn has_actions(&self) -> bool {
        self.nodes.iter().any(|n| matches!(n, Node::Action(_)))
    }
}

/// Expand `s` against `ctx`. See [`Context::expand`].
pub fn expand(ctx: &Context, s: &str) -> Result<String, ExpandError> {
    ctx.expand(s)
}
