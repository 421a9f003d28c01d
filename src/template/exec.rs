//! Template execution against a [`Context`].
//!
//! Field lookups go through an explicit table of accessors in
//! [`Value::field`]. Nothing outside that table is reachable from a
//! template.

use super::context::{Context, NodeContext, Platform, ServiceContext, TaskContext};
use super::error::ExecError;
use super::parse::{Command, Node, Operand, Pipeline};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// A value produced while evaluating a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Value<'a> {
    Str(Cow<'a, str>),
    Int(i64),
    Labels(&'a BTreeMap<String, String>),
    Platform(&'a Platform),
    Service(&'a ServiceContext),
    Node(&'a NodeContext),
    Task(&'a TaskContext),
    Context(&'a Context),
}

impl<'a> Value<'a> {
    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Int(_) => "int",
            Value::Labels(_) => "map[string]string",
            Value::Platform(_) => "Platform",
            Value::Service(_) => "Service",
            Value::Node(_) => "Node",
            Value::Task(_) => "Task",
            Value::Context(_) => "Context",
        }
    }

    pub(crate) fn is_string(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    /// Resolve one path segment.
    fn field(self, name: &str, position: usize) -> Result<Value<'a>, ExecError> {
        let text = |s: &'a String| -> Result<Value<'a>, ExecError> {
            Ok(Value::Str(Cow::Borrowed(s.as_str())))
        };

        match (self, name) {
            (Value::Context(c), "Service") => Ok(Value::Service(&c.service)),
            (Value::Context(c), "Node") => Ok(Value::Node(&c.node)),
            (Value::Context(c), "Task") => Ok(Value::Task(&c.task)),

            (Value::Service(s), "ID") => text(&s.id),
            (Value::Service(s), "Name") => text(&s.name),
            (Value::Service(s), "Labels") => Ok(Value::Labels(&s.labels)),

            (Value::Node(n), "ID") => text(&n.id),
            (Value::Node(n), "Hostname") => text(&n.hostname),
            (Value::Node(n), "Platform") => Ok(Value::Platform(&n.platform)),

            (Value::Platform(p), "Architecture") => text(&p.architecture),
            (Value::Platform(p), "OS") => text(&p.os),

            (Value::Task(t), "ID") => text(&t.id),
            (Value::Task(t), "Name") => text(&t.name),
            (Value::Task(t), "Slot") => text(&t.slot),

            (Value::Labels(labels), key) => match labels.get(key) {
                Some(v) => text(v),
                None => Err(ExecError::MissingKey {
                    key: key.to_string(),
                    position,
                }),
            },

            (other, field) => Err(ExecError::UnknownField {
                field: field.to_string(),
                type_name: other.type_name(),
                position,
            }),
        }
    }

    fn fields(mut self, path: &[String], position: usize) -> Result<Value<'a>, ExecError> {
        for name in path {
            self = self.field(name, position)?;
        }
        Ok(self)
    }
}

/// Structured values render the way the double-brace language prints them:
/// `{amd64 linux}` for records, `map[k:v]` for label maps.
impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::Labels(labels) => write_labels(f, labels),
            Value::Platform(p) => write!(f, "{{{} {}}}", p.architecture, p.os),
            Value::Service(s) => {
                write!(f, "{{{} {} ", s.id, s.name)?;
                write_labels(f, &s.labels)?;
                f.write_str("}")
            }
            Value::Node(n) => write!(
                f,
                "{{{} {} {}}}",
                n.id,
                n.hostname,
                Value::Platform(&n.platform)
            ),
            Value::Task(t) => write!(f, "{{{} {} {}}}", t.id, t.name, t.slot),
            Value::Context(c) => write!(
                f,
                "{{{} {} {}}}",
                Value::Service(&c.service),
                Value::Node(&c.node),
                Value::Task(&c.task)
            ),
        }
    }
}

fn write_labels(f: &mut fmt::Formatter<'_>, labels: &BTreeMap<String, String>) -> fmt::Result {
    f.write_str("map[")?;
    for (i, (k, v)) in labels.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}:{}", k, v)?;
    }
    f.write_str("]")
}

/// Render parsed nodes into a fresh buffer.
pub(crate) fn execute(nodes: &[Node], ctx: &Context) -> Result<String, ExecError> {
    let mut out = String::new();

    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Action(pipeline) => {
                let value = eval_pipeline(ctx, pipeline)?;
                out.push_str(&value.to_string());
            }
        }
    }

    Ok(out)
}

fn eval_pipeline<'a>(ctx: &'a Context, pipeline: &Pipeline) -> Result<Value<'a>, ExecError> {
    let mut piped = None;
    for command in &pipeline.commands {
        piped = Some(eval_command(ctx, command, piped.take())?);
    }

    // The parser never produces an empty pipeline.
    piped.ok_or(ExecError::NotAFunction {
        operand: String::new(),
        position: pipeline.position,
    })
}

fn eval_command<'a>(
    ctx: &'a Context,
    command: &Command,
    piped: Option<Value<'a>>,
) -> Result<Value<'a>, ExecError> {
    let (first, rest) = command
        .args
        .split_first()
        .ok_or(ExecError::NotAFunction {
            operand: String::new(),
            position: command.position,
        })?;

    if let Operand::Function { func, position } = first {
        let mut args = rest
            .iter()
            .map(|arg| eval_operand(ctx, arg))
            .collect::<Result<Vec<_>, _>>()?;
        args.extend(piped);
        return func.call(args, *position);
    }

    if !rest.is_empty() || piped.is_some() {
        return Err(ExecError::NotAFunction {
            operand: describe(first),
            position: command.position,
        });
    }

    eval_operand(ctx, first)
}

fn eval_operand<'a>(ctx: &'a Context, operand: &Operand) -> Result<Value<'a>, ExecError> {
    match operand {
        Operand::Field { path, position } => Value::Context(ctx).fields(path, *position),
        Operand::String(s) => Ok(Value::Str(Cow::Owned(s.clone()))),
        Operand::Number(n) => Ok(Value::Int(*n)),
        Operand::Function { func, position } => func.call(Vec::new(), *position),
        Operand::Chain {
            pipeline,
            fields,
            position,
        } => eval_pipeline(ctx, pipeline)?.fields(fields, *position),
    }
}

fn describe(operand: &Operand) -> String {
    match operand {
        Operand::Field { path, .. } if path.is_empty() => ".".to_string(),
        Operand::Field { path, .. } => format!(".{}", path.join(".")),
        Operand::String(s) => format!("{:?}", s),
        Operand::Number(n) => n.to_string(),
        Operand::Function { func, .. } => func.name().to_string(),
        Operand::Chain { fields, .. } if fields.is_empty() => "(...)".to_string(),
        Operand::Chain { fields, .. } => format!("(...).{}", fields.join(".")),
    }
}
