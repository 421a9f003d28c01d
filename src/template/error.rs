//! Error types for template parsing, execution and expansion.
//!
//! Positions are byte offsets into the template string.

use thiserror::Error;

/// The template string is not valid in the expression grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unclosed action starting at position {position}")]
    UnclosedAction { position: usize },

    #[error("unclosed comment starting at position {position}")]
    UnclosedComment { position: usize },

    #[error("comment ends before closing delimiter at position {position}")]
    CommentNotClosed { position: usize },

    #[error("unterminated quoted string at position {position}")]
    UnterminatedString { position: usize },

    #[error("invalid escape sequence '\\{found}' at position {position}")]
    InvalidEscape { found: char, position: usize },

    #[error("unexpected {found:?} in action at position {position}")]
    UnexpectedChar { found: char, position: usize },

    #[error("bad number syntax '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },

    #[error("missing value for command at position {position}")]
    MissingValue { position: usize },

    #[error("function \"{name}\" not defined at position {position}")]
    UndefinedFunction { name: String, position: usize },

    #[error("unsupported action keyword \"{keyword}\" at position {position}")]
    UnsupportedKeyword { keyword: String, position: usize },

    #[error("variables are not supported (found \"{name}\" at position {position})")]
    Variable { name: String, position: usize },

    #[error("unclosed left paren at position {position}")]
    UnclosedParen { position: usize },

    #[error("unexpected right paren at position {position}")]
    UnexpectedParen { position: usize },

    #[error("max nesting depth exceeded at position {position}")]
    MaxDepth { position: usize },
}

/// The template parsed, but could not be rendered against the context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecError {
    #[error("can't evaluate field {field} in type {type_name} at position {position}")]
    UnknownField {
        field: String,
        type_name: &'static str,
        position: usize,
    },

    #[error("map has no entry for key \"{key}\" at position {position}")]
    MissingKey { key: String, position: usize },

    #[error("can't give argument to non-function {operand} at position {position}")]
    NotAFunction { operand: String, position: usize },

    #[error("wrong number of args for {func}: want {want}, got {got} at position {position}")]
    ArgCount {
        func: &'static str,
        want: &'static str,
        got: usize,
        position: usize,
    },

    #[error("error calling {func}: {message} at position {position}")]
    BadArgument {
        func: &'static str,
        message: String,
        position: usize,
    },
}

/// Either stage of template processing failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("template execution error: {0}")]
    Execution(#[from] ExecError),
}

/// A failed expansion, carrying the unmodified input.
///
/// Expansion never yields a partial render. Callers that treat a bad template
/// as a soft failure use [`ExpandError::original`] as the value instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{error}")]
pub struct ExpandError {
    #[source]
    error: TemplateError,
    original: String,
}

impl ExpandError {
    pub fn new(error: impl Into<TemplateError>, original: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            original: original.into(),
        }
    }

    /// The underlying parse or execution failure.
    pub fn error(&self) -> &TemplateError {
        &self.error
    }

    /// The input string, exactly as it was passed in.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn into_original(self) -> String {
        self.original
    }

    pub fn is_parse(&self) -> bool {
        matches!(self.error, TemplateError::Parse(_))
    }

    pub fn is_execution(&self) -> bool {
        matches!(self.error, TemplateError::Execution(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_error_keeps_original() {
        let err = ExpandError::new(ParseError::UnclosedAction { position: 0 }, "{{invalid");

        assert!(err.is_parse());
        assert!(!err.is_execution());
        assert_eq!(err.original(), "{{invalid");
        assert_eq!(err.into_original(), "{{invalid");
    }

    #[test]
    fn test_error_display() {
        let err = ExpandError::new(
            ExecError::UnknownField {
                field: "Labels".to_string(),
                type_name: "Task",
                position: 2,
            },
            "{{.Task.Labels}}",
        );
        assert_eq!(
            err.to_string(),
            "template execution error: can't evaluate field Labels in type Task at position 2"
        );

        let err = TemplateError::from(ParseError::UndefinedFunction {
            name: "upper".to_string(),
            position: 2,
        });
        assert_eq!(
            err.to_string(),
            "template parse error: function \"upper\" not defined at position 2"
        );
    }

    #[test]
    fn test_source_is_template_error() {
        use std::error::Error as _;

        let err = ExpandError::new(ParseError::MissingValue { position: 0 }, "{{}}");
        let source = err.source().unwrap();
        assert_eq!(
            source.to_string(),
            "template parse error: missing value for command at position 0"
        );
    }
}
