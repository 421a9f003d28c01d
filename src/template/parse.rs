//! Template parsing.
//!
//! Splits the input into literal text and `{{ ... }}` actions, lexes each
//! action and builds a small tree of pipelines. Only the substitution subset
//! of the double-brace syntax is accepted; control-flow keywords and
//! variables are rejected here so they never reach execution.

use super::error::ParseError;
use super::funcs::Builtin;

const LEFT_DELIM: &str = "{{";
const RIGHT_DELIM: &str = "}}";
const LEFT_COMMENT: &str = "/*";
const RIGHT_COMMENT: &str = "*/";

/// Action keywords of the full template language that are not supported.
const KEYWORDS: &[&str] = &[
    "if", "else", "end", "range", "with", "define", "template", "block", "break", "continue",
    "nil", "true", "false",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Text(String),
    Action(Pipeline),
}

/// Commands separated by `|`; each result feeds the next command's last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pipeline {
    pub position: usize,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Command {
    pub position: usize,
    pub args: Vec<Operand>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Operand {
    /// `.A.B`; an empty path is the bare `.`.
    Field { path: Vec<String>, position: usize },
    String(String),
    Number(i64),
    Function { func: Builtin, position: usize },
    /// `( pipeline )` with an optional field chain, as in `(...).A`.
    Chain {
        pipeline: Box<Pipeline>,
        fields: Vec<String>,
        position: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TokenKind {
    Field(Vec<String>),
    Ident(String),
    String(String),
    Number(i64),
    Pipe,
    LeftParen,
    RightParen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    kind: TokenKind,
    position: usize,
    /// Whitespace separated this token from the previous one.
    spaced: bool,
}

/// Result of scanning one `{{ ... }}` region.
struct Scanned {
    /// `None` for comments.
    tokens: Option<Vec<Token>>,
    /// Offset just past the closing delimiter.
    end: usize,
    trim_right: bool,
}

pub(crate) fn parse(src: &str) -> Result<Vec<Node>, ParseError> {
    let mut nodes = Vec::new();
    let mut start = 0;
    let mut trim_next = false;

    while let Some(found) = src[start..].find(LEFT_DELIM) {
        let open = start + found;
        let mut text = &src[start..open];
        if trim_next {
            text = text.trim_start_matches(is_space);
        }

        let mut body = open + LEFT_DELIM.len();
        if has_left_trim_marker(&src[body..]) {
            text = text.trim_end_matches(is_space);
            // Skip the dash and the single whitespace character after it.
            body += 2;
        }
        push_text(&mut nodes, text);

        let scanned = scan_action(src, open, body)?;
        if let Some(tokens) = scanned.tokens {
            let pipeline = Parser::new(tokens).parse_action(open)?;
            nodes.push(Node::Action(pipeline));
        }
        trim_next = scanned.trim_right;
        start = scanned.end;
    }

    let mut text = &src[start..];
    if trim_next {
        text = text.trim_start_matches(is_space);
    }
    push_text(&mut nodes, text);

    Ok(nodes)
}

fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if !text.is_empty() {
        nodes.push(Node::Text(text.to_string()));
    }
}

fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn has_left_trim_marker(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next() == Some('-') && chars.next().is_some_and(is_space)
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

fn scan_action(src: &str, open: usize, body: usize) -> Result<Scanned, ParseError> {
    if src[body..].starts_with(LEFT_COMMENT) {
        return scan_comment(src, open, body);
    }

    let mut lexer = Lexer { src, pos: body };
    let mut tokens = Vec::new();

    loop {
        let spaced = lexer.skip_space();
        let rest = lexer.rest();

        if rest.is_empty() {
            return Err(ParseError::UnclosedAction { position: open });
        }
        if rest.starts_with(RIGHT_DELIM) {
            return Ok(Scanned {
                tokens: Some(tokens),
                end: lexer.pos + RIGHT_DELIM.len(),
                trim_right: false,
            });
        }
        if spaced && rest.starts_with("-}}") {
            return Ok(Scanned {
                tokens: Some(tokens),
                end: lexer.pos + 3,
                trim_right: true,
            });
        }

        let position = lexer.pos;
        let kind = lexer.next_token()?;
        tokens.push(Token {
            kind,
            position,
            spaced,
        });
    }
}

fn scan_comment(src: &str, open: usize, body: usize) -> Result<Scanned, ParseError> {
    let content = body + LEFT_COMMENT.len();
    let close = src[content..]
        .find(RIGHT_COMMENT)
        .map(|i| content + i + RIGHT_COMMENT.len())
        .ok_or(ParseError::UnclosedComment { position: open })?;

    let rest = &src[close..];
    if rest.starts_with(RIGHT_DELIM) {
        return Ok(Scanned {
            tokens: None,
            end: close + RIGHT_DELIM.len(),
            trim_right: false,
        });
    }

    let mut chars = rest.chars();
    if chars.next().is_some_and(is_space) && chars.as_str().starts_with("-}}") {
        return Ok(Scanned {
            tokens: None,
            end: close + 4,
            trim_right: true,
        });
    }

    Err(ParseError::CommentNotClosed { position: close })
}

struct Lexer<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Lexer<'s> {
    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Returns whether any whitespace was skipped.
    fn skip_space(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(is_space) {
            self.bump();
        }
        self.pos > start
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'s str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn next_token(&mut self) -> Result<TokenKind, ParseError> {
        let position = self.pos;
        let Some(c) = self.peek() else {
            return Err(ParseError::UnclosedAction { position });
        };

        match c {
            '|' => {
                self.bump();
                Ok(TokenKind::Pipe)
            }
            '(' => {
                self.bump();
                Ok(TokenKind::LeftParen)
            }
            ')' => {
                self.bump();
                Ok(TokenKind::RightParen)
            }
            '"' => self.lex_quoted(),
            '`' => self.lex_raw(),
            '.' => match self.peek_second() {
                Some(d) if d.is_ascii_digit() => self.lex_number(),
                _ => Ok(TokenKind::Field(self.lex_field_chain())),
            },
            '$' => {
                self.bump();
                let name = self.take_while(is_ident_char);
                Err(ParseError::Variable {
                    name: format!("${}", name),
                    position,
                })
            }
            '-' | '+' if self.peek_second().is_some_and(|d| d.is_ascii_digit()) => {
                self.lex_number()
            }
            c if c.is_ascii_digit() => self.lex_number(),
            c if is_ident_start(c) => Ok(TokenKind::Ident(self.take_while(is_ident_char).to_string())),
            found => Err(ParseError::UnexpectedChar { found, position }),
        }
    }

    /// Lexes `.A.B.C`; a lone `.` yields an empty path.
    fn lex_field_chain(&mut self) -> Vec<String> {
        let mut path = Vec::new();
        while self.peek() == Some('.') && self.peek_second().is_some_and(is_ident_start) {
            self.bump();
            path.push(self.take_while(is_ident_char).to_string());
        }
        if path.is_empty() {
            self.bump();
        }
        path
    }

    fn lex_number(&mut self) -> Result<TokenKind, ParseError> {
        let position = self.pos;
        let mut text = String::new();
        if let Some(sign @ ('-' | '+')) = self.peek() {
            self.bump();
            text.push(sign);
        }
        text.push_str(self.take_while(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_'));

        text.replace('_', "")
            .parse::<i64>()
            .map(TokenKind::Number)
            .map_err(|_| ParseError::InvalidNumber { text, position })
    }

    fn lex_quoted(&mut self) -> Result<TokenKind, ParseError> {
        let position = self.pos;
        self.bump();
        let mut value = String::new();

        loop {
            match self.bump() {
                Some('"') => return Ok(TokenKind::String(value)),
                Some('\\') => {
                    let escape_pos = self.pos - 1;
                    match self.bump() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some('r') => value.push('\r'),
                        Some('0') => value.push('\0'),
                        Some(c @ ('\\' | '"' | '\'')) => value.push(c),
                        Some(found) => {
                            return Err(ParseError::InvalidEscape {
                                found,
                                position: escape_pos,
                            });
                        }
                        None => return Err(ParseError::UnterminatedString { position }),
                    }
                }
                Some('\n') | None => return Err(ParseError::UnterminatedString { position }),
                Some(c) => value.push(c),
            }
        }
    }

    fn lex_raw(&mut self) -> Result<TokenKind, ParseError> {
        let position = self.pos;
        self.bump();
        let value = self.take_while(|c| c != '`').to_string();
        match self.bump() {
            Some('`') => Ok(TokenKind::String(value)),
            _ => Err(ParseError::UnterminatedString { position }),
        }
    }
}

/// Deepest parenthesized pipeline nesting a template may use.
const MAX_DEPTH: usize = 100;

struct Parser {
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            index: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }

    fn parse_action(mut self, open: usize) -> Result<Pipeline, ParseError> {
        let pipeline = self.parse_pipeline(open)?;
        match self.peek() {
            None => Ok(pipeline),
            Some(token) => Err(ParseError::UnexpectedParen {
                position: token.position,
            }),
        }
    }

    fn parse_pipeline(&mut self, position: usize) -> Result<Pipeline, ParseError> {
        let mut commands = vec![self.parse_command(position)?];
        while let Some(Token {
            kind: TokenKind::Pipe,
            position: pipe,
            ..
        }) = self.peek().cloned()
        {
            self.index += 1;
            commands.push(self.parse_command(pipe)?);
        }
        Ok(Pipeline { position, commands })
    }

    fn parse_command(&mut self, position: usize) -> Result<Command, ParseError> {
        let start = self.peek().map_or(position, |t| t.position);
        let mut args = Vec::new();

        while let Some(token) = self.peek() {
            if matches!(token.kind, TokenKind::Pipe | TokenKind::RightParen) {
                break;
            }
            args.push(self.parse_operand()?);
        }

        if args.is_empty() {
            return Err(ParseError::MissingValue { position });
        }
        Ok(Command {
            position: start,
            args,
        })
    }

    fn parse_operand(&mut self) -> Result<Operand, ParseError> {
        let Some(token) = self.next() else {
            return Err(ParseError::MissingValue { position: 0 });
        };
        let position = token.position;

        match token.kind {
            TokenKind::Field(path) => Ok(Operand::Field { path, position }),
            TokenKind::String(value) => Ok(Operand::String(value)),
            TokenKind::Number(n) => Ok(Operand::Number(n)),
            TokenKind::Ident(name) => {
                if KEYWORDS.contains(&name.as_str()) {
                    return Err(ParseError::UnsupportedKeyword {
                        keyword: name,
                        position,
                    });
                }
                Builtin::lookup(&name)
                    .map(|func| Operand::Function { func, position })
                    .ok_or(ParseError::UndefinedFunction { name, position })
            }
            TokenKind::LeftParen => {
                // Execution recurses the same way, so this also bounds eval.
                if self.depth >= MAX_DEPTH {
                    return Err(ParseError::MaxDepth { position });
                }
                self.depth += 1;
                let pipeline = self.parse_pipeline(position);
                self.depth -= 1;
                let pipeline = pipeline?;
                match self.next() {
                    Some(Token {
                        kind: TokenKind::RightParen,
                        ..
                    }) => {}
                    _ => return Err(ParseError::UnclosedParen { position }),
                }

                // A field chain glued to the closing paren applies to its result.
                let mut fields = Vec::new();
                if let Some(Token {
                    kind: TokenKind::Field(path),
                    spaced: false,
                    ..
                }) = self.peek()
                {
                    if !path.is_empty() {
                        fields = path.clone();
                        self.index += 1;
                    }
                }

                Ok(Operand::Chain {
                    pipeline: Box::new(pipeline),
                    fields,
                    position,
                })
            }
            TokenKind::Pipe => Err(ParseError::MissingValue { position }),
            TokenKind::RightParen => Err(ParseError::UnexpectedParen { position }),
        }
    }
}
