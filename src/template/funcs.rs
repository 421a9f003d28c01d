//! Built-in template functions.
//!
//! The set is fixed: the text-producing built-ins of the double-brace
//! language plus `join`. There is no way to register more.

use super::error::ExecError;
use super::exec::Value;
use std::borrow::Cow;
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Index,
    Join,
    Len,
    Print,
    Printf,
    Println,
}

impl Builtin {
    pub(crate) fn lookup(name: &str) -> Option<Self> {
        match name {
            "index" => Some(Self::Index),
            "join" => Some(Self::Join),
            "len" => Some(Self::Len),
            "print" => Some(Self::Print),
            "printf" => Some(Self::Printf),
            "println" => Some(Self::Println),
            _ => None,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Join => "join",
            Self::Len => "len",
            Self::Print => "print",
            Self::Printf => "printf",
            Self::Println => "println",
        }
    }

    pub(crate) fn call<'a>(
        self,
        args: Vec<Value<'a>>,
        position: usize,
    ) -> Result<Value<'a>, ExecError> {
        match self {
            Self::Index => index(args, position),
            Self::Join => join(args, position),
            Self::Len => len(args, position),
            Self::Print => Ok(Value::Str(Cow::Owned(sprint(&args)))),
            Self::Println => Ok(Value::Str(Cow::Owned(sprintln(&args)))),
            Self::Printf => printf(args, position),
        }
    }

    fn bad_argument(self, message: String, position: usize) -> ExecError {
        ExecError::BadArgument {
            func: self.name(),
            message,
            position,
        }
    }
}

/// `index MAP KEY...`: a missing key yields the empty string.
fn index<'a>(args: Vec<Value<'a>>, position: usize) -> Result<Value<'a>, ExecError> {
    let mut args = args.into_iter();
    let Some(mut item) = args.next() else {
        return Err(ExecError::ArgCount {
            func: "index",
            want: "at least 1",
            got: 0,
            position,
        });
    };

    for key in args {
        item = match (item, key) {
            (Value::Labels(labels), Value::Str(key)) => Value::Str(
                labels
                    .get(key.as_ref())
                    .map(|v| Cow::Borrowed(v.as_str()))
                    .unwrap_or_default(),
            ),
            (Value::Labels(_), key) => {
                return Err(Builtin::Index.bad_argument(
                    format!("value has type {}; should be string", key.type_name()),
                    position,
                ));
            }
            (other, _) => {
                return Err(Builtin::Index.bad_argument(
                    format!("can't index item of type {}", other.type_name()),
                    position,
                ));
            }
        };
    }

    Ok(item)
}

/// `join SEP S...`: the separator comes first.
fn join<'a>(args: Vec<Value<'a>>, position: usize) -> Result<Value<'a>, ExecError> {
    if args.is_empty() {
        return Err(ExecError::ArgCount {
            func: "join",
            want: "at least 1",
            got: 0,
            position,
        });
    }

    let mut parts = Vec::with_capacity(args.len());
    for (i, arg) in args.iter().enumerate() {
        match arg {
            Value::Str(s) => parts.push(s.as_ref()),
            other => {
                return Err(Builtin::Join.bad_argument(
                    format!(
                        "argument {} has type {}; should be string",
                        i,
                        other.type_name()
                    ),
                    position,
                ));
            }
        }
    }

    Ok(Value::Str(Cow::Owned(parts[1..].join(parts[0]))))
}

fn len<'a>(args: Vec<Value<'a>>, position: usize) -> Result<Value<'a>, ExecError> {
    if args.len() != 1 {
        return Err(ExecError::ArgCount {
            func: "len",
            want: "1",
            got: args.len(),
            position,
        });
    }

    match &args[0] {
        Value::Str(s) => Ok(Value::Int(s.len() as i64)),
        Value::Labels(labels) => Ok(Value::Int(labels.len() as i64)),
        other => Err(Builtin::Len.bad_argument(
            format!("len of type {}", other.type_name()),
            position,
        )),
    }
}

/// Operands are separated by a space only when neither side is a string.
fn sprint(args: &[Value<'_>]) -> String {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 && !arg.is_string() && !args[i - 1].is_string() {
            out.push(' ');
        }
        out.push_str(&arg.to_string());
    }
    out
}

fn sprintln(args: &[Value<'_>]) -> String {
    let mut out = args
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    out.push('\n');
    out
}

fn printf<'a>(args: Vec<Value<'a>>, position: usize) -> Result<Value<'a>, ExecError> {
    let Some((format, rest)) = args.split_first() else {
        return Err(ExecError::ArgCount {
            func: "printf",
            want: "at least 1",
            got: 0,
            position,
        });
    };

    let Value::Str(format) = format else {
        return Err(Builtin::Printf.bad_argument(
            format!(
                "format has type {}; should be string",
                format.type_name()
            ),
            position,
        ));
    };

    sprintf(format, rest)
        .map(|out| Value::Str(Cow::Owned(out)))
        .map_err(|message| Builtin::Printf.bad_argument(message, position))
}

/// Largest width or precision accepted in a format.
const MAX_WIDTH: usize = 1_000_000;

/// Flags, width and precision between `%` and the verb.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct FormatSpec {
    minus: bool,
    plus: bool,
    space: bool,
    zero: bool,
    sharp: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Supports `%s`, `%v`, `%d`, `%q` and `%%`, each with Go's `-+# 0` flags,
/// width and precision. Type mismatches are rendered inline
/// (`%!d(string=web)`) as Go does; any other verb is an error.
fn sprintf(format: &str, args: &[Value<'_>]) -> Result<String, String> {
    let mut out = String::with_capacity(format.len());
    let mut args = args.iter();
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        let mut spec = FormatSpec::default();
        while let Some(&flag) = chars.peek() {
            match flag {
                '-' => spec.minus = true,
                '+' => spec.plus = true,
                ' ' => spec.space = true,
                '0' => spec.zero = true,
                '#' => spec.sharp = true,
                _ => break,
            }
            chars.next();
        }
        spec.width = parse_count(&mut chars)?;
        if chars.next_if_eq(&'.').is_some() {
            spec.precision = Some(parse_count(&mut chars)?.unwrap_or(0));
        }

        match chars.next() {
            Some('%') => out.push('%'),
            Some(verb @ ('s' | 'v' | 'd' | 'q')) => match args.next() {
                Some(arg) => format_verb(&mut out, verb, spec, arg),
                None => out.push_str(&format!("%!{}(MISSING)", verb)),
            },
            Some(verb) => return Err(format!("unsupported verb %{}", verb)),
            None => out.push_str("%!(NOVERB)"),
        }
    }

    let extra: Vec<String> = args
        .map(|a| format!("{}={}", a.type_name(), a))
        .collect();
    if !extra.is_empty() {
        out.push_str(&format!("%!(EXTRA {})", extra.join(", ")));
    }

    Ok(out)
}

fn parse_count(chars: &mut Peekable<Chars<'_>>) -> Result<Option<usize>, String> {
    let mut count: Option<usize> = None;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        chars.next();
        let next = count.unwrap_or(0) * 10 + digit as usize;
        if next > MAX_WIDTH {
            return Err(format!("width or precision larger than {}", MAX_WIDTH));
        }
        count = Some(next);
    }
    Ok(count)
}

fn format_verb(out: &mut String, verb: char, spec: FormatSpec, arg: &Value<'_>) {
    match (verb, arg) {
        ('d' | 'v', Value::Int(n)) => pad(out, &format_int(*n, spec), spec, false),
        ('s' | 'v', v) if !matches!(v, Value::Int(_)) => {
            pad(out, &truncate(&v.to_string(), spec.precision), spec, spec.zero)
        }
        ('q', Value::Str(s)) => {
            let s = truncate(s, spec.precision);
            let quoted = if spec.sharp && !s.contains('`') && !s.chars().any(char::is_control) {
                format!("`{}`", s)
            } else {
                format!("{:?}", s)
            };
            pad(out, &quoted, spec, spec.zero)
        }
        (verb, v) => out.push_str(&format!("%!{}({}={})", verb, v.type_name(), v)),
    }
}

/// Sign, precision and zero padding for an integer. Width padding with
/// spaces is left to [`pad`].
fn format_int(n: i64, spec: FormatSpec) -> String {
    let mut digits = n.unsigned_abs().to_string();
    if let Some(precision) = spec.precision {
        if precision == 0 && n == 0 {
            digits.clear();
        } else if digits.len() < precision {
            digits = format!("{}{}", "0".repeat(precision - digits.len()), digits);
        }
    }

    let sign = if n < 0 {
        "-"
    } else if spec.plus {
        "+"
    } else if spec.space {
        " "
    } else {
        ""
    };

    // The zero flag is ignored with an explicit precision or left alignment.
    if spec.zero && !spec.minus && spec.precision.is_none() {
        if let Some(width) = spec.width {
            let used = sign.len() + digits.len();
            if used < width {
                digits = format!("{}{}", "0".repeat(width - used), digits);
            }
        }
    }

    format!("{}{}", sign, digits)
}

fn truncate(s: &str, precision: Option<usize>) -> String {
    match precision {
        Some(p) => s.chars().take(p).collect(),
        None => s.to_string(),
    }
}

/// Pad `s` to the spec's width, counted in chars.
fn pad(out: &mut String, s: &str, spec: FormatSpec, zero_fill: bool) {
    let len = s.chars().count();
    let fill = spec.width.map_or(0, |w| w.saturating_sub(len));
    if fill == 0 {
        out.push_str(s);
    } else if spec.minus {
        out.push_str(s);
        out.extend(std::iter::repeat_n(' ', fill));
    } else {
        let c = if zero_fill { '0' } else { ' ' };
        out.extend(std::iter::repeat_n(c, fill));
        out.push_str(s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn s(v: &str) -> Value<'static> {
        Value::Str(Cow::Owned(v.to_string()))
    }

    fn labels() -> BTreeMap<String, String> {
        BTreeMap::from([("tier".to_string(), "backend".to_string())])
    }

    #[test]
    fn test_lookup() {
        assert_eq!(Builtin::lookup("index"), Some(Builtin::Index));
        assert_eq!(Builtin::lookup("join"), Some(Builtin::Join));
        assert_eq!(Builtin::lookup("upper"), None);
        assert_eq!(Builtin::Printf.name(), "printf");
    }

    #[test]
    fn test_index_present_and_missing() {
        let labels = labels();
        let found = Builtin::Index
            .call(vec![Value::Labels(&labels), s("tier")], 0)
            .unwrap();
        assert_eq!(found, s("backend"));

        let missing = Builtin::Index
            .call(vec![Value::Labels(&labels), s("nope")], 0)
            .unwrap();
        assert_eq!(missing.to_string(), "");
    }

    #[test]
    fn test_index_errors() {
        let labels = labels();
        assert!(matches!(
            Builtin::Index.call(vec![], 3),
            Err(ExecError::ArgCount { got: 0, position: 3, .. })
        ));
        assert!(matches!(
            Builtin::Index.call(vec![s("str"), s("k")], 0),
            Err(ExecError::BadArgument { func: "index", .. })
        ));
        assert!(matches!(
            Builtin::Index.call(vec![Value::Labels(&labels), Value::Int(1)], 0),
            Err(ExecError::BadArgument { func: "index", .. })
        ));
    }

    #[test]
    fn test_join() {
        let joined = Builtin::Join
            .call(vec![s("-"), s("a"), s("b"), s("c")], 0)
            .unwrap();
        assert_eq!(joined.to_string(), "a-b-c");

        let only_sep = Builtin::Join.call(vec![s(",")], 0).unwrap();
        assert_eq!(only_sep.to_string(), "");

        assert!(Builtin::Join.call(vec![s(","), Value::Int(1)], 0).is_err());
    }

    #[test]
    fn test_len() {
        let labels = labels();
        assert_eq!(
            Builtin::Len.call(vec![s("abcd")], 0).unwrap(),
            Value::Int(4)
        );
        assert_eq!(
            Builtin::Len.call(vec![Value::Labels(&labels)], 0).unwrap(),
            Value::Int(1)
        );
        assert!(Builtin::Len.call(vec![Value::Int(3)], 0).is_err());
        assert!(Builtin::Len.call(vec![s("a"), s("b")], 0).is_err());
    }

    #[test]
    fn test_print_spacing() {
        assert_eq!(sprint(&[s("a"), s("b")]), "ab");
        assert_eq!(sprint(&[Value::Int(1), Value::Int(2)]), "1 2");
        assert_eq!(sprint(&[s("a"), Value::Int(2)]), "a2");
        assert_eq!(sprintln(&[s("a"), s("b")]), "a b\n");
    }

    #[test]
    fn test_printf_verbs() {
        assert_eq!(sprintf("%s-%d", &[s("web"), Value::Int(3)]).unwrap(), "web-3");
        assert_eq!(sprintf("%v%%", &[Value::Int(50)]).unwrap(), "50%");
        assert_eq!(sprintf("%q", &[s("a b")]).unwrap(), "\"a b\"");
    }

    #[test]
    fn test_printf_width_and_alignment() {
        assert_eq!(sprintf("[%5s]", &[s("web")]).unwrap(), "[  web]");
        assert_eq!(sprintf("[%-5s]", &[s("web")]).unwrap(), "[web  ]");
        assert_eq!(sprintf("[%2s]", &[s("web")]).unwrap(), "[web]");
        assert_eq!(sprintf("[%-4d]", &[Value::Int(7)]).unwrap(), "[7   ]");
        assert_eq!(sprintf("[%6q]", &[s("ab")]).unwrap(), "[  \"ab\"]");
    }

    #[test]
    fn test_printf_zero_padding_and_signs() {
        assert_eq!(sprintf("%03d", &[Value::Int(7)]).unwrap(), "007");
        assert_eq!(sprintf("%05d", &[Value::Int(-42)]).unwrap(), "-0042");
        assert_eq!(sprintf("%+d", &[Value::Int(5)]).unwrap(), "+5");
        assert_eq!(sprintf("% d", &[Value::Int(5)]).unwrap(), " 5");
        assert_eq!(sprintf("[%-03d]", &[Value::Int(7)]).unwrap(), "[7  ]");
        assert_eq!(sprintf("%05s", &[s("ab")]).unwrap(), "000ab");
    }

    #[test]
    fn test_printf_precision() {
        assert_eq!(sprintf("%.2s", &[s("web")]).unwrap(), "we");
        assert_eq!(sprintf("[%6.3d]", &[Value::Int(7)]).unwrap(), "[   007]");
        assert_eq!(sprintf("[%.0d]", &[Value::Int(0)]).unwrap(), "[]");
        assert_eq!(sprintf("%.1q", &[s("web")]).unwrap(), "\"w\"");
        assert_eq!(sprintf("%#q", &[s("a b")]).unwrap(), "`a b`");
    }

    #[test]
    fn test_printf_mismatches() {
        assert_eq!(sprintf("%d", &[s("web")]).unwrap(), "%!d(string=web)");
        assert_eq!(sprintf("%s %s", &[s("a")]).unwrap(), "a %!s(MISSING)");
        assert_eq!(sprintf("x", &[s("a")]).unwrap(), "x%!(EXTRA string=a)");
        assert_eq!(sprintf("50%", &[]).unwrap(), "50%!(NOVERB)");
    }

    #[test]
    fn test_printf_unsupported_verbs_fail() {
        assert!(sprintf("%x", &[Value::Int(31)]).is_err());
        assert!(sprintf("%*d", &[Value::Int(3), Value::Int(1)]).is_err());
        assert!(sprintf("%99999999999s", &[s("a")]).is_err());

        let err = Builtin::Printf
            .call(vec![s("%08.3f"), Value::Int(1)], 4)
            .unwrap_err();
        assert!(matches!(
            err,
            ExecError::BadArgument { func: "printf", position: 4, ref message }
                if message.contains("%f")
        ));
    }

    #[test]
    fn test_printf_requires_string_format() {
        assert!(matches!(
            Builtin::Printf.call(vec![Value::Int(1)], 0),
            Err(ExecError::BadArgument { func: "printf", .. })
        ));
    }
}
