//! Message templates
//!
//! A template is literal text with `{}` (next argument) and `{N}` (argument
//! N) placeholders; `{{` and `}}` produce literal braces. Values are turned
//! into text by their `Display` impl. A template that does not parse, or
//! does not match its argument list, is an error rather than a best guess.

use std::fmt;

/// A value substituted into a template
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Char(char),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(n) => write!(f, "{}", n),
            Value::UInt(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
        }
    }
}

macro_rules! impl_from {
    ($variant:ident: $($ty:ty),+ => $conv:ty) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(<$conv>::from(v))
                }
            }
        )+
    };
}

impl_from!(Int: i8, i16, i32, i64 => i64);
impl_from!(UInt: u8, u16, u32, u64 => u64);
impl_from!(Float: f32, f64 => f64);
impl_from!(Bool: bool => bool);
impl_from!(Char: char => char);
impl_from!(Str: String, &str => String);

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::UInt(v as u64)
    }
}

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::Int(v as i64)
    }
}

/// Template errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Unclosed placeholder starting at byte {0}")]
    UnclosedPlaceholder(usize),

    #[error("Unmatched '}}' at byte {0}")]
    UnmatchedBrace(usize),

    #[error("Invalid placeholder '{{{0}}}'")]
    InvalidPlaceholder(String),

    #[error("Placeholder refers to argument {index} but only {count} given")]
    MissingArgument { index: usize, count: usize },

    #[error("{0} argument(s) not used by the template")]
    UnusedArguments(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Arg(usize),
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pieces: Vec<Piece>,
}

impl Template {
    /// Parse a template string
    pub fn parse(source: &str) -> Result<Self, FormatError> {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut next_implicit = 0;
        let mut chars = source.char_indices().peekable();

        while let Some((at, c)) = chars.next() {
            match c {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut spec = String::new();
                    loop {
                        match chars.next() {
                            Some((_, '}')) => break,
                            Some((_, c)) => spec.push(c),
                            None => return Err(FormatError::UnclosedPlaceholder(at)),
                        }
                    }

                    let index = if spec.is_empty() {
                        next_implicit += 1;
                        next_implicit - 1
                    } else {
                        spec.parse::<usize>()
                            .map_err(|_| FormatError::InvalidPlaceholder(spec.clone()))?
                    };

                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    pieces.push(Piece::Arg(index));
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(FormatError::UnmatchedBrace(at)),
                c => literal.push(c),
            }
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Ok(Self { pieces })
    }

    /// Substitute `values` into the template. Every value must be used.
    pub fn render(&self, values: &[Value]) -> Result<String, FormatError> {
        let mut used = vec![false; values.len()];
        let mut out = String::new();

        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Arg(index) => {
                    let value = values.get(*index).ok_or(FormatError::MissingArgument {
                        index: *index,
                        count: values.len(),
                    })?;
                    used[*index] = true;
                    out.push_str(&value.to_string());
                }
            }
        }

        match used.iter().filter(|&&u| !u).count() {
            0 => Ok(out),
            unused => Err(FormatError::UnusedArguments(unused)),
        }
    }
}

/// Parse `template` and substitute `values` in one step
pub fn format(template: &str, values: &[Value]) -> Result<String, FormatError> {
    Template::parse(template)?.render(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicit_placeholders() {
        let out = format("{} of {} done", &[3.into(), 10u32.into()]).unwrap();
        assert_eq!(out, "3 of 10 done");
    }

    #[test]
    fn test_explicit_placeholders() {
        let out = format("{1}-{0}-{1}", &["a".into(), "b".into()]).unwrap();
        assert_eq!(out, "b-a-b");
    }

    #[test]
    fn test_escaped_braces() {
        let out = format("{{{}}}", &[true.into()]).unwrap();
        assert_eq!(out, "{true}");
    }

    #[test]
    fn test_value_rendering() {
        assert_eq!(Value::from(-4i64).to_string(), "-4");
        assert_eq!(Value::from(1.5f64).to_string(), "1.5");
        assert_eq!(Value::from('x').to_string(), "x");
        assert_eq!(Value::from(String::from("s")).to_string(), "s");
    }

    #[test]
    fn test_unclosed_placeholder() {
        assert_eq!(format("abc {", &[]), Err(FormatError::UnclosedPlaceholder(4)));
    }

    #[test]
    fn test_unmatched_brace() {
        assert_eq!(format("a } b", &[]), Err(FormatError::UnmatchedBrace(2)));
    }

    #[test]
    fn test_invalid_placeholder() {
        assert_eq!(
            format("{name}", &["x".into()]),
            Err(FormatError::InvalidPlaceholder("name".to_string()))
        );
    }

    #[test]
    fn test_missing_argument() {
        assert_eq!(
            format("{} {}", &[1.into()]),
            Err(FormatError::MissingArgument { index: 1, count: 1 })
        );
    }

    #[test]
    fn test_unused_arguments() {
        assert_eq!(
            format("{}", &[1.into(), 2.into(), 3.into()]),
            Err(FormatError::UnusedArguments(2))
        );
    }
}
