use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use super::{RawType, TypeDescriptor};

// -----------------------------------------------------------------------------
// TypeParseError

/// An error returned when a type expression is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParseError {
    /// Byte offset in `expr`.
    pub offset: usize,
    /// The expression that failed to parse.
    pub expr: String,
    /// The underlying error.
    pub error: Cow<'static, str>,
}

impl fmt::Display for TypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Encountered an error at offset {} while parsing type `{}`: {}",
            self.offset, self.expr, self.error,
        )
    }
}

impl core::error::Error for TypeParseError {}

// -----------------------------------------------------------------------------
// Parser

struct Parser<'a> {
    expr: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, offset: usize, error: impl Into<Cow<'static, str>>) -> TypeParseError {
        TypeParseError {
            offset,
            expr: String::from(self.expr),
            error: error.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.expr[self.pos..];
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn peek(&self) -> Option<u8> {
        self.expr.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, byte: u8) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<&'a str, TypeParseError> {
        self.skip_whitespace();
        let start = self.pos;

        if self.peek() == Some(b'?') {
            self.pos += 1;
            return Ok("?");
        }

        while let Some(b) = self.peek() {
            if b.is_ascii_alphanumeric() || matches!(b, b'_' | b'\\' | b'.' | b':') {
                self.pos += 1;
            } else {
                break;
            }
        }

        if start == self.pos {
            return Err(match self.peek() {
                Some(b) => self.error(start, alloc::format!("unexpected `{}`", b as char)),
                None => self.error(start, "expected a type name"),
            });
        }
        Ok(&self.expr[start..self.pos])
    }

    fn ty(&mut self) -> Result<TypeDescriptor, TypeParseError> {
        let start = {
            self.skip_whitespace();
            self.pos
        };
        let ident = self.ident()?;
        let raw = if ident == "?" {
            RawType::Wildcard
        } else {
            RawType::from_ident(ident)
        };

        let mut generics = Vec::new();
        if self.eat(b'<') {
            if raw.is_leaf() {
                return Err(self.error(
                    start,
                    alloc::format!("type `{raw}` does not take generic parameters"),
                ));
            }
            loop {
                self.skip_whitespace();
                if self.peek() == Some(b'>') || self.peek() == Some(b',') {
                    return Err(self.error(self.pos, "empty generic parameter"));
                }
                generics.push(self.ty()?);
                if self.eat(b',') {
                    continue;
                }
                if self.eat(b'>') {
                    break;
                }
                self.skip_whitespace();
                return Err(self.error(self.pos, "expected `,` or `>`"));
            }
        }

        Ok(TypeDescriptor::new(raw, generics))
    }
}

/// Parses a whole type expression, rejecting trailing input.
pub(super) fn parse(expr: &str) -> Result<TypeDescriptor, TypeParseError> {
    let mut parser = Parser { expr, pos: 0 };
    let ty = parser.ty()?;
    parser.skip_whitespace();
    if parser.pos != expr.len() {
        return Err(parser.error(parser.pos, "unexpected trailing input"));
    }
    Ok(ty)
}
