//! Expression parser for template bindings.
//!
//! Supports the binding sub-language used in directive attributes and
//! interpolations:
//! - `name` - top-level property of the scope
//! - `.field` or `['field']` - object field access
//! - `[0]` - array index access
//! - `()` - call suffix on a method name
//!
//! Identifiers may contain `$` and `_`, so `$root` parses as a plain name.

use alloc::string::{String, ToString};
use weft_core::{Path, Segment};

/// The name that addresses the root of the observable graph.
pub const ROOT_NAME: &str = "$root";

/// A parsed binding expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Expression {
    source: String,
    path: Path,
    call: bool,
}

/// Error type for expression parsing.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseError {
    pub expression: String,
    pub message: String,
    pub position: usize,
}

impl From<ParseError> for weft_core::Error {
    fn from(err: ParseError) -> Self {
        weft_core::Error::parse(err.expression, err.message, err.position)
    }
}

/// Parser state.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn error(&self, message: impl Into<String>, position: usize) -> ParseError {
        ParseError {
            expression: self.input.to_string(),
            message: message.into(),
            position,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(self.error(
                alloc::format!("Expected '{}', found '{}'", expected, c),
                self.pos,
            )),
            None => Err(self.error(
                alloc::format!("Expected '{}', found end of input", expected),
                self.pos,
            )),
        }
    }

    fn parse_identifier(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        if self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            return Err(self.error("Identifier cannot start with a digit", self.pos));
        }
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error("Expected identifier", self.pos));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_index(&mut self) -> Result<usize, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error("Expected index", self.pos));
        }
        self.input[start..self.pos]
            .parse()
            .map_err(|_| self.error("Invalid index", start))
    }

    fn parse_string_literal(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace();
        let quote = match self.peek() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("Expected string literal", self.pos)),
        };
        self.advance();

        let start = self.pos;
        let mut result = String::new();
        while let Some(c) = self.peek() {
            if c == quote {
                self.advance();
                return Ok(result);
            }
            if c == '\\' {
                self.advance();
                match self.peek() {
                    Some(escaped) => result.push(escaped),
                    None => break,
                }
            } else {
                result.push(c);
            }
            self.advance();
        }
        Err(self.error("Unterminated string", start))
    }
}

impl Expression {
    /// Parses a binding expression from a string.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let mut parser = Parser::new(input);
        let mut path = Path::root();
        let mut call = false;

        path.push(Segment::Field(parser.parse_identifier()?));

        loop {
            parser.skip_whitespace();
            match parser.peek() {
                Some('.') => {
                    parser.advance();
                    let field = parser.parse_identifier()?;
                    path.push(Segment::Field(field));
                }
                Some('[') => {
                    parser.advance();
                    parser.skip_whitespace();
                    match parser.peek() {
                        Some('\'') | Some('"') => {
                            let field = parser.parse_string_literal()?;
                            parser.expect(']')?;
                            path.push(Segment::Field(field));
                        }
                        Some(c) if c.is_ascii_digit() => {
                            let index = parser.parse_index()?;
                            parser.expect(']')?;
                            path.push(Segment::Index(index));
                        }
                        _ => {
                            return Err(parser.error("Invalid bracket expression", parser.pos));
                        }
                    }
                }
                Some('(') => {
                    parser.advance();
                    parser.expect(')')?;
                    call = true;
                    parser.skip_whitespace();
                    if let Some(c) = parser.peek() {
                        return Err(parser.error(
                            alloc::format!("Unexpected '{}' after call", c),
                            parser.pos,
                        ));
                    }
                    break;
                }
                None => break,
                Some(c) => {
                    return Err(parser.error(alloc::format!("Unexpected '{}'", c), parser.pos));
                }
            }
        }

        Ok(Expression {
            source: input.trim().to_string(),
            path,
            call,
        })
    }

    /// Returns the trimmed source text.
    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the property path, without the call suffix.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true if the expression ends in a call suffix.
    ///
    /// Call expressions are one-shot reads and never subscribe to a node.
    #[inline]
    pub fn is_call(&self) -> bool {
        self.call
    }

    /// Returns true if the expression is the bare `$root` name.
    pub fn is_root(&self) -> bool {
        !self.call
            && self.path.len() == 1
            && matches!(self.path.head(), Some(Segment::Field(name)) if name == ROOT_NAME)
    }
}
