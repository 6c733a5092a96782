//! Path expression parser.

use std::borrow::Cow;
use std::str::FromStr;

use thiserror::Error;

use crate::types::{Accessor, Path};
use crate::util::needs_parsing;

/// Default maximum length, in bytes, of a path that needs parsing.
pub const DEFAULT_MAX_PATH_LENGTH: usize = 512;

/// Default maximum array index accepted in a path.
pub const DEFAULT_MAX_ARRAY_INDEX: usize = 10_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path is empty")]
    Empty,
    #[error("path is {len} bytes long, the maximum is {max}")]
    TooLong { len: usize, max: usize },
    #[error("unexpected character {ch:?} at position {position}")]
    UnexpectedChar { ch: char, position: usize },
    #[error("unexpected end of path at position {position}")]
    UnexpectedEnd { position: usize },
    #[error("empty segment at position {position}")]
    EmptySegment { position: usize },
    #[error("unterminated quote starting at position {position}")]
    UnterminatedQuote { position: usize },
    #[error("unterminated bracket starting at position {position}")]
    UnterminatedBracket { position: usize },
    #[error("empty brackets at position {position}")]
    EmptyBracket { position: usize },
    #[error("empty quoted key at position {position}")]
    EmptyKey { position: usize },
    #[error("invalid character {ch:?} in array index at position {position}")]
    InvalidIndex { ch: char, position: usize },
    #[error("array index {index} exceeds the maximum of {max}")]
    IndexTooLarge { index: String, max: usize },
    #[error("character {ch:?} can't be escaped (position {position})")]
    InvalidEscape { ch: char, position: usize },
    #[error("a path can't start with an array index (position {position})")]
    LeadingIndex { position: usize },
}

/// Bounds applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathLimits {
    /// Paths longer than this (in bytes) are rejected. Keys that need no
    /// parsing are not subject to this limit.
    pub max_path_length: usize,
    /// Largest accepted array index.
    pub max_array_index: usize,
}

impl Default for PathLimits {
    fn default() -> Self {
        Self {
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
            max_array_index: DEFAULT_MAX_ARRAY_INDEX,
        }
    }
}

/// Parse a path expression using the default limits.
pub fn parse_path(input: &str) -> Result<Path, PathError> {
    PathParser::parse(input)
}

/// Path expression parser.
pub struct PathParser<'a> {
    input: &'a str,
    pos: usize,
    limits: PathLimits,
}

impl<'a> PathParser<'a> {
    /// Parse a path expression.
    pub fn parse(input: &'a str) -> Result<Path, PathError> {
        Self::parse_with_limits(input, PathLimits::default())
    }

    /// Parse a path expression with explicit limits.
    pub fn parse_with_limits(input: &'a str, limits: PathLimits) -> Result<Path, PathError> {
        let mut parser = Self {
            input,
            pos: 0,
            limits,
        };
        parser.parse_path()
    }

    fn parse_path(&mut self) -> Result<Path, PathError> {
        if self.input.is_empty() {
            return Err(PathError::Empty);
        }

        if !needs_parsing(self.input) {
            return Ok(Path::literal(self.input));
        }

        if self.input.len() > self.limits.max_path_length {
            return Err(PathError::TooLong {
                len: self.input.len(),
                max: self.limits.max_path_length,
            });
        }

        // A single leading dot is tolerated.
        if self.peek() == Some('.') {
            self.advance();
        }

        let mut accessors = Vec::new();

        match self.peek() {
            None => return Err(PathError::UnexpectedEnd { position: self.pos }),
            Some('.') => return Err(PathError::EmptySegment { position: self.pos }),
            Some('[') => {
                // The root is an object: only a quoted key may open the path.
                let start = self.pos;
                let accessor = self.parse_bracket()?;
                if accessor.is_index() {
                    return Err(PathError::LeadingIndex { position: start });
                }
                accessors.push(accessor);
            }
            Some(_) => accessors.push(Accessor::Key(self.parse_identifier()?)),
        }

        while let Some(c) = self.peek() {
            match c {
                '[' => accessors.push(self.parse_bracket()?),
                '.' => {
                    self.advance();
                    match self.peek() {
                        None => return Err(PathError::UnexpectedEnd { position: self.pos }),
                        Some('.') => return Err(PathError::EmptySegment { position: self.pos }),
                        Some('[') => accessors.push(self.parse_bracket()?),
                        Some(_) => accessors.push(Accessor::Key(self.parse_identifier()?)),
                    }
                }
                // Only reachable right after a closing bracket.
                other => {
                    return Err(PathError::UnexpectedChar {
                        ch: other,
                        position: self.pos,
                    })
                }
            }
        }

        Ok(Path::new(accessors))
    }

    fn parse_identifier(&mut self) -> Result<String, PathError> {
        let start = self.pos;

        while let Some(c) = self.peek() {
            match c {
                '.' | '[' => break,
                ']' => {
                    return Err(PathError::UnexpectedChar {
                        ch: c,
                        position: self.pos,
                    })
                }
                _ => self.advance(),
            }
        }

        if self.pos == start {
            return Err(PathError::EmptySegment { position: start });
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn parse_bracket(&mut self) -> Result<Accessor, PathError> {
        let open = self.pos;
        self.expect('[')?;

        match self.peek() {
            None => Err(PathError::UnterminatedBracket { position: open }),
            Some(']') => Err(PathError::EmptyBracket { position: open }),
            Some(quote @ ('"' | '\'')) => {
                let key_start = self.pos;
                let key = self.parse_quoted(quote)?;
                if key.is_empty() {
                    return Err(PathError::EmptyKey {
                        position: key_start,
                    });
                }
                self.close_bracket(open)?;
                Ok(Accessor::Key(key))
            }
            Some(_) => {
                let index = self.parse_index()?;
                self.close_bracket(open)?;
                Ok(Accessor::Index(index))
            }
        }
    }

    fn close_bracket(&mut self, open: usize) -> Result<(), PathError> {
        match self.peek() {
            Some(']') => {
                self.advance();
                Ok(())
            }
            None => Err(PathError::UnterminatedBracket { position: open }),
            Some(ch) => Err(PathError::UnexpectedChar {
                ch,
                position: self.pos,
            }),
        }
    }

    fn parse_index(&mut self) -> Result<usize, PathError> {
        let start = self.pos;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == ']' {
                break;
            } else {
                return Err(PathError::InvalidIndex {
                    ch: c,
                    position: self.pos,
                });
            }
        }

        let digits = &self.input[start..self.pos];
        let too_large = || PathError::IndexTooLarge {
            index: digits.to_string(),
            max: self.limits.max_array_index,
        };
        let index: usize = digits.parse().map_err(|_| too_large())?;
        if index > self.limits.max_array_index {
            return Err(too_large());
        }
        Ok(index)
    }

    /// Parse a quoted key. Inside quotes `\` may only escape a quote
    /// character or itself.
    fn parse_quoted(&mut self, quote: char) -> Result<String, PathError> {
        let open = self.pos;
        self.advance();

        let mut key = String::new();

        loop {
            match self.peek() {
                None => return Err(PathError::UnterminatedQuote { position: open }),
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some(c @ ('"' | '\'' | '\\')) => {
                            key.push(c);
                            self.advance();
                        }
                        Some(c) => {
                            return Err(PathError::InvalidEscape {
                                ch: c,
                                position: self.pos,
                            })
                        }
                        None => return Err(PathError::UnterminatedQuote { position: open }),
                    }
                }
                Some(c) if c == quote => {
                    self.advance();
                    return Ok(key);
                }
                Some(c) => {
                    key.push(c);
                    self.advance();
                }
            }
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

    fn expect(&mut self, expected: char) -> Result<(), PathError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.advance();
                Ok(())
            }
            Some(c) => Err(PathError::UnexpectedChar {
                ch: c,
                position: self.pos,
            }),
            None => Err(PathError::UnexpectedEnd { position: self.pos }),
        }
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

/// Anything that can stand in for a path argument.
///
/// Strings are parsed with the limits passed to [`ToPath::to_path_with`], or
/// the default limits through [`ToPath::to_path`]. A [`Path`] (for example
/// [`Path::literal`]) is used as is.
pub trait ToPath {
    fn to_path_with(&self, limits: PathLimits) -> Result<Cow<'_, Path>, PathError>;

    fn to_path(&self) -> Result<Cow<'_, Path>, PathError> {
        self.to_path_with(PathLimits::default())
    }
}

impl ToPath for str {
    fn to_path_with(&self, limits: PathLimits) -> Result<Cow<'_, Path>, PathError> {
        PathParser::parse_with_limits(self, limits).map(Cow::Owned)
    }
}

impl ToPath for String {
    fn to_path_with(&self, limits: PathLimits) -> Result<Cow<'_, Path>, PathError> {
        self.as_str().to_path_with(limits)
    }
}

impl ToPath for Path {
    fn to_path_with(&self, _limits: PathLimits) -> Result<Cow<'_, Path>, PathError> {
        Ok(Cow::Borrowed(self))
    }
}

impl<T: ToPath + ?Sized> ToPath for &T {
    fn to_path_with(&self, limits: PathLimits) -> Result<Cow<'_, Path>, PathError> {
        (**self).to_path_with(limits)
    }
}
