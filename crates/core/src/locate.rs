//! Maps logical paths in a JSON document to their source positions.
//!
//! Paths join member names with `.` and render array elements as `[i]`,
//! e.g. `discoveryModel.discoveryItems[0].apiSpecification.name`. Members are
//! positioned at their key, array elements at their first character.

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::ops::Bound;
use std::str::Chars;

use thiserror::Error;

use crate::model::Position;

/// Logical path -> source position.
pub type PathPositions = BTreeMap<String, Position>;

/// Maximum container nesting, same as serde_json's default recursion limit.
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocateError {
    #[error("unexpected end of document")]
    UnexpectedEnd,
    #[error("unexpected character {found:?} at line {line}, column {column}")]
    UnexpectedChar {
        found: char,
        line: usize,
        column: usize,
    },
    #[error("invalid escape sequence at line {line}, column {column}")]
    InvalidEscape { line: usize, column: usize },
    #[error("nesting deeper than {} at line {line}, column {column}", MAX_DEPTH)]
    TooDeep { line: usize, column: usize },
}

/// Produces the path -> position mapping for a serialized document.
pub trait PathLocator {
    fn locate(&self, document: &str) -> Result<PathPositions, LocateError>;
}

/// Locator for JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPathLocator;

impl PathLocator for JsonPathLocator {
    fn locate(&self, document: &str) -> Result<PathPositions, LocateError> {
        let mut scanner = Scanner::new(document);
        let mut out = PathPositions::new();
        scanner.skip_ws();
        scanner.value("", &mut out)?;
        scanner.skip_ws();
        if let Some(found) = scanner.peek() {
            return Err(scanner.unexpected(found));
        }
        Ok(out)
    }
}

struct Scanner<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
    depth: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            line: 1,
            column: 0,
            depth: 0,
        }
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Result<char, LocateError> {
        let c = self.chars.next().ok_or(LocateError::UnexpectedEnd)?;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        Ok(c)
    }

    fn unexpected(&self, found: char) -> LocateError {
        LocateError::UnexpectedChar {
            found,
            line: self.line,
            column: self.column,
        }
    }

    fn expect(&mut self, want: char) -> Result<(), LocateError> {
        match self.peek() {
            Some(c) if c == want => {
                self.bump()?;
                Ok(())
            }
            Some(c) => Err(self.unexpected(c)),
            None => Err(LocateError::UnexpectedEnd),
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !matches!(c, ' ' | '\t' | '\n' | '\r') {
                break;
            }
            // peeked above, cannot hit the end
            let _ = self.bump();
        }
    }

    fn value(&mut self, path: &str, out: &mut PathPositions) -> Result<(), LocateError> {
        match self.peek() {
            Some('{') => {
                self.descend()?;
                self.object(path, out)?;
                self.depth -= 1;
                Ok(())
            }
            Some('[') => {
                self.descend()?;
                self.array(path, out)?;
                self.depth -= 1;
                Ok(())
            }
            Some('"') => self.string().map(|_| ()),
            Some(c) if c == '-' || c.is_ascii_alphanumeric() => self.scalar(),
            Some(c) => Err(self.unexpected(c)),
            None => Err(LocateError::UnexpectedEnd),
        }
    }

    fn descend(&mut self) -> Result<(), LocateError> {
        if self.depth == MAX_DEPTH {
            return Err(LocateError::TooDeep {
                line: self.line,
                column: self.column,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn object(&mut self, path: &str, out: &mut PathPositions) -> Result<(), LocateError> {
        self.expect('{')?;
        self.skip_ws();
        if self.peek() == Some('}') {
            return self.bump().map(|_| ());
        }
        loop {
            self.skip_ws();
            let at = self.position();
            let key = self.string()?;
            let child = if path.is_empty() {
                key
            } else {
                format!("{path}.{key}")
            };
            if out.insert(child.clone(), at).is_some() {
                // Repeated member: the last occurrence replaces the whole subtree.
                forget_descendants(out, &child);
            }

            self.skip_ws();
            self.expect(':')?;
            self.skip_ws();
            self.value(&child, out)?;
            self.skip_ws();

            match self.bump()? {
                ',' => continue,
                '}' => return Ok(()),
                c => return Err(self.unexpected(c)),
            }
        }
    }

    fn array(&mut self, path: &str, out: &mut PathPositions) -> Result<(), LocateError> {
        self.expect('[')?;
        self.skip_ws();
        if self.peek() == Some(']') {
            return self.bump().map(|_| ());
        }
        let mut index = 0usize;
        loop {
            self.skip_ws();
            let child = format!("{path}[{index}]");
            out.insert(child.clone(), self.position());
            self.value(&child, out)?;
            self.skip_ws();

            match self.bump()? {
                ',' => index += 1,
                ']' => return Ok(()),
                c => return Err(self.unexpected(c)),
            }
        }
    }

    /// Reads a quoted string and returns its decoded contents.
    fn string(&mut self) -> Result<String, LocateError> {
        self.expect('"')?;
        let mut s = String::new();
        loop {
            match self.bump()? {
                '"' => return Ok(s),
                '\\' => {
                    let unit = self.escape()?;
                    if is_high_surrogate(unit) && self.peek() == Some('\\') {
                        self.bump()?;
                        let low = self.escape()?;
                        if is_low_surrogate(low) {
                            let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                            s.push(to_char(code));
                        } else {
                            s.push(char::REPLACEMENT_CHARACTER);
                            s.push(to_char(low));
                        }
                    } else {
                        s.push(to_char(unit));
                    }
                }
                '\n' => return Err(self.unexpected('\n')),
                c => s.push(c),
            }
        }
    }

    /// Decodes the escape after a backslash into a code unit. `\uXXXX` may
    /// yield half of a surrogate pair.
    fn escape(&mut self) -> Result<u32, LocateError> {
        let (line, column) = (self.line, self.column);
        let unit = match self.bump()? {
            '"' => '"' as u32,
            '\\' => '\\' as u32,
            '/' => '/' as u32,
            'b' => 0x8,
            'f' => 0xc,
            'n' => '\n' as u32,
            'r' => '\r' as u32,
            't' => '\t' as u32,
            'u' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = self
                        .bump()?
                        .to_digit(16)
                        .ok_or(LocateError::InvalidEscape { line, column })?;
                    code = code * 16 + digit;
                }
                code
            }
            _ => return Err(LocateError::InvalidEscape { line, column }),
        };
        Ok(unit)
    }

    /// Numbers, `true`, `false` and `null`. Validity beyond the token charset is not checked.
    fn scalar(&mut self) -> Result<(), LocateError> {
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.') {
                self.bump()?;
            } else {
                break;
            }
        }
        Ok(())
    }
}

fn is_high_surrogate(unit: u32) -> bool {
    (0xD800..0xDC00).contains(&unit)
}

fn is_low_surrogate(unit: u32) -> bool {
    (0xDC00..0xE000).contains(&unit)
}

/// Lone surrogates become U+FFFD.
fn to_char(unit: u32) -> char {
    char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// Drops every `path.*` and `path[*]` entry.
fn forget_descendants(out: &mut PathPositions, path: &str) {
    let stale: Vec<String> = out
        .range::<str, _>((Bound::Excluded(path), Bound::Unbounded))
        .take_while(|(k, _)| k.starts_with(path))
        .filter(|(k, _)| matches!(k[path.len()..].chars().next(), Some('.' | '[')))
        .map(|(k, _)| k.clone())
        .collect();
    for k in stale {
        out.remove(&k);
    }
}
