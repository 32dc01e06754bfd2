//! Classifier response parsing
//!
//! Turns one free-text classification response into zero or more
//! [`ServiceRecord`]s. The classifier is instructed to answer either with
//! the discard marker or with one or more `{'Service': ..., 'Details': ...}`
//! record blocks separated by a blank line. Blocks are parsed with a small
//! cursor-based grammar, never by evaluating the text as code.
//!
//! Discard detection is substring containment: a response containing the
//! marker anywhere, even inside a service description, is discarded as
//! non-applicable. This is a knowingly over-broad heuristic inherited from
//! the prompt contract; `test_na_inside_details_discards_whole_response`
//! pins the behavior.

use crate::extraction::types::ServiceRecord;
use thiserror::Error;
use tracing::{debug, warn};

/// Default marker signaling "no specific service in this window".
pub const DEFAULT_DISCARD_MARKER: &str = "NA";

/// Errors raised when a response block does not match the record grammar.
#[derive(Debug, Error)]
pub enum RecordParseError {
    #[error("Record block does not start with '{{': {0}")]
    MissingOpeningBrace(String),

    #[error("Unterminated string in record block")]
    UnterminatedString,

    #[error("Unexpected character '{found}' at offset {offset} in record block")]
    UnexpectedChar { found: char, offset: usize },

    #[error("Unexpected end of record block")]
    UnexpectedEnd,

    #[error("Unknown key '{0}' in record block (expected 'Service' or 'Details')")]
    UnknownKey(String),

    #[error("Duplicate key '{0}' in record block")]
    DuplicateKey(String),

    #[error("Missing required key '{0}' in record block")]
    MissingKey(&'static str),

    #[error("Service name cannot be empty")]
    EmptyService,

    #[error("Trailing content after record block: {0}")]
    TrailingContent(String),
}

/// Parses one classification response into service records.
///
/// A response containing `discard_marker` anywhere yields zero records.
/// Otherwise the response is split on blank lines into record blocks, each
/// of which must match the record grammar; the first malformed block fails
/// the whole response.
pub fn parse_response(
    response: &str,
    discard_marker: &str,
) -> Result<Vec<ServiceRecord>, RecordParseError> {
    if response.contains(discard_marker) {
        debug!("Response contains discard marker, yielding no records");
        return Ok(Vec::new());
    }

    let mut records = Vec::new();
    for block in response.split("\n\n") {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }
        match parse_block(block) {
            Ok(record) => records.push(record),
            Err(e) => {
                warn!("Malformed record block: {}", e);
                return Err(e);
            }
        }
    }

    debug!("Parsed {} record(s) from response", records.len());
    Ok(records)
}

/// Parses a single `{'Service': ..., 'Details': ...}` block.
///
/// Both single and double quotes are accepted for keys and values, values
/// may span multiple lines, and backslash escapes the next character.
pub fn parse_block(block: &str) -> Result<ServiceRecord, RecordParseError> {
    let mut cursor = Cursor::new(block);

    cursor.skip_whitespace();
    cursor.expect('{')?;

    let mut service: Option<String> = None;
    let mut details: Option<String> = None;

    loop {
        cursor.skip_whitespace();
        let key = cursor.parse_string()?;
        cursor.skip_whitespace();
        cursor.expect(':')?;
        cursor.skip_whitespace();
        let value = cursor.parse_string()?;

        let slot = match key.as_str() {
            "Service" => &mut service,
            "Details" => &mut details,
            other => return Err(RecordParseError::UnknownKey(other.to_string())),
        };
        if slot.is_some() {
            return Err(RecordParseError::DuplicateKey(key));
        }
        *slot = Some(value);

        cursor.skip_whitespace();
        match cursor.next_char()? {
            ',' => continue,
            '}' => break,
            found => {
                return Err(RecordParseError::UnexpectedChar {
                    found,
                    offset: cursor.offset - found.len_utf8(),
                })
            }
        }
    }

    cursor.skip_whitespace();
    if !cursor.at_end() {
        return Err(RecordParseError::TrailingContent(
            cursor.remainder().chars().take(40).collect(),
        ));
    }

    let service = service.ok_or(RecordParseError::MissingKey("Service"))?;
    let details = details.ok_or(RecordParseError::MissingKey("Details"))?;

    if service.trim().is_empty() {
        return Err(RecordParseError::EmptyService);
    }

    Ok(ServiceRecord { service, details })
}

/// Minimal scanning cursor over a record block.
struct Cursor<'a> {
    input: &'a str,
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, offset: 0 }
    }

    fn at_end(&self) -> bool {
        self.offset >= self.input.len()
    }

    fn remainder(&self) -> &'a str {
        &self.input[self.offset..]
    }

    fn peek(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    fn next_char(&mut self) -> Result<char, RecordParseError> {
        let c = self.peek().ok_or(RecordParseError::UnexpectedEnd)?;
        self.offset += c.len_utf8();
        Ok(c)
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.offset += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), RecordParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.offset += c.len_utf8();
                Ok(())
            }
            Some(found) => {
                Err(if expected == '{' {
                    RecordParseError::MissingOpeningBrace(
                        self.remainder().chars().take(40).collect(),
                    )
                } else {
                    RecordParseError::UnexpectedChar {
                        found,
                        offset: self.offset,
                    }
                })
            }
            None => Err(if expected == '{' {
                RecordParseError::MissingOpeningBrace(String::new())
            } else {
                RecordParseError::UnexpectedEnd
            }),
        }
    }

    /// Parses a quoted string. The opening quote character (single or
    /// double) is the closing delimiter; backslash escapes the next
    /// character; newlines are allowed inside the string.
    fn parse_string(&mut self) -> Result<String, RecordParseError> {
        let quote = match self.peek() {
            Some(c @ ('\'' | '"')) => c,
            Some(found) => {
                return Err(RecordParseError::UnexpectedChar {
                    found,
                    offset: self.offset,
                })
            }
            None => return Err(RecordParseError::UnexpectedEnd),
        };
        self.offset += quote.len_utf8();

        let mut value = String::new();
        loop {
            let c = match self.peek() {
                Some(c) => c,
                None => return Err(RecordParseError::UnterminatedString),
            };
            self.offset += c.len_utf8();
            match c {
                '\\' => {
                    let escaped = self
                        .peek()
                        .ok_or(RecordParseError::UnterminatedString)?;
                    self.offset += escaped.len_utf8();
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        other => value.push(other),
                    }
                }
                c if c == quote => return Ok(value),
                c => value.push(c),
            }
        }
    }
}
