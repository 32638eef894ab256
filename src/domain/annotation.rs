//! Annotation head parsing
//!
//! A todo line may start with a compact head that identifies it:
//!
//! ```text
//! [priority]<id>[@@done] content...
//!
//! priority  [A-Za-z0-9]+          glued to the id, e.g. `1` in `1@AbCdE`
//! id        @XXXXX                timestamp id (5 token digits)
//!           ##123                 incrementing counter
//!           #XXXXXXXXXXXXXXXXXXXX random id (20 token digits)
//! done      @@XXXXX               completion timestamp
//! ```
//!
//! The head must cover the whole first word: `@AbCdEf` (six digits) is
//! not a head, it is plain text. Lines that do not match are returned
//! as opaque content with `is_valid_format() == false`.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

use super::timestamp::{is_alphabet_byte, Codec, TOKEN_LEN};

/// Digits in a random (nanoid-class) id
pub const NANOID_LEN: usize = 20;

/// Identifier glued to the front of an annotation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdToken {
    /// `@` + 5-digit timestamp token (creation time)
    Timestamp(String),
    /// `##` + decimal digits; not stable across rescans
    Counter(String),
    /// `#` + 20 random token digits
    NanoId(String),
}

impl IdToken {
    /// Returns true if the id addresses exactly one line across rescans
    pub fn is_unique(&self) -> bool {
        matches!(self, IdToken::Timestamp(_) | IdToken::NanoId(_))
    }

    /// Returns the id body without its marker
    pub fn body(&self) -> &str {
        match self {
            IdToken::Timestamp(body) | IdToken::Counter(body) | IdToken::NanoId(body) => body,
        }
    }

    /// Returns the numeric value of a counter id, if it fits in a u64
    pub fn counter_value(&self) -> Option<u64> {
        match self {
            IdToken::Counter(digits) => digits.parse().ok(),
            _ => None,
        }
    }

    fn marker(&self) -> &'static str {
        match self {
            IdToken::Timestamp(_) => "@",
            IdToken::Counter(_) => "##",
            IdToken::NanoId(_) => "#",
        }
    }
}

impl fmt::Display for IdToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.marker(), self.body())
    }
}

/// Structured view of one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAnnotation {
    priority: Option<String>,
    id: Option<IdToken>,
    done: Option<String>,
    main_content: String,
    valid: bool,
}

impl ParsedAnnotation {
    fn opaque(line: &str) -> Self {
        Self {
            priority: None,
            id: None,
            done: None,
            main_content: line.trim().to_string(),
            valid: false,
        }
    }

    /// Priority token glued before the id, e.g. `"1"`
    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    /// Typed id token
    pub fn id(&self) -> Option<&IdToken> {
        self.id.as_ref()
    }

    /// Id token including its marker, e.g. `"@AbCdE"` or `"##42"`
    pub fn id_part(&self) -> Option<String> {
        self.id.as_ref().map(ToString::to_string)
    }

    /// Completion token body (5 digits, without `@@`)
    pub fn done_token(&self) -> Option<&str> {
        self.done.as_deref()
    }

    /// Completion token including its marker, e.g. `"@@FgHiJ"`
    pub fn done_part(&self) -> Option<String> {
        self.done.as_ref().map(|body| format!("@@{}", body))
    }

    /// Text after the head, trimmed; the whole trimmed line if no head
    pub fn main_content(&self) -> &str {
        &self.main_content
    }

    pub fn is_unique(&self) -> bool {
        self.id.as_ref().is_some_and(IdToken::is_unique)
    }

    pub fn is_valid_format(&self) -> bool {
        self.valid
    }

    /// Creation time encoded in a timestamp id
    pub fn created_at(&self, codec: &Codec) -> Option<DateTime<Utc>> {
        match &self.id {
            Some(IdToken::Timestamp(body)) => codec.decode(body),
            _ => None,
        }
    }

    /// Completion time encoded in the done token
    pub fn finished_at(&self, codec: &Codec) -> Option<DateTime<Utc>> {
        self.done.as_deref().and_then(|body| codec.decode(body))
    }
}

#[derive(Serialize)]
struct AnnotationView<'a> {
    priority: Option<&'a str>,
    id_part: Option<String>,
    done_part: Option<String>,
    main_content: &'a str,
    is_unique: bool,
    is_valid_format: bool,
}

impl Serialize for ParsedAnnotation {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        AnnotationView {
            priority: self.priority(),
            id_part: self.id_part(),
            done_part: self.done_part(),
            main_content: self.main_content(),
            is_unique: self.is_unique(),
            is_valid_format: self.is_valid_format(),
        }
        .serialize(serializer)
    }
}

/// Parses one line of text. Never fails: unmatched lines come back opaque.
pub fn parse(line: &str) -> ParsedAnnotation {
    Scanner::new(line)
        .scan()
        .unwrap_or_else(|| ParsedAnnotation::opaque(line))
}

fn is_ws(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

struct Scanner<'a> {
    line: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            bytes: line.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    /// Consumes the longest run matching `pred` and returns it
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&pred) {
            self.pos += 1;
        }
        // Predicates accept ASCII only, so both ends are char boundaries
        let line = self.line;
        &line[start..self.pos]
    }

    /// Consumes exactly `n` token digits
    fn take_token_digits(&mut self, n: usize) -> Option<&'a str> {
        let end = self.pos.checked_add(n)?;
        let run = self.bytes.get(self.pos..end)?;
        if !run.iter().all(|&b| is_alphabet_byte(b)) {
            return None;
        }
        let line = self.line;
        let digits = &line[self.pos..end];
        self.pos = end;
        Some(digits)
    }

    fn scan(mut self) -> Option<ParsedAnnotation> {
        self.take_while(is_ws);

        let priority = self.take_while(|b| b.is_ascii_alphanumeric());
        let id = self.scan_id()?;
        let done = self.scan_done()?;

        let main_content = if self.at_end() {
            ""
        } else {
            if self.take_while(is_ws).is_empty() {
                // Head ran straight into more text: not a head at all
                return None;
            }
            let line = self.line;
            let rest = &line[self.pos..];
            if rest.chars().any(is_line_break) {
                return None;
            }
            rest.trim()
        };

        Some(ParsedAnnotation {
            priority: (!priority.is_empty()).then(|| priority.to_string()),
            id: Some(id),
            done: done.map(str::to_string),
            main_content: main_content.to_string(),
            valid: true,
        })
    }

    fn scan_id(&mut self) -> Option<IdToken> {
        match (self.peek()?, self.peek_at(1)) {
            (b'@', _) => {
                self.pos += 1;
                let digits = self.take_token_digits(TOKEN_LEN)?;
                Some(IdToken::Timestamp(digits.to_string()))
            }
            (b'#', Some(b'#')) => {
                self.pos += 2;
                let digits = self.take_while(|b| b.is_ascii_digit());
                if digits.is_empty() {
                    return None;
                }
                Some(IdToken::Counter(digits.to_string()))
            }
            (b'#', _) => {
                self.pos += 1;
                let digits = self.take_token_digits(NANOID_LEN)?;
                Some(IdToken::NanoId(digits.to_string()))
            }
            _ => None,
        }
    }

    /// Returns `Some(None)` when no done token is present, `None` when a
    /// done marker is present but malformed
    fn scan_done(&mut self) -> Option<Option<&'a str>> {
        if self.peek() != Some(b'@') {
            return Some(None);
        }
        if self.peek_at(1) != Some(b'@') {
            return None;
        }
        self.pos += 2;
        self.take_token_digits(TOKEN_LEN).map(Some)
    }
}
