//! Content rewrites for status changes and new todos
//!
//! These are the pure halves of the edit flows: given the text that
//! follows a status marker, produce the text to write back. Reading and
//! writing files is left to the caller.

use chrono::{DateTime, Utc};
use std::ops::Range;
use thiserror::Error;

use super::status::StatusConfig;
use super::timestamp::{is_alphabet_byte, Codec, TOKEN_LEN};

/// Priority given to new todos when none is supplied
pub const DEFAULT_PRIORITY: &str = "1";

const DONE_MARKER: &[u8] = b"@@";

#[derive(Debug, Error, PartialEq)]
pub enum TransitionError {
    #[error("Cannot create an empty todo")]
    EmptyContent,

    #[error("Invalid priority '{0}': expected ASCII letters and digits only")]
    InvalidPriority(String),

    #[error("No done marker is paired with '{0}'")]
    NoDoneMarker(String),
}

/// Byte range of the first `@@XXXXX` stamp in `s`
fn find_done_stamp(s: &str) -> Option<Range<usize>> {
    let bytes = s.as_bytes();
    let stamp_len = DONE_MARKER.len() + TOKEN_LEN;
    (0..bytes.len().saturating_sub(stamp_len - 1)).find_map(|start| {
        let candidate = &bytes[start..start + stamp_len];
        let is_stamp = candidate.starts_with(DONE_MARKER)
            && candidate[DONE_MARKER.len()..].iter().all(|&b| is_alphabet_byte(b));
        is_stamp.then(|| start..start + stamp_len)
    })
}

/// Removes every `@@XXXXX` stamp
fn strip_done_stamps(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(range) = find_done_stamp(rest) {
        out.push_str(&rest[..range.start]);
        rest = &rest[range.end..];
    }
    out.push_str(rest);
    out
}

/// Puts `stamp` on the first word, replacing an existing stamp there
fn stamp_first_word(content: &str, stamp: &str) -> String {
    let (first, rest) = match content.split_once(' ') {
        Some((first, rest)) => (first, rest),
        None => (content, ""),
    };

    let first = match find_done_stamp(first) {
        Some(range) => format!("{}{}{}", &first[..range.start], stamp, &first[range.end..]),
        None => format!("{}{}", first, stamp),
    };

    if rest.is_empty() {
        first
    } else {
        format!("{} {}", first, rest)
    }
}

/// Rewrites the content after a marker when the marker changes.
///
/// - Entering a done or cancelled state stamps the completion time on the
///   first word (replacing an older stamp)
/// - Leaving a done or cancelled state for an active one removes stamps
/// - Anything else leaves the content alone
///
/// The result never has leading whitespace.
pub fn transition_content(
    content: &str,
    old_marker: &str,
    new_marker: &str,
    config: &StatusConfig,
    codec: &Codec,
    now: DateTime<Utc>,
) -> String {
    let content = content.trim_start();
    let was_closed = config.is_done_like(old_marker);
    let is_closed = config.is_done_like(new_marker);

    if is_closed {
        stamp_first_word(content, &codec.done_stamp(now))
    } else if was_closed {
        strip_done_stamps(content).trim_start().to_string()
    } else {
        content.to_string()
    }
}

/// Closes a todo opened with `open_marker`.
///
/// The new marker is the done marker of the first state set whose open
/// marker matches; the content gets a completion stamp on its first word.
pub fn mark_done<'c>(
    content: &str,
    open_marker: &str,
    config: &'c StatusConfig,
    codec: &Codec,
    now: DateTime<Utc>,
) -> Result<(&'c str, String), TransitionError> {
    let done = config
        .done_marker_for(open_marker)
        .ok_or_else(|| TransitionError::NoDoneMarker(open_marker.to_string()))?;
    let content = transition_content(content, open_marker, done, config, codec, now);
    Ok((done, content))
}

/// Builds the content of a new todo: `<priority>@<timestamp> <text>`.
///
/// Line breaks in `text` are flattened to spaces.
pub fn new_todo_content(
    text: &str,
    priority: Option<&str>,
    codec: &Codec,
    now: DateTime<Utc>,
) -> Result<String, TransitionError> {
    let text = text.replace(['\n', '\r'], " ");
    let text = text.trim();
    if text.is_empty() {
        return Err(TransitionError::EmptyContent);
    }

    let priority = priority.unwrap_or(DEFAULT_PRIORITY);
    if !priority.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(TransitionError::InvalidPriority(priority.to_string()));
    }

    Ok(format!("{}{} {}", priority, codec.generate_id(now), text))
}
