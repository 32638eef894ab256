//! Compact timestamp tokens
//!
//! Token Format:
//! - Exactly 5 characters from the URL-safe base64 alphabet `A-Za-z0-9-_`
//! - Value is whole seconds since the custom epoch (2025-01-01T00:00:00Z)
//! - 30 bits, packed as five 6-bit groups, most significant first
//!
//! Seconds past `2^30 - 1` wrap around (roughly the year 2059); instants
//! before the epoch clamp to the epoch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Length of every token
pub const TOKEN_LEN: usize = 5;

/// Unix seconds of 2025-01-01T00:00:00Z
pub const CUSTOM_EPOCH_SECS: i64 = 1_735_689_600;

/// Digits used by the token encoding, index = digit value
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

const VALUE_MASK: u64 = (1 << 30) - 1;
const GROUP_MASK: u64 = 0x3F;
const NOT_IN_ALPHABET: u8 = 0xFF;

const fn build_index() -> [u8; 256] {
    let mut table = [NOT_IN_ALPHABET; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

static ALPHABET_INDEX: [u8; 256] = build_index();

#[derive(Debug, Error, PartialEq)]
pub enum TokenError {
    #[error("Invalid timestamp token length: expected 5 characters, got {0}")]
    InvalidLength(usize),

    #[error("Invalid timestamp token character '{0}' (allowed: A-Z a-z 0-9 - _)")]
    InvalidCharacter(char),
}

/// Returns the digit value of `c` in the token alphabet
pub fn alphabet_index(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    match ALPHABET_INDEX[c as usize] {
        NOT_IN_ALPHABET => None,
        idx => Some(idx),
    }
}

/// Returns true if `b` is one of the 64 token digits
pub fn is_alphabet_byte(b: u8) -> bool {
    ALPHABET_INDEX[b as usize] != NOT_IN_ALPHABET
}

/// Packs a 30-bit value into five alphabet digits
fn pack(value: u64) -> [u8; TOKEN_LEN] {
    let value = value & VALUE_MASK;
    let mut out = [0u8; TOKEN_LEN];
    for (i, slot) in out.iter_mut().enumerate() {
        let shift = 6 * (TOKEN_LEN - 1 - i);
        *slot = ALPHABET[((value >> shift) & GROUP_MASK) as usize];
    }
    out
}

/// Unpacks five alphabet digits into their value
fn unpack(token: &str) -> Result<u32, TokenError> {
    let count = token.chars().count();
    if count != TOKEN_LEN {
        return Err(TokenError::InvalidLength(count));
    }
    token.chars().try_fold(0u32, |acc, c| {
        alphabet_index(c)
            .map(|digit| (acc << 6) | u32::from(digit))
            .ok_or(TokenError::InvalidCharacter(c))
    })
}

/// A validated 5-character timestamp token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimestampToken {
    raw: String,
}

impl TimestampToken {
    /// Returns the token text
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the encoded seconds since the epoch
    pub fn seconds(&self) -> u32 {
        // Validated on construction
        unpack(&self.raw).unwrap_or(0)
    }

    /// Returns the instant this token encodes, relative to the default epoch
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        Codec::default().instant_of(self.seconds())
    }
}

impl fmt::Display for TimestampToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for TimestampToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        unpack(s)?;
        Ok(Self { raw: s.to_string() })
    }
}

impl TryFrom<String> for TimestampToken {
    type Error = TokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        unpack(&value)?;
        Ok(Self { raw: value })
    }
}

impl From<TimestampToken> for String {
    fn from(token: TimestampToken) -> Self {
        token.raw
    }
}

/// Encoder/decoder bound to an epoch
///
/// The epoch is carried by value so tests can pin both the epoch and
/// the "now" they encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    epoch_secs: i64,
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            epoch_secs: CUSTOM_EPOCH_SECS,
        }
    }
}

impl Codec {
    /// Creates a codec measuring from `epoch` (sub-second part is dropped)
    pub fn with_epoch(epoch: DateTime<Utc>) -> Self {
        Self {
            epoch_secs: epoch.timestamp(),
        }
    }

    /// Returns the epoch as an instant
    pub fn epoch(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.epoch_secs, 0)
    }

    /// Encodes an instant, clamping to the epoch and wrapping past 30 bits
    pub fn encode(&self, instant: DateTime<Utc>) -> TimestampToken {
        let elapsed = instant.timestamp().saturating_sub(self.epoch_secs).max(0) as u64;
        let digits = pack(elapsed);
        TimestampToken {
            raw: digits.iter().map(|&b| b as char).collect(),
        }
    }

    /// Decodes a token, returning `None` for anything that is not exactly
    /// five alphabet characters
    pub fn decode(&self, token: &str) -> Option<DateTime<Utc>> {
        let seconds = unpack(token).ok()?;
        self.instant_of(seconds)
    }

    fn instant_of(&self, seconds: u32) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.epoch_secs + i64::from(seconds), 0)
    }

    /// Returns a fresh timestamp id (`@` + token) for `now`
    pub fn generate_id(&self, now: DateTime<Utc>) -> String {
        format!("@{}", self.encode(now))
    }

    /// Returns a completion stamp (`@@` + token) for `now`
    pub fn done_stamp(&self, now: DateTime<Utc>) -> String {
        format!("@@{}", self.encode(now))
    }
}

/// Encodes an instant relative to the default epoch
pub fn encode(instant: DateTime<Utc>) -> TimestampToken {
    Codec::default().encode(instant)
}

/// Decodes a token relative to the default epoch
pub fn decode(token: &str) -> Option<DateTime<Utc>> {
    Codec::default().decode(token)
}
