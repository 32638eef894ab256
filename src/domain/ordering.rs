//! Deterministic ordering of todo records
//!
//! Content is compared with a fixed collation rather than byte order or a
//! locale collator, so positions stay identical across sessions:
//!
//! | Characters | Rank   |
//! |------------|--------|
//! | `0-9`      | 0-9    |
//! | `A-Z`      | 10-35  |
//! | `a-z`      | 36-61  |
//! | `-`        | 62     |
//! | `_`        | 63     |
//! | space      | 64     |
//! | other      | 65     |
//!
//! Every mode breaks remaining ties by original scan position, which makes
//! the comparator a strict total order over any record set.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::annotation;
use super::record::{ScanPosition, ScannedTodo, TodoRecord};
use super::status::{Rank, StatusConfig};

const OTHER_RANK: u8 = 65;

const fn build_char_ranks() -> [u8; 256] {
    let mut table = [OTHER_RANK; 256];
    let mut i = 0;
    while i < 10 {
        table[b'0' as usize + i] = i as u8;
        i += 1;
    }
    i = 0;
    while i < 26 {
        table[b'A' as usize + i] = 10 + i as u8;
        table[b'a' as usize + i] = 36 + i as u8;
        i += 1;
    }
    table[b'-' as usize] = 62;
    table[b'_' as usize] = 63;
    table[b' ' as usize] = 64;
    table
}

static CHAR_RANKS: [u8; 256] = build_char_ranks();

/// Collation rank of a single character
pub fn char_rank(c: char) -> u8 {
    CHAR_RANKS.get(c as usize).copied().unwrap_or(OTHER_RANK)
}

/// Compares two strings with the fixed collation.
///
/// The first differing character decides; equal ranks fall back to code
/// point order. A strict prefix sorts first.
pub fn compare_content(x: &str, y: &str) -> Ordering {
    let mut xs = x.chars();
    let mut ys = y.chars();
    loop {
        match (xs.next(), ys.next()) {
            (Some(a), Some(b)) if a == b => continue,
            (Some(a), Some(b)) => {
                return char_rank(a).cmp(&char_rank(b)).then_with(|| a.cmp(&b));
            }
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (None, None) => return Ordering::Equal,
        }
    }
}

/// Which records a view shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    #[default]
    All,
    /// Everything that is not done-like
    Active,
    /// Done and cancelled records only
    Closed,
}

impl FilterMode {
    pub fn retains(self, record: &TodoRecord, config: &StatusConfig) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Active => !config.is_done_like(&record.status),
            FilterMode::Closed => config.is_done_like(&record.status),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Active => "active",
            FilterMode::Closed => "closed",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "active" => Ok(FilterMode::Active),
            "closed" | "completed" => Ok(FilterMode::Closed),
            other => Err(format!(
                "unknown filter mode '{}' (expected all, active or closed)",
                other
            )),
        }
    }
}

/// Content used for ordering: parsed main content, or the trimmed raw
/// content when the line has no recognised head
pub fn sort_content(record: &TodoRecord) -> String {
    annotation::parse(&record.content).main_content().to_string()
}

/// Precomputed comparison key for one record
#[derive(Debug, Clone)]
struct SortKey {
    rank: Option<Rank>,
    content: String,
    position: ScanPosition,
}

impl SortKey {
    fn new(todo: &ScannedTodo, mode: FilterMode, config: &StatusConfig) -> Self {
        let rank = match mode {
            FilterMode::Active => Some(config.rank(&todo.record.status)),
            FilterMode::All | FilterMode::Closed => None,
        };
        Self {
            rank,
            content: sort_content(&todo.record),
            position: todo.position,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.rank
            .cmp(&other.rank)
            .then_with(|| compare_content(&self.content, &other.content))
            .then_with(|| self.position.cmp(&other.position))
    }
}

/// Compares two records for `mode`.
///
/// Returns `Equal` only when content, rank (in active mode) and scan
/// position all tie.
pub fn compare(
    a: &ScannedTodo,
    b: &ScannedTodo,
    mode: FilterMode,
    config: &StatusConfig,
) -> Ordering {
    SortKey::new(a, mode, config).compare(&SortKey::new(b, mode, config))
}

/// Filters records by `mode` and returns them in display order
pub fn sort_records(
    records: impl IntoIterator<Item = ScannedTodo>,
    mode: FilterMode,
    config: &StatusConfig,
) -> Vec<ScannedTodo> {
    let mut keyed: Vec<(SortKey, ScannedTodo)> = records
        .into_iter()
        .filter(|todo| mode.retains(&todo.record, config))
        .map(|todo| (SortKey::new(&todo, mode, config), todo))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.compare(b));
    keyed.into_iter().map(|(_, todo)| todo).collect()
}
