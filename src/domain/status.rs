//! Status markers and their meaning
//!
//! A state set is a user-defined vocabulary of up to four markers with
//! fixed slot meanings:
//!
//! | Slot | Meaning   | Example       |
//! |------|-----------|---------------|
//! | 0    | open      | `TODO`        |
//! | 1    | doing     | `DOING`       |
//! | 2    | done      | `DONE`        |
//! | 3    | cancelled | `CANCELLED`   |
//!
//! Markers are matched exactly. When several sets mention the same marker,
//! the first set wins. An empty configuration is legal: nothing is
//! done-like and every marker ranks as [`Rank::Unknown`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const OPEN_SLOT: usize = 0;
pub const DOING_SLOT: usize = 1;
pub const DONE_SLOT: usize = 2;
pub const CANCELLED_SLOT: usize = 3;

/// Maximum markers in one state set
pub const MAX_SLOTS: usize = 4;

#[derive(Debug, Error, PartialEq)]
pub enum StatusError {
    #[error("State set must hold 1 to 4 markers, got {0}")]
    InvalidSetLength(usize),

    #[error("Marker '{0}' is not part of any 4-state cycle")]
    NotInCycle(String),
}

/// Ordered list of 1..=4 markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct StatusStateSet {
    markers: Vec<String>,
}

impl StatusStateSet {
    pub fn new<I, S>(markers: I) -> Result<Self, StatusError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let markers: Vec<String> = markers.into_iter().map(Into::into).collect();
        if markers.is_empty() || markers.len() > MAX_SLOTS {
            return Err(StatusError::InvalidSetLength(markers.len()));
        }
        Ok(Self { markers })
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Marker at a slot, if the set is long enough
    pub fn slot(&self, slot: usize) -> Option<&str> {
        self.markers.get(slot).map(String::as_str)
    }

    pub fn open(&self) -> Option<&str> {
        self.slot(OPEN_SLOT)
    }

    pub fn doing(&self) -> Option<&str> {
        self.slot(DOING_SLOT)
    }

    pub fn done(&self) -> Option<&str> {
        self.slot(DONE_SLOT)
    }

    pub fn cancelled(&self) -> Option<&str> {
        self.slot(CANCELLED_SLOT)
    }

    /// Returns true if `marker` sits in the done or cancelled slot
    pub fn is_done_like(&self, marker: &str) -> bool {
        self.done() == Some(marker) || self.cancelled() == Some(marker)
    }

    /// First slot holding `marker`
    pub fn position(&self, marker: &str) -> Option<usize> {
        self.markers.iter().position(|m| m == marker)
    }
}

impl TryFrom<Vec<String>> for StatusStateSet {
    type Error = StatusError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StatusStateSet> for Vec<String> {
    fn from(set: StatusStateSet) -> Self {
        set.markers
    }
}

/// Semantic rank of a status; lower sorts first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Doing = 1,
    Todo = 2,
    OtherActive = 3,
    DoneLike = 4,
    Unknown = 5,
}

impl Rank {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Rank::Doing => "doing",
            Rank::Todo => "todo",
            Rank::OtherActive => "other_active",
            Rank::DoneLike => "done_like",
            Rank::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction for stepping through a state cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleDirection {
    #[default]
    Forward,
    Backward,
}

/// All configured state sets, in priority order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusConfig {
    sets: Vec<StatusStateSet>,
}

impl StatusConfig {
    pub fn new(sets: Vec<StatusStateSet>) -> Self {
        Self { sets }
    }

    /// Builds a config from raw marker lists, rejecting bad set lengths
    pub fn from_markers(raw: Vec<Vec<String>>) -> Result<Self, StatusError> {
        let sets = raw
            .into_iter()
            .map(StatusStateSet::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { sets })
    }

    pub fn sets(&self) -> &[StatusStateSet] {
        &self.sets
    }

    /// True when no state sets are configured
    pub fn is_unconfigured(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn is_done_like(&self, marker: &str) -> bool {
        self.sets.iter().any(|set| set.is_done_like(marker))
    }

    pub fn rank(&self, marker: &str) -> Rank {
        if self.is_unconfigured() {
            return Rank::Unknown;
        }
        if self.is_done_like(marker) {
            return Rank::DoneLike;
        }
        for set in &self.sets {
            if set.doing() == Some(marker) {
                return Rank::Doing;
            }
            if set.open() == Some(marker) {
                return Rank::Todo;
            }
        }
        // Unrecognised markers still count as active work
        Rank::OtherActive
    }

    /// Next marker in the first full 4-state set containing `marker`
    pub fn cycle(&self, marker: &str, direction: CycleDirection) -> Result<&str, StatusError> {
        let (set, idx) = self
            .sets
            .iter()
            .filter(|set| set.len() == MAX_SLOTS)
            .find_map(|set| set.position(marker).map(|idx| (set, idx)))
            .ok_or_else(|| StatusError::NotInCycle(marker.to_string()))?;

        let next = match direction {
            CycleDirection::Forward => (idx + 1) % MAX_SLOTS,
            CycleDirection::Backward => (idx + MAX_SLOTS - 1) % MAX_SLOTS,
        };
        Ok(&set.markers[next])
    }

    /// Done marker paired with an open marker (first set with both)
    pub fn done_marker_for(&self, open_marker: &str) -> Option<&str> {
        self.sets
            .iter()
            .filter(|set| set.open() == Some(open_marker))
            .find_map(StatusStateSet::done)
    }

    /// Open marker of the first set, used when creating new todos
    pub fn primary_open_marker(&self) -> Option<&str> {
        self.sets.first().and_then(StatusStateSet::open)
    }
}

/// Rank of `marker` under `config`
pub fn rank(marker: &str, config: &StatusConfig) -> Rank {
    config.rank(marker)
}

/// Whether `marker` is a done or cancelled marker under `config`
pub fn is_done_like(marker: &str, config: &StatusConfig) -> bool {
    config.is_done_like(marker)
}
