use serde::{Deserialize, Serialize};

/// A labelled span of field ordinals, half-open over 0-based indices.
///
/// Layout files express ranges with 1-based inclusive field numbers the
/// way legacy layout sheets do; [`NamedRange::from_ordinals`] converts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRange {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl NamedRange {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }

    /// Build from 1-based inclusive field ordinals (e.g. fields 21..=50).
    pub fn from_ordinals(first: usize, last: usize, label: impl Into<String>) -> Self {
        Self {
            start: first.saturating_sub(1),
            end: last,
            label: label.into(),
        }
    }
}

/// A labelled byte span within a binary buffer, half-open over absolute
/// offsets into the whole buffer (not per-record-relative).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteWindow {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl ByteWindow {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }
}
