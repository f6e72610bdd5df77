//! Count and result types produced by a scan

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Display path of the aggregate row.
pub const TOTAL_LABEL: &str = "total";

/// Line, word and byte counts for one unit (or a sum of units)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counts {
    /// Line-feed bytes seen
    pub lines: u64,
    /// Whitespace-separated words seen
    pub words: u64,
    /// Bytes seen (not decoded characters)
    pub chars: u64,
}

impl Counts {
    pub fn new(lines: u64, words: u64, chars: u64) -> Self {
        Self {
            lines,
            words,
            chars,
        }
    }
}

impl Add for Counts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            lines: self.lines + other.lines,
            words: self.words + other.words,
            chars: self.chars + other.chars,
        }
    }
}

impl AddAssign for Counts {
    fn add_assign(&mut self, other: Self) {
        self.lines += other.lines;
        self.words += other.words;
        self.chars += other.chars;
    }
}

impl Sum for Counts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Counts::default(), Add::add)
    }
}

impl<'a> Sum<&'a Counts> for Counts {
    fn sum<I: Iterator<Item = &'a Counts>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// Outcome of scanning one unit, or the aggregate row.
///
/// A result holds either counts or an error, never both: failed results
/// always carry zero counts.
#[derive(Debug)]
pub struct ScanResult {
    /// Path as the caller named it (empty for standard input)
    pub path: String,
    counts: Counts,
    error: Option<ScanError>,
    total: bool,
}

impl ScanResult {
    /// A successfully scanned unit.
    pub fn counted(path: impl Into<String>, counts: Counts) -> Self {
        Self {
            path: path.into(),
            counts,
            error: None,
            total: false,
        }
    }

    /// A unit that failed; its counts are zero.
    pub fn failed(path: impl Into<String>, error: ScanError) -> Self {
        Self {
            path: path.into(),
            counts: Counts::default(),
            error: Some(error),
            total: false,
        }
    }

    /// The aggregate row over `results`. Failed results contribute nothing.
    pub fn aggregate(results: &[ScanResult]) -> Self {
        let counts = results
            .iter()
            .filter(|r| r.is_ok())
            .map(ScanResult::counts)
            .sum();
        Self {
            path: TOTAL_LABEL.to_string(),
            counts,
            error: None,
            total: true,
        }
    }

    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    pub fn error(&self) -> Option<&ScanError> {
        self.error.as_ref()
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Whether this is the aggregate row appended after all units.
    pub fn is_total(&self) -> bool {
        self.total
    }
}

impl Serialize for ScanResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ScanResult", 4)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("total", &self.total)?;
        match &self.error {
            None => {
                state.serialize_field("counts", &self.counts)?;
                state.skip_field("error")?;
            }
            Some(err) => {
                state.skip_field("counts")?;
                state.serialize_field(
                    "error",
                    &ErrorView {
                        kind: err.kind(),
                        message: err.to_string(),
                    },
                )?;
            }
        }
        state.end()
    }
}

#[derive(Serialize)]
struct ErrorView {
    kind: crate::error::ScanErrorKind,
    message: String,
}
