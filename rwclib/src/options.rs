//! Selection of which metrics a scan computes.

use serde::{Deserialize, Serialize};

/// Which counts to compute for a unit.
///
/// A disabled metric stays 0 in the returned counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Count line-feed bytes
    pub lines: bool,
    /// Count whitespace-separated words
    pub words: bool,
    /// Count bytes
    pub chars: bool,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::all()
    }
}

impl Metrics {
    /// Compute every metric (default)
    pub fn all() -> Self {
        Self {
            lines: true,
            words: true,
            chars: true,
        }
    }

    /// Compute nothing
    pub fn none() -> Self {
        Self {
            lines: false,
            words: false,
            chars: false,
        }
    }

    /// Builder: set line counting
    pub fn with_lines(mut self, enabled: bool) -> Self {
        self.lines = enabled;
        self
    }

    /// Builder: set word counting
    pub fn with_words(mut self, enabled: bool) -> Self {
        self.words = enabled;
        self
    }

    /// Builder: set byte counting
    pub fn with_chars(mut self, enabled: bool) -> Self {
        self.chars = enabled;
        self
    }

    /// True when no metric is enabled.
    pub fn is_empty(&self) -> bool {
        !(self.lines || self.words || self.chars)
    }

    /// `wc` semantics: asking for nothing means asking for everything.
    pub fn or_all(self) -> Self {
        if self.is_empty() {
            Self::all()
        } else {
            self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let m = Metrics::none().with_lines(true).with_chars(true);
        assert!(m.lines);
        assert!(!m.words);
        assert!(m.chars);
        assert!(!m.is_empty());
    }

    #[test]
    fn test_or_all_promotes_empty_selection() {
        assert_eq!(Metrics::none().or_all(), Metrics::all());

        let words = Metrics::none().with_words(true);
        assert_eq!(words.or_all(), words);
    }
}
