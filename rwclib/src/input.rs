//! Scan units as submitted by the caller.

use std::fmt;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use crate::filter::{EntryFilter, ExtensionFilter};
use crate::options::Metrics;

/// Where a unit's bytes come from.
pub enum Source {
    /// A path looked up through the scanner's filesystem
    Path(PathBuf),
    /// An already-open stream; skips all path validation
    Stream(Box<dyn Read + Send>),
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Source::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// One unit to scan.
///
/// A spec is handed to exactly one worker, which consumes it.
pub struct InputSpec {
    display_path: String,
    source: Source,
    metrics: Metrics,
    filter: Arc<dyn EntryFilter>,
}

impl InputSpec {
    /// A file unit. `display_path` is what results report; `resolved` is what
    /// the filesystem is asked for.
    pub fn path(display_path: impl Into<String>, resolved: impl Into<PathBuf>) -> Self {
        Self {
            display_path: display_path.into(),
            source: Source::Path(resolved.into()),
            metrics: Metrics::all(),
            filter: Arc::new(ExtensionFilter::new()),
        }
    }

    /// A stream unit, reported with an empty path like `wc` does for stdin.
    pub fn stream(reader: impl Read + Send + 'static) -> Self {
        Self {
            display_path: String::new(),
            source: Source::Stream(Box::new(reader)),
            metrics: Metrics::all(),
            filter: Arc::new(ExtensionFilter::new()),
        }
    }

    pub fn metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    /// Set the entry filter. The same filter is usually shared by every spec
    /// of a scan.
    pub fn filter(mut self, filter: Arc<dyn EntryFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn display_path(&self) -> &str {
        &self.display_path
    }

    pub(crate) fn into_parts(self) -> (String, Source, Metrics, Arc<dyn EntryFilter>) {
        (self.display_path, self.source, self.metrics, self.filter)
    }
}

impl fmt::Debug for InputSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputSpec")
            .field("display_path", &self.display_path)
            .field("source", &self.source)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::Path;

    #[test]
    fn test_path_spec_defaults() {
        let spec = InputSpec::path("notes.txt", "/home/me/notes.txt");

        assert_eq!(spec.display_path(), "notes.txt");
        let (_, source, metrics, _) = spec.into_parts();
        assert!(matches!(source, Source::Path(p) if p == Path::new("/home/me/notes.txt")));
        assert_eq!(metrics, Metrics::all());
    }

    #[test]
    fn test_stream_spec_has_empty_path() {
        let spec = InputSpec::stream(Cursor::new(b"xyz abc".to_vec()))
            .metrics(Metrics::none().with_words(true));

        assert_eq!(spec.display_path(), "");
        assert!(format!("{spec:?}").contains("Stream(..)"));
        let (_, source, metrics, _) = spec.into_parts();
        assert!(matches!(source, Source::Stream(_)));
        assert_eq!(metrics, Metrics::none().with_words(true));
    }
}
