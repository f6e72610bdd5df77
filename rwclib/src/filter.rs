//! Entry filtering by file extension.
//!
//! The scanner asks an [`EntryFilter`] whether a validated file should be
//! counted. Rejected entries are skipped silently: they produce no result
//! at all, not even an error.

use std::borrow::Cow;
use std::path::Path;

use crate::error::RwcError;
use crate::Result;

/// Decides whether an entry is counted.
pub trait EntryFilter: Send + Sync {
    fn accepts(&self, path: &Path) -> bool;
}

impl<F> EntryFilter for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn accepts(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Include/exclude lists of file extensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    /// Extensions to count (if empty, count everything not excluded)
    pub include: Vec<String>,
    /// Extensions never counted
    pub exclude: Vec<String>,
}

impl ExtensionFilter {
    /// Create a new empty filter (accepts everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extension to the include list.
    pub fn include(mut self, extension: &str) -> Result<Self> {
        self.include.push(parse_extension(extension)?);
        Ok(self)
    }

    /// Add an extension to the exclude list.
    pub fn exclude(mut self, extension: &str) -> Result<Self> {
        self.exclude.push(parse_extension(extension)?);
        Ok(self)
    }

    /// Add multiple include extensions.
    pub fn include_many<S: AsRef<str>>(mut self, extensions: &[S]) -> Result<Self> {
        for extension in extensions {
            self = self.include(extension.as_ref())?;
        }
        Ok(self)
    }

    /// Add multiple exclude extensions.
    pub fn exclude_many<S: AsRef<str>>(mut self, extensions: &[S]) -> Result<Self> {
        for extension in extensions {
            self = self.exclude(extension.as_ref())?;
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }

    /// Check if a path passes the filter.
    ///
    /// A path passes if:
    /// 1. Its extension is not in the exclude list
    /// 2. Its extension is in the include list (or include is empty)
    ///
    /// Exclusion wins when an extension appears in both lists. The extension
    /// is the text after the last `.` of the file name, so `Makefile` has the
    /// extension `""` and `.bashrc` has `bashrc`.
    pub fn matches(&self, path: &Path) -> bool {
        let ext = extension_of(path);

        if self.exclude.iter().any(|x| *x == ext) {
            return false;
        }

        if self.include.is_empty() {
            return true;
        }

        self.include.iter().any(|x| *x == ext)
    }
}

impl EntryFilter for ExtensionFilter {
    fn accepts(&self, path: &Path) -> bool {
        self.matches(path)
    }
}

/// Accept `txt` and `.txt` alike.
/// Text after the last `.` of the file name, or `""` when there is none.
///
/// Unlike [`Path::extension`], a leading dot counts: `.bashrc` has the
/// extension `bashrc`.
fn extension_of(path: &Path) -> Cow<'_, str> {
    let Some(name) = path.file_name() else {
        return Cow::Borrowed("");
    };
    match name.to_string_lossy() {
        Cow::Borrowed(name) => Cow::Borrowed(name.rsplit_once('.').map_or("", |(_, ext)| ext)),
        Cow::Owned(name) => {
            Cow::Owned(name.rsplit_once('.').map_or("", |(_, ext)| ext).to_string())
        }
    }
}

fn parse_extension(raw: &str) -> Result<String> {
    let ext = raw.strip_prefix('.').unwrap_or(raw);
    let invalid = |message: &str| RwcError::InvalidExtension {
        extension: raw.to_string(),
        message: message.to_string(),
    };

    if ext.is_empty() {
        return Err(invalid("extension is empty"));
    }
    if ext.contains(['/', '\\']) {
        return Err(invalid("extension contains a path separator"));
    }
    Ok(ext.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = ExtensionFilter::new();

        assert!(filter.is_empty());
        assert!(filter.matches(Path::new("file3.txt")));
        assert!(filter.matches(Path::new("Makefile")));
        assert!(filter.matches(Path::new("dir/archive.tar")));
    }

    #[test]
    fn test_filter_with_exclude() {
        let filter = ExtensionFilter::new().exclude_many(&["jpg", "mov", "png"]).unwrap();

        assert!(filter.matches(Path::new("file3.txt")));
        assert!(!filter.matches(Path::new("file9.jpg")));
        assert!(!filter.matches(Path::new("file10.mov")));
        assert!(!filter.matches(Path::new("media/file11.png")));
    }

    #[test]
    fn test_filter_with_include() {
        let filter = ExtensionFilter::new().include_many(&["txt", "md"]).unwrap();

        assert!(filter.matches(Path::new("file3.txt")));
        assert!(filter.matches(Path::new("file12.md")));
        assert!(!filter.matches(Path::new("file7.tar")));
        assert!(!filter.matches(Path::new("Makefile")));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let filter = ExtensionFilter::new()
            .include("txt")
            .unwrap()
            .exclude("txt")
            .unwrap();

        assert!(!filter.matches(Path::new("file3.txt")));
    }

    #[test]
    fn test_leading_dot_is_accepted() {
        let filter = ExtensionFilter::new().exclude(".tar").unwrap();

        assert_eq!(filter.exclude, vec!["tar".to_string()]);
        assert!(!filter.matches(Path::new("file7.tar")));
    }

    #[test]
    fn test_invalid_extension() {
        let result = ExtensionFilter::new().include("");
        assert!(result.is_err());

        let result = ExtensionFilter::new().exclude("a/b");
        if let Err(RwcError::InvalidExtension { extension, .. }) = result {
            assert_eq!(extension, "a/b");
        } else {
            panic!("Expected InvalidExtension error");
        }
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of(Path::new("file3.txt")), "txt");
        assert_eq!(extension_of(Path::new("dir/archive.tar.gz")), "gz");
        assert_eq!(extension_of(Path::new("Makefile")), "");
        assert_eq!(extension_of(Path::new("trailing.")), "");
        assert_eq!(extension_of(Path::new(".bashrc")), "bashrc");
        assert_eq!(extension_of(Path::new("home/.config.toml")), "toml");
    }

    #[test]
    fn test_dotfile_matches_its_name() {
        let filter = ExtensionFilter::new().exclude("bashrc").unwrap();

        assert!(!filter.matches(Path::new(".bashrc")));
        assert!(!filter.matches(Path::new("home/.bashrc")));
        assert!(filter.matches(Path::new("bashrc")));
    }

    #[test]
    fn test_closure_filter() {
        let filter = |path: &Path| path.starts_with("src");

        assert!(filter.accepts(Path::new("src/lib.rs")));
        assert!(!filter.accepts(Path::new("tests/cli.rs")));
    }
}
