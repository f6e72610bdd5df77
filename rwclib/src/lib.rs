//! # rwclib
//!
//! A concurrent `wc` engine: counts lines, words and bytes across many inputs
//! while keeping the number of simultaneously open inputs under a fixed cap.
//!
//! ## Overview
//!
//! - **Limiter**: counting semaphore bounding concurrently open inputs
//!   (default [`MAX_OPEN_FILES`])
//! - **Classifier**: single forward pass over a byte stream with a fixed-size
//!   buffer, producing line, word and byte counts
//! - **Worker**: validates, opens and counts one unit while holding a slot
//! - **Scanner**: runs each unit as a task on a bounded pool of worker
//!   threads, returns results in submission order and appends a `total`
//!   row when there are two or more
//!
//! ## Counting rules
//!
//! - **lines**: number of `\n` bytes; an unterminated last line is not counted
//! - **words**: maximal runs of non-whitespace bytes
//! - **chars**: number of bytes, so multi-byte UTF-8 characters count once per
//!   byte
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use rwclib::{wc, Counts, ExtensionFilter, InputSpec, MemFs, ScanErrorKind};
//!
//! let fs = MemFs::new()
//!     .file("notes.txt", "this\nis\na\nmulti line\ntext")
//!     .file("photo.jpg", "not text")
//!     .dir("docs");
//!
//! let filter = Arc::new(ExtensionFilter::new().exclude("jpg").unwrap());
//! let specs = ["notes.txt", "photo.jpg", "docs"]
//!     .into_iter()
//!     .map(|p| InputSpec::path(p, p).filter(filter.clone()))
//!     .collect();
//!
//! let results = wc(&fs, specs);
//!
//! // photo.jpg is filtered out; docs fails; a total row follows
//! assert_eq!(results.len(), 3);
//! assert_eq!(results[0].counts(), &Counts::new(4, 6, 25));
//! assert_eq!(results[1].error().unwrap().kind(), ScanErrorKind::IsDirectory);
//! assert_eq!(results[2].path, "total");
//! assert_eq!(results[2].counts(), &Counts::new(4, 6, 25));
//! ```

pub mod classify;
pub mod error;
pub mod filter;
pub mod fs;
pub mod input;
pub mod limiter;
pub mod options;
pub mod scanner;
pub mod stats;
pub mod worker;

pub use classify::{count_stream, Classifier, WordState};
pub use error::{RwcError, ScanError, ScanErrorKind};
pub use filter::{EntryFilter, ExtensionFilter};
pub use fs::{FileStat, FileSystem, MemFs, OsFs};
pub use input::InputSpec;
pub use limiter::{Limiter, SlotGuard, MAX_OPEN_FILES};
pub use options::Metrics;
pub use scanner::{wc, Scanner};
pub use stats::{Counts, ScanResult, TOTAL_LABEL};

/// Result type for rwclib operations
pub type Result<T> = std::result::Result<T, RwcError>;
