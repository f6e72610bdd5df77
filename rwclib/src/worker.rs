//! Per-unit scan task.
//!
//! A worker turns one [`InputSpec`] into at most one [`ScanResult`]:
//!
//! 1. Take a limiter slot (may block)
//! 2. For file units, validate in fixed order: existence, directory,
//!    owner-read permission, then the entry filter. A filtered entry yields
//!    no result.
//! 3. Open the input and stream it through the classifier
//! 4. Give the slot back (on every path, by dropping the guard)

use std::io::Read;
use std::path::Path;

use crate::classify::count_stream;
use crate::error::ScanError;
use crate::filter::EntryFilter;
use crate::fs::FileSystem;
use crate::input::{InputSpec, Source};
use crate::limiter::Limiter;
use crate::stats::ScanResult;

/// Scan one unit. `None` means the entry was filtered out.
pub fn scan_unit(spec: InputSpec, fs: &dyn FileSystem, limiter: &Limiter) -> Option<ScanResult> {
    let (label, source, metrics, filter) = spec.into_parts();
    let _span = tracing::debug_span!("unit", path = %label).entered();

    let _slot = limiter.acquire();

    // Declared after the slot so the input is closed before the slot is freed.
    let mut reader = match source {
        Source::Stream(reader) => reader,
        Source::Path(path) => match open_validated(fs, &label, &path, filter.as_ref()) {
            Ok(Some(reader)) => reader,
            Ok(None) => {
                tracing::debug!("skipped by extension filter");
                return None;
            }
            Err(err) => {
                tracing::debug!(error = %err, "validation failed");
                return Some(ScanResult::failed(label, err));
            }
        },
    };

    match count_stream(&mut reader, metrics) {
        Ok(counts) => {
            tracing::debug!(
                lines = counts.lines,
                words = counts.words,
                chars = counts.chars,
                "counted"
            );
            Some(ScanResult::counted(label, counts))
        }
        Err(source) => {
            tracing::debug!(error = %source, "read failed");
            let err = ScanError::StreamFailure {
                path: label.clone().into(),
                source,
            };
            Some(ScanResult::failed(label, err))
        }
    }
}

/// Validate `path` and open it. `Ok(None)` means the filter rejected it.
fn open_validated(
    fs: &dyn FileSystem,
    display: &str,
    path: &Path,
    filter: &dyn EntryFilter,
) -> Result<Option<Box<dyn Read + Send>>, ScanError> {
    let stat = fs.stat(path).map_err(|e| ScanError::from_io(display, e))?;

    if stat.is_dir {
        return Err(ScanError::IsDirectory {
            path: display.into(),
        });
    }
    if !stat.is_readable() {
        return Err(ScanError::PermissionDenied {
            path: display.into(),
        });
    }
    if !filter.accepts(path) {
        return Ok(None);
    }

    let reader = fs.open(path).map_err(|e| ScanError::from_io(display, e))?;
    Ok(Some(reader))
}
