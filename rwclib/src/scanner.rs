//! Fan-out/fan-in scan orchestration.
//!
//! Units are queued as `(index, spec)` pairs on a bounded channel and drained
//! by a pool of at most `min(K, n)` scoped threads, so a huge input list
//! never means a huge number of threads. All workers share one [`Limiter`].
//! Outcomes come back tagged with their index and land in pre-allocated
//! slots, so results follow submission order no matter which unit finishes
//! first.

use std::io::{self, Read};
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crossbeam::channel;

use crate::error::ScanError;
use crate::fs::FileSystem;
use crate::input::InputSpec;
use crate::limiter::Limiter;
use crate::options::Metrics;
use crate::stats::ScanResult;
use crate::worker::scan_unit;

/// Queued units per worker thread.
const QUEUE_DEPTH: usize = 2;

/// Output slot for one unit.
#[derive(Debug)]
enum Slot {
    /// No outcome delivered; the unit's scan panicked
    Pending,
    /// Filtered out, contributes no result
    Skipped,
    Filled(ScanResult),
}

/// Configured scan over a filesystem.
///
/// # Example
///
/// ```rust
/// use rwclib::{Counts, InputSpec, MemFs, Scanner};
/// use std::num::NonZeroUsize;
///
/// let fs = MemFs::new()
///     .file("file3.txt", "single line\nand\ndouble line\nin\nfile")
///     .file("file2.txt", "single_line");
///
/// let results = Scanner::new(&fs)
///     .max_open(NonZeroUsize::new(2).unwrap())
///     .run(vec![
///         InputSpec::path("file3.txt", "file3.txt"),
///         InputSpec::path("file2.txt", "file2.txt"),
///     ]);
///
/// assert_eq!(results.len(), 3);
/// assert_eq!(results[2].path, "total");
/// assert_eq!(results[2].counts(), &Counts::new(4, 8, 46));
/// ```
pub struct Scanner<'fs> {
    fs: &'fs dyn FileSystem,
    limiter: Arc<Limiter>,
    stdin_metrics: Metrics,
    stdin: Option<Box<dyn Read + Send>>,
}

impl<'fs> Scanner<'fs> {
    pub fn new(fs: &'fs dyn FileSystem) -> Self {
        Self {
            fs,
            limiter: Arc::new(Limiter::default()),
            stdin_metrics: Metrics::all(),
            stdin: None,
        }
    }

    /// Cap on concurrently open inputs.
    pub fn max_open(mut self, max: NonZeroUsize) -> Self {
        self.limiter = Arc::new(Limiter::new(max));
        self
    }

    /// Share a limiter with other scans, so the cap holds across all of them.
    pub fn limiter(mut self, limiter: Arc<Limiter>) -> Self {
        self.limiter = limiter;
        self
    }

    /// Metrics for the standard-input unit used when no specs are given.
    pub fn stdin_metrics(mut self, metrics: Metrics) -> Self {
        self.stdin_metrics = metrics;
        self
    }

    /// Stream to read instead of the process standard input when no specs
    /// are given.
    pub fn stdin(mut self, reader: impl Read + Send + 'static) -> Self {
        self.stdin = Some(Box::new(reader));
        self
    }

    /// Scan every spec and return results in submission order.
    ///
    /// Filtered specs produce no result. When two or more results remain, an
    /// aggregate row labelled `total` is appended; it sums only the results
    /// without errors. This never fails: per-unit failures are carried in the
    /// results.
    pub fn run(self, specs: Vec<InputSpec>) -> Vec<ScanResult> {
        let specs = if specs.is_empty() {
            let stdin: Box<dyn Read + Send> = match self.stdin {
                Some(reader) => reader,
                None => Box::new(io::stdin()),
            };
            vec![InputSpec::stream(stdin).metrics(self.stdin_metrics)]
        } else {
            specs
        };

        let fs = self.fs;
        let limiter: &Limiter = &self.limiter;
        let labels: Vec<String> = specs.iter().map(|s| s.display_path().to_string()).collect();
        let mut slots: Vec<Slot> = labels.iter().map(|_| Slot::Pending).collect();
        let workers = limiter.capacity().get().min(specs.len());

        tracing::debug!(
            units = specs.len(),
            workers,
            max_open = limiter.capacity().get(),
            "scan started"
        );

        let (work_tx, work_rx) = channel::bounded::<(usize, InputSpec)>(workers * QUEUE_DEPTH);
        let (done_tx, done_rx) = channel::unbounded::<(usize, Slot)>();

        let joined = crossbeam::thread::scope(|s| {
            for _ in 0..workers {
                let work_rx = work_rx.clone();
                let done_tx = done_tx.clone();
                s.spawn(move |_| {
                    while let Ok((index, spec)) = work_rx.recv() {
                        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                            scan_unit(spec, fs, limiter)
                        }));
                        let slot = match outcome {
                            Ok(Some(result)) => Slot::Filled(result),
                            Ok(None) => Slot::Skipped,
                            Err(_) => {
                                tracing::warn!(index, "scan of a unit panicked");
                                continue;
                            }
                        };
                        if done_tx.send((index, slot)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(work_rx);
            drop(done_tx);

            for item in specs.into_iter().enumerate() {
                if work_tx.send(item).is_err() {
                    break;
                }
            }
            drop(work_tx);

            for (index, slot) in done_rx.iter() {
                slots[index] = slot;
            }
        });
        if joined.is_err() {
            tracing::warn!("a scan worker panicked");
        }

        let mut results: Vec<ScanResult> = slots
            .into_iter()
            .zip(labels)
            .filter_map(|(slot, label)| match slot {
                Slot::Filled(result) => Some(result),
                Slot::Skipped => None,
                Slot::Pending => {
                    let err = ScanError::Other {
                        path: label.clone().into(),
                        source: io::Error::other("worker panicked"),
                    };
                    Some(ScanResult::failed(label, err))
                }
            })
            .collect();

        if results.len() >= 2 {
            let total = ScanResult::aggregate(&results);
            results.push(total);
        }

        tracing::debug!(results = results.len(), "scan finished");
        results
    }
}

/// Scan `specs` against `fs` with the default limit of
/// [`MAX_OPEN_FILES`](crate::limiter::MAX_OPEN_FILES) open inputs.
///
/// With no specs, standard input is counted with every metric enabled.
pub fn wc(fs: &dyn FileSystem, specs: Vec<InputSpec>) -> Vec<ScanResult> {
    Scanner::new(fs).run(specs)
}
