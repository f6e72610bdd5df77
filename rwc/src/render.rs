//! Rendering of scan results for the terminal

use std::io::{self, Write};

use console::Style;
use rwclib::{Metrics, ScanResult};

/// Width of each right-aligned count column
const CELL_WIDTH: usize = 8;

/// Format one successful row: a right-aligned cell per enabled metric, in
/// line/word/char order, then the path.
pub fn format_row(result: &ScanResult, metrics: &Metrics) -> String {
    let counts = result.counts();
    let mut row = String::new();
    if metrics.lines {
        row.push_str(&format!("{:>width$} ", counts.lines, width = CELL_WIDTH));
    }
    if metrics.words {
        row.push_str(&format!("{:>width$} ", counts.words, width = CELL_WIDTH));
    }
    if metrics.chars {
        row.push_str(&format!("{:>width$} ", counts.chars, width = CELL_WIDTH));
    }
    row.push_str(&result.path);
    row
}

/// Write counts to `out` and error messages to `err`.
///
/// Returns whether any result carried an error. The total row is bold when
/// `styled` is set.
pub fn render_text(
    results: &[ScanResult],
    metrics: &Metrics,
    styled: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> io::Result<bool> {
    let total_style = Style::new().bold().force_styling(true);
    let mut had_errors = false;

    for result in results {
        if let Some(e) = result.error() {
            had_errors = true;
            writeln!(err, "{e}")?;
            continue;
        }

        let row = format_row(result, metrics);
        if styled && result.is_total() {
            writeln!(out, "{}", total_style.apply_to(row))?;
        } else {
            writeln!(out, "{row}")?;
        }
    }

    Ok(had_errors)
}

/// Write results as a pretty-printed JSON array.
///
/// Returns whether any result carried an error.
pub fn render_json(results: &[ScanResult], out: &mut impl Write) -> io::Result<bool> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    Ok(results.iter().any(|r| !r.is_ok()))
}
