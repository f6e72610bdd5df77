//! # rwc
//!
//! A `wc` clone that counts lines, words and bytes of many files
//! concurrently.
//!
//! ## Overview
//!
//! rwc is built on top of rwclib. Files are scanned in parallel with a cap on
//! how many are open at once. Output order always matches argument order.
//!
//! ## Usage
//!
//! ```bash
//! # Lines, words and bytes of two files, plus a total row
//! rwc notes.txt todo.md
//!
//! # Only lines
//! rwc -l src/*.rs
//!
//! # Skip images, count only text and markdown
//! rwc --exclude jpg,png --include txt,md docs/*
//!
//! # Count standard input
//! echo "xyz abc" | rwc
//!
//! # JSON output
//! rwc --output json notes.txt
//! ```

mod render;

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command};
use rwclib::{EntryFilter, ExtensionFilter, InputSpec, Metrics, OsFs, Scanner, MAX_OPEN_FILES};

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("rwc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Count lines, words and bytes of files concurrently")
        .arg(
            Arg::new("files")
                .value_name("FILE")
                .action(ArgAction::Append)
                .help("Files to count (reads standard input when none are given)"),
        )
        .arg(
            Arg::new("lines")
                .short('l')
                .long("lines")
                .action(ArgAction::SetTrue)
                .help("Print line counts"),
        )
        .arg(
            Arg::new("words")
                .short('w')
                .long("words")
                .action(ArgAction::SetTrue)
                .help("Print word counts"),
        )
        .arg(
            Arg::new("chars")
                .short('c')
                .long("chars")
                .action(ArgAction::SetTrue)
                .help("Print byte counts"),
        )
        .arg(
            Arg::new("exclude")
                .short('e')
                .long("exclude")
                .value_name("EXT")
                .action(ArgAction::Append)
                .value_delimiter(',')
                .help("Skip files with this extension (can be specified multiple times)"),
        )
        .arg(
            Arg::new("include")
                .short('i')
                .long("include")
                .value_name("EXT")
                .action(ArgAction::Append)
                .value_delimiter(',')
                .help("Only count files with this extension (can be specified multiple times)"),
        )
        .arg(
            Arg::new("max-open")
                .long("max-open")
                .value_name("N")
                .env("RWC_MAX_OPEN")
                .default_value("1024")
                .value_parser(clap::value_parser!(NonZeroUsize))
                .help("Maximum number of files open at the same time"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Output format"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v, -vv, -vvv)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .help("Disable logging"),
        )
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Extract metrics from matches; no flag at all means every metric
fn extract_metrics(matches: &ArgMatches) -> Metrics {
    Metrics::none()
        .with_lines(matches.get_flag("lines"))
        .with_words(matches.get_flag("words"))
        .with_chars(matches.get_flag("chars"))
        .or_all()
}

/// Build extension filter from matches
fn build_filter(matches: &ArgMatches) -> Result<ExtensionFilter, anyhow::Error> {
    let mut filter = ExtensionFilter::new();

    if let Some(excludes) = matches.get_many::<String>("exclude") {
        for ext in excludes {
            filter = filter.exclude(ext)?;
        }
    }

    if let Some(includes) = matches.get_many::<String>("include") {
        for ext in includes {
            filter = filter.include(ext)?;
        }
    }

    Ok(filter)
}

/// One spec per file argument, resolved against the working directory
fn build_specs(
    matches: &ArgMatches,
    metrics: Metrics,
    filter: Arc<dyn EntryFilter>,
) -> Result<Vec<InputSpec>, anyhow::Error> {
    let files: Vec<&String> = matches
        .get_many::<String>("files")
        .map(|v| v.collect())
        .unwrap_or_default();

    files
        .into_iter()
        .map(|file| -> Result<InputSpec, anyhow::Error> {
            let resolved = std::path::absolute(Path::new(file))
                .with_context(|| format!("failed to resolve path '{file}'"))?;
            Ok(InputSpec::path(file.as_str(), resolved)
                .metrics(metrics)
                .filter(Arc::clone(&filter)))
        })
        .collect()
}

/// Run a scan; returns whether any input failed
fn run(matches: &ArgMatches) -> Result<bool, anyhow::Error> {
    let metrics = extract_metrics(matches);
    let filter: Arc<dyn EntryFilter> = Arc::new(build_filter(matches)?);
    let specs = build_specs(matches, metrics, filter)?;
    let max_open = matches
        .get_one::<NonZeroUsize>("max-open")
        .copied()
        .unwrap_or(MAX_OPEN_FILES);

    let fs = OsFs::new();
    let results = Scanner::new(&fs)
        .max_open(max_open)
        .stdin_metrics(metrics)
        .run(specs);

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let had_errors = match matches.get_one::<String>("output").map(|s| s.as_str()) {
        Some("json") => {
            for e in results.iter().filter_map(|r| r.error()) {
                tracing::warn!("{e}");
            }
            render::render_json(&results, &mut out)?
        }
        _ => render::render_text(
            &results,
            &metrics,
            console::colors_enabled(),
            &mut out,
            &mut err,
        )?,
    };
    out.flush()?;

    Ok(had_errors)
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    setup_logging(matches.get_count("verbose"), matches.get_flag("quiet"));

    match run(&matches) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
