//! critlog - Print Android critical event logs as readable text
//!
//! Reads a `critical_event_log.pb` file, either from disk or pulled off a
//! connected device with `adb`, and prints every event it holds.

use anyhow::{Context, Result};
use clap::{Args, Parser};
use critlog_core::{
    decode_storage, DeviceConfig, DevicePull, ErrorClass, EventFilter, EventKind, LocalFile,
    ReportConfig, ReportRenderer, Source,
};
use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

/// Trailing argument accepted in place of `--debug`
const DEBUG_TOKEN: &str = "debug";

/// Options whose next argument is their value
const VALUE_OPTIONS: [&str; 3] = ["--event-types", "--serial", "-s"];

/// Print Android critical event logs as readable text
#[derive(Parser, Debug)]
#[command(name = "critlog")]
#[command(author, version, about, long_about = None)]
#[command(after_help = event_types_help())]
struct Cli {
    #[command(flatten)]
    input: InputMode,

    /// Only show these event types (comma separated)
    #[arg(long, value_name = "TYPES", value_delimiter = ',')]
    event_types: Vec<String>,

    /// Print raw structural information about the input before the report
    #[arg(long)]
    debug: bool,

    /// Serial of the device to pull from when several are connected
    #[arg(short, long, conflicts_with = "path")]
    serial: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct InputMode {
    /// Path to a critical event log file
    path: Option<PathBuf>,

    /// Pull the log from the connected device instead of reading a file
    #[arg(long)]
    auto: bool,
}

fn event_types_help() -> String {
    format!("Event types: {}", EventKind::valid_names())
}

/// Strips a trailing `debug` word, so `critlog log.pb debug` works like
/// `critlog log.pb --debug`.
///
/// A lone `debug` is left alone and taken as a path, as is one that is the
/// value of an option such as `--event-types`.
fn split_debug_token(mut args: Vec<OsString>) -> (Vec<OsString>, bool) {
    let n = args.len();
    let is_value = n >= 2 && VALUE_OPTIONS.iter().any(|o| args[n - 2] == *o);
    if n > 2 && !is_value && args.last().is_some_and(|a| a == DEBUG_TOKEN) {
        args.pop();
        return (args, true);
    }
    (args, false)
}

fn main() -> ExitCode {
    let (args, debug_token) = split_debug_token(std::env::args_os().collect());
    let cli = Cli::parse_from(args);

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(&cli, cli.debug || debug_token) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Exit status for a failed run: 2 for bad arguments (as clap uses), 3 when
/// the input could not be obtained, 4 when it could not be decoded
fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<critlog_core::Error>().map(|e| e.class()) {
        Some(ErrorClass::Config) => 2,
        Some(ErrorClass::Source) => 3,
        Some(ErrorClass::Decode) => 4,
        Some(ErrorClass::Internal) | None => 1,
    }
}

/// Reads, decodes and prints the log selected by `cli`
fn run(cli: &Cli, debug: bool) -> Result<()> {
    // Rejected names must fail before anything is read.
    let filter = EventFilter::parse(&cli.event_types)?;
    if !filter.is_all() {
        debug!(
            "Filtering on: {}",
            filter.kinds().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
        );
    }

    let source = select_source(cli);
    if cli.input.auto {
        info!("Pulling critical events log from Android device...");
    }

    let data = source
        .fetch()
        .with_context(|| format!("Failed to load critical event log from {}", source.describe()))?;

    let storage = decode_storage(&data, &source.describe())?;

    let config = ReportConfig::new().filter(filter).debug(debug);
    let renderer = ReportRenderer::new(config);
    let report = renderer.render_with_diagnostics(&data, &storage)?;

    let mut stdout = io::stdout().lock();
    if debug {
        writeln!(stdout, "Source: {}", source.describe())?;
        writeln!(stdout, "BLAKE3: {}", content_digest(&data))?;
    }
    stdout
        .write_all(report.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write report")?;

    Ok(())
}

fn select_source(cli: &Cli) -> Box<dyn Source> {
    match &cli.input.path {
        Some(path) => Box::new(LocalFile::new(path)),
        None => {
            let config = DeviceConfig::new().serial(cli.serial.clone());
            Box::new(DevicePull::new(config))
        }
    }
}

/// Short digest of the input, for telling pulled copies apart
fn content_digest(data: &[u8]) -> String {
    let hash = blake3::hash(data);
    hash.to_hex()[..16].to_string()
}
