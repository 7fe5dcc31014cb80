//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

/// Long version string including build metadata
pub fn long_version() -> String {
    format!(
        "{} (built {}, {})",
        env!("CARGO_PKG_VERSION"),
        crate::core::version::build_time(),
        crate::core::version::git_hash()
    )
}

/// Move text records from sources to sinks through a bounded buffer
///
/// One producer thread is spawned per --input and one consumer thread per
/// --output; all of them share a single fixed-capacity buffer that
/// exercises backpressure on the producing side.
#[derive(Parser, Debug)]
#[command(name = "linepipe", version, long_version = long_version(), about)]
pub struct Args {
    /// Input file to read records from (repeatable, one producer each)
    #[arg(short, long = "input", value_name = "FILE", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file for processed records (repeatable, one consumer each)
    #[arg(short, long = "output", value_name = "FILE", required = true)]
    pub outputs: Vec<PathBuf>,

    /// Maximum number of records the shared buffer may hold
    #[arg(short, long, default_value_t = 10)]
    pub capacity: usize,

    /// Drain deadline in milliseconds between producer completion and
    /// forced consumer stop
    #[arg(long, default_value_t = 500)]
    pub grace_ms: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log format (text, ext, json)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Write log output to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Emit the final statistics snapshot as JSON
    #[arg(long)]
    pub json: bool,

    /// Force coloured output
    #[arg(long)]
    pub color: bool,

    /// Disable coloured output
    #[arg(long, conflicts_with = "color")]
    pub no_color: bool,
}
