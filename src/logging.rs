//! Logging bootstrap on top of `tracing-subscriber`.
//!
//! Nothing here runs as a side effect of parsing. The application calls
//! [`init_logging`] once, after its arguments are parsed:
//!
//! ```ignore
//! let cli = Cli::parse();
//! clapscript::init_logging(&cli.script.log)?;
//! ```
//!
//! `RUST_LOG`, when set, takes precedence over `--log-level`.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::ClapscriptError;

/// Log levels accepted by `--log-level`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warning,
    Error,
    /// Same as `error`; tracing has no separate critical level.
    Critical,
}

impl LogLevel {
    pub fn as_filter(self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error | LogLevel::Critical => LevelFilter::ERROR,
        }
    }
}

/// Event formatting, see `tracing_subscriber::fmt::format`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Pretty,
}

/// Logging flags shared by every script.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct LogArgs {
    /// Log level (debug, info, warning, error, critical)
    #[cfg_attr(
        feature = "clap",
        arg(long, value_enum, ignore_case = true, default_value_t = LogLevel::Warning)
    )]
    pub log_level: LogLevel,

    /// Append log output to this file instead of stderr
    #[cfg_attr(feature = "clap", arg(long, value_name = "FILE"))]
    pub log_file: Option<PathBuf>,

    /// Log message format
    #[cfg_attr(
        feature = "clap",
        arg(long, value_enum, value_name = "FORMAT", default_value_t = LogFormat::Full)
    )]
    pub log_message_format: LogFormat,
}

/// Install the global tracing subscriber described by `args`.
///
/// Fails with [`ClapscriptError::LoggingInit`] if a global subscriber is
/// already installed.
pub fn init_logging(args: &LogArgs) -> Result<(), ClapscriptError> {
    let filter = build_filter(args.log_level);
    match &args.log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            install(filter, args.log_message_format, Mutex::new(file), false)
        }
        None => install(filter, args.log_message_format, std::io::stderr, true),
    }
}

fn build_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(level.as_filter().into())
        .from_env_lossy()
}

fn install<W>(
    filter: EnvFilter,
    format: LogFormat,
    writer: W,
    ansi: bool,
) -> Result<(), ClapscriptError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer().with_writer(writer).with_ansi(ansi);
    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Full => registry.with(layer).try_init(),
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
    };
    result.map_err(|e| ClapscriptError::LoggingInit(e.to_string()))
}

/// Open `path` for appending, creating parent directories as needed.
fn open_log_file(path: &Path) -> Result<File, ClapscriptError> {
    let log_file_error = |source| ClapscriptError::LogFile {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(log_file_error)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(log_file_error)
}
