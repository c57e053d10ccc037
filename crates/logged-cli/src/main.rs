//! Logged CLI
//!
//! Thin wrapper around logged-core for emitting structured log lines from the
//! command line.
//!
//! ## Usage
//!
//! ```bash
//! # Emit the sample sequence to stdout
//! logged demo
//!
//! # Same, with debug output enabled everywhere
//! logged --debug '*' demo
//!
//! # Emit one entry with metadata, appending to a file
//! logged --output logs/app.jsonl --default app=x emit info "started" b=2
//!
//! # Plain text instead of JSON
//! logged --format text emit error "disk full" path=/var
//! ```
//!
//! Options not given on the command line fall back to `LOGGED_FORMAT`,
//! `LOGGED_DEBUG` and `LOGGED_DEFAULTS`.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use logged_core::{open_append, parse_pair, Config, Data, Format, Level, Logger};

/// Logged - structured JSON line logging
#[derive(Parser)]
#[command(name = "logged")]
#[command(version = "0.1.0")]
#[command(about = "Emit structured log lines")]
struct Cli {
    /// Increase verbosity of the tool's own diagnostics on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Line format: json or text
    #[arg(short, long, global = true)]
    format: Option<Format>,

    /// Append to this file instead of writing to stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Enable debug entries for a call-site prefix (repeatable, `*` for all)
    #[arg(long = "debug", global = true)]
    debug_scopes: Vec<String>,

    /// Default metadata as key=value (repeatable)
    #[arg(long = "default", global = true, value_parser = parse_pair)]
    defaults: Vec<(String, String)>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit the sample sequence of entries
    Demo,

    /// Emit a single entry
    Emit {
        /// Level: info, debug or error
        level: Level,

        /// Message text
        message: String,

        /// Metadata as key=value
        #[arg(value_parser = parse_pair)]
        data: Vec<(String, String)>,
    },
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();
}

/// Environment config with command-line options layered on top.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::from_env().context("Invalid LOGGED_* environment")?;

    if let Some(format) = cli.format {
        config.format = format;
    }
    if !cli.debug_scopes.is_empty() {
        config.debug_scopes = cli.debug_scopes.clone();
    }
    config.defaults.extend(cli.defaults.iter().cloned());

    Ok(config)
}

fn open_sink(output: Option<&PathBuf>) -> Result<Box<dyn Write + Send>> {
    match output {
        Some(path) => {
            let file = open_append(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

fn run_demo(log: &Logger) -> Result<()> {
    let log = log.with_defaults(&Data::from([
        ("app_name".to_string(), "fldsmdfr".to_string()),
        ("version".to_string(), "1.2.3.4".to_string()),
    ]));

    // Log just a message
    log.info("an info message", None)?;

    // Log a message with extended data
    log.info(
        "an info message with data",
        Some(&Data::from([
            ("some_number".to_string(), "111".to_string()),
            ("some_string".to_string(), "abc".to_string()),
        ])),
    )?;

    // Guard debug statements so expensive metadata is only built when needed
    if logged_core::is_debug!(log) {
        logged_core::debug!(log, "a debug message")?;
        logged_core::debug!(
            log,
            "a debug message with data",
            &Data::from([(
                "some_date".to_string(),
                "Tue Apr 11 11:47:48 EDT 2017".to_string()
            )])
        )?;
    }

    Ok(())
}

fn run_emit(log: &Logger, level: Level, message: &str, data: Data) -> Result<()> {
    match level {
        Level::Info => log.info(message, Some(&data))?,
        Level::Debug => logged_core::debug!(log, message, &data)?,
        Level::Error => log.error(Some(message), Some(&data))?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = load_config(&cli)?;
    tracing::debug!(
        format = %config.format,
        debug_scopes = ?config.debug_scopes,
        defaults = config.defaults.len(),
        "Loaded configuration"
    );

    let log = config.build(open_sink(cli.output.as_ref())?);

    match cli.command {
        Commands::Demo => run_demo(&log).context("Failed to write log entry")?,

        Commands::Emit {
            level,
            message,
            data,
        } => {
            let data: Data = data.into_iter().collect();
            run_emit(&log, level, &message, data).context("Failed to write log entry")?;
        }
    }

    Ok(())
}
