//! whistletab - tin whistle tablature from ABC notation
//!
//! Reads one ABC tune from a file or stdin, fits it to a D whistle and
//! writes tablature, a note file or the parse result as JSON.
//!
//! Exit codes: 0 on success, 2 when the input is empty or has no notes,
//! 1 for anything else.

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tabconf::{OutputFormat, TabConfig};
use tracing_subscriber::EnvFilter;
use whistle_abc::{ParseError, WhistleKey};

mod output;

#[derive(Parser)]
#[command(name = "whistletab")]
#[command(about = "Tin whistle tablature from ABC notation")]
#[command(version)]
struct Cli {
    /// ABC file to read; stdin when absent or "-"
    file: Option<PathBuf>,

    /// Output format (json, tab, line, notes)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Keep the notes as written instead of fitting them to the whistle
    #[arg(long)]
    no_fit: bool,

    /// Whistle the JSON and note-file pitches are written for (e.g. "Low A")
    #[arg(short, long)]
    whistle: Option<WhistleKey>,

    /// Config file, replacing ./whistletab.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Settings after merging the config files with the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub format: OutputFormat,
    pub fit: bool,
    pub whistle: WhistleKey,
}

impl Settings {
    fn resolve(cli: &Cli, config: &TabConfig) -> Result<Self> {
        let whistle = match cli.whistle {
            Some(whistle) => whistle,
            None => config
                .output
                .whistle
                .parse()
                .with_context(|| "invalid whistle in config [output] section")?,
        };

        Ok(Settings {
            format: cli.format.unwrap_or(config.output.format),
            fit: config.output.fit && !cli.no_fit,
            whistle,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match TabConfig::load_from(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(1);
        }
    };

    init_logging(&config.logging.level);

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "whistletab failed");
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over the configured level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<ParseError>() {
        Some(ParseError::EmptyInput | ParseError::NoNotes) => 2,
        None => 1,
    }
}

fn run(cli: &Cli, config: &TabConfig) -> Result<()> {
    let settings = Settings::resolve(cli, config)?;
    let abc = read_input(cli.file.as_deref())?;

    tracing::debug!(?settings, "rendering");
    let rendered = output::render(&abc, &settings)?;

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .context("Failed to write output")?;
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut abc = String::new();
            io::stdin()
                .read_to_string(&mut abc)
                .context("Failed to read stdin")?;
            Ok(abc)
        }
    }
}
