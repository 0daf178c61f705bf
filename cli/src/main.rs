//! O11y Gateway CLI
//!
//! Offline diagnostics over the gateway core: check how a timestamp classifies,
//! see what range a set of raw parameters resolves to, or normalize a captured
//! backend response without running the server.
//!
//! # Usage
//!
//! ```bash
//! o11yctl --help
//! o11yctl classify 1750000000 2025-06-01T00:00:00Z 42
//! o11yctl resolve-range --start bogus --step 0
//! o11yctl normalize --file response.json --strict
//! ```

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use shared::config::{
    PlausibleWindow, UnknownShapePolicy, DEFAULT_WINDOW_END_SECS, DEFAULT_WINDOW_START_SECS,
};
use shared::normalize::normalize_response;
use shared::query::{classify_format, resolve_range};
use std::io::Read;
use std::path::{Path, PathBuf};

/// O11y Gateway CLI - offline query diagnostics
#[derive(Parser)]
#[command(name = "o11yctl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// First plausible instant, in Unix seconds
    #[arg(long, env = "GATEWAY_WINDOW_START", default_value_t = DEFAULT_WINDOW_START_SECS)]
    window_start: i64,

    /// Last plausible instant, in Unix seconds
    #[arg(long, env = "GATEWAY_WINDOW_END", default_value_t = DEFAULT_WINDOW_END_SECS)]
    window_end: i64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report how each timestamp classifies
    Classify {
        /// Raw timestamp strings
        #[arg(required = true)]
        timestamps: Vec<String>,
    },

    /// Resolve raw range parameters the way metric range queries do
    ResolveRange {
        /// Raw start value
        #[arg(long)]
        start: Option<String>,
        /// Raw end value
        #[arg(long)]
        end: Option<String>,
        /// Raw step value
        #[arg(long)]
        step: Option<String>,
        /// Wall-clock time to resolve against, RFC3339 (default: now)
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },

    /// Normalize a captured backend query response
    Normalize {
        /// Response file, or `-` for stdin
        #[arg(short, long)]
        file: PathBuf,
        /// Fail on unrecognized result types instead of returning an empty result
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let output = run(cli, Utc::now())?;
    println!("{output}");
    Ok(())
}

fn run(cli: Cli, now: DateTime<Utc>) -> Result<String> {
    let window = PlausibleWindow::new(cli.window_start, cli.window_end);
    window
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid plausible-date window: {e}"))?;

    match cli.command {
        Some(Commands::Classify { timestamps }) => Ok(classify_all(&timestamps, &window)),
        Some(Commands::ResolveRange {
            start,
            end,
            step,
            now: at,
        }) => {
            let resolution = resolve_range(
                start.as_deref(),
                end.as_deref(),
                step.as_deref(),
                at.unwrap_or(now),
                &window,
            );
            resolution.log();
            Ok(serde_json::to_string_pretty(&resolution)?)
        }
        Some(Commands::Normalize { file, strict }) => {
            let body = read_input(&file)?;
            let result = normalize_response(&body, UnknownShapePolicy::from_strict(strict))
                .with_context(|| format!("Failed to normalize {}", file.display()))?;
            Ok(serde_json::to_string_pretty(&result)?)
        }
        None => Ok(format!(
            "o11yctl v{}\nUse --help for usage information",
            env!("CARGO_PKG_VERSION")
        )),
    }
}

fn classify_all(timestamps: &[String], window: &PlausibleWindow) -> String {
    timestamps
        .iter()
        .map(|raw| match classify_format(raw, window) {
            Some(format) => format!("{raw}\t{format}"),
            None => format!("{raw}\tinvalid"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    if path.as_os_str() == "-" {
        let mut body = Vec::new();
        std::io::stdin()
            .read_to_end(&mut body)
            .context("Failed to read stdin")?;
        return Ok(body);
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}
