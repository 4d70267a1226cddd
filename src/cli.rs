//! Command-line interface for voxreport
//!
//! Provides argument parsing using clap derive macros.

use crate::config::MappingMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// Voice statements to completed report documents
#[derive(Parser, Debug)]
#[command(
    name = "voxreport",
    version,
    about = "Voice statements to completed report documents"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Verbose output (-v: debug, -vv: trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the full pipeline over a recorded voice statement
    Run {
        /// Local audio file (WAV) with the recorded statement
        audio: PathBuf,

        /// Where to write the completed report document
        #[arg(
            short,
            long,
            value_name = "PATH",
            default_value = "completed_report.json"
        )]
        output: PathBuf,

        /// Form template blob name (default: from config)
        #[arg(long, value_name = "NAME")]
        template: Option<String>,

        /// Field mapping mode: positional (template contract) or named
        #[arg(long, value_name = "MODE", value_parser = parse_mapping)]
        mapping: Option<MappingMode>,

        /// Base recognition wait (default: 30s). Examples: 90s, 5m
        #[arg(long, value_name = "DURATION", value_parser = parse_wait_secs)]
        timeout: Option<u64>,
    },

    /// Print a local template's declared field names, in order
    Fields {
        /// Template document to inspect
        template: PathBuf,
    },

    /// Inspect configuration
    Config {
        /// Action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

/// Parse a wait duration string into seconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`30s`, `5m`, `2h`), and compound (`1h30m`).
fn parse_wait_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs())
        .map_err(|e| e.to_string())
}

fn parse_mapping(s: &str) -> Result<MappingMode, String> {
    MappingMode::from_str(s)
}
