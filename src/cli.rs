//! Command-line interface definitions for RowDupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! Global options (verbosity, color, config file) apply to every subcommand.
//!
//! # Example
//!
//! ```bash
//! # Duplicate statistics and repeated values of the "email" column
//! rowdupe analyze customers.csv --column email
//!
//! # Add the per-group root cause report and the conflict set summary
//! rowdupe analyze customers.csv -c email --root-cause --conflict-summary
//!
//! # Write all reports as CSV files into ./reports
//! rowdupe analyze customers.csv -c email --root-cause --export-dir reports
//!
//! # List the columns available for selection
//! rowdupe columns customers.csv
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Duplicate value analyzer with root cause grouping.
///
/// RowDupe finds repeated values in a column of a CSV table or spreadsheet,
/// explains which other columns differ between the duplicate rows, and summarizes groups
/// that conflict in the same columns.
#[derive(Debug, Parser)]
#[command(name = "rowdupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output (also set by a non-empty `NO_COLOR`)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Configuration file (TOML) to use instead of the default location
    #[arg(long, global = true, value_name = "FILE", env = "ROWDUPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Report errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for RowDupe.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Analyze duplicate values of one column
    Analyze(AnalyzeArgs),
    /// List the columns of a table
    Columns(ColumnsArgs),
    /// Print the effective configuration as TOML
    Config,
}

/// Arguments for the analyze subcommand.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// CSV file or spreadsheet workbook (.xlsx, .xls, .ods, ...) to analyze
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Column to check for duplicate values (exact, case-sensitive name)
    #[arg(short, long, value_name = "NAME")]
    pub column: String,

    /// Show root cause columns and value breakdown per duplicate group
    #[arg(long)]
    pub root_cause: bool,

    /// Show grouped summary of conflicting column sets
    #[arg(long)]
    pub conflict_summary: bool,

    /// Output format (defaults to the configured format, normally text)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Write the reports as CSV files into this directory
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Field delimiter of the input file (single character or "tab")
    #[arg(short, long, value_name = "CHAR", value_parser = parse_delimiter)]
    pub delimiter: Option<char>,

    /// Inspect duplicate groups on all cores
    #[arg(long)]
    pub parallel: bool,
}

/// Arguments for the columns subcommand.
#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// CSV file or spreadsheet workbook to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Field delimiter of the input file (single character or "tab")
    #[arg(short, long, value_name = "CHAR", value_parser = parse_delimiter)]
    pub delimiter: Option<char>,
}

/// Output format for analysis results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary and tables
    #[default]
    Text,
    /// JSON document for scripting
    Json,
    /// CSV sections for spreadsheets
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a field delimiter.
///
/// Accepts a single ASCII character, or `tab` / `\t` for a tab.
///
/// # Examples
///
/// ```
/// use rowdupe::cli::parse_delimiter;
///
/// assert_eq!(parse_delimiter(";").unwrap(), ';');
/// assert_eq!(parse_delimiter("tab").unwrap(), '\t');
/// assert!(parse_delimiter("ab").is_err());
/// ```
///
/// # Errors
///
/// Returns an error for empty input, several characters, or non-ASCII.
pub fn parse_delimiter(s: &str) -> Result<char, String> {
    if s.eq_ignore_ascii_case("tab") || s == "\\t" {
        return Ok('\t');
    }

    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Err("Delimiter cannot be empty".to_string()),
        (Some(c), None) if c.is_ascii() => Ok(c),
        (Some(c), None) => Err(format!("Delimiter must be ASCII, got '{c}'")),
        (Some(_), Some(_)) => Err(format!("Delimiter must be a single character: '{s}'")),
    }
}
