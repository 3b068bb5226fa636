//! RowDupe - Duplicate Value Analyzer
//!
//! Finds repeated values in one column of a table and explains them: which
//! other columns differ between the duplicate rows, with the actual values,
//! and which sets of conflicting columns are most common.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod table;

use std::io::{self, Write};

use anyhow::{Context, Result};

use crate::analysis::Analyzer;
use crate::cli::{AnalyzeArgs, Cli, ColumnsArgs, Commands, OutputFormat};
use crate::config::Config;
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, TextOutput};

/// Run the application for parsed command-line arguments.
///
/// Returns the exit code on success: [`ExitCode::Success`] when duplicates
/// were found, [`ExitCode::NoDuplicates`] otherwise.
///
/// # Errors
///
/// Returns an error if the input cannot be read, the column does not
/// exist, or output cannot be written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        yansi::disable();
    }

    let config = Config::load(cli.config.as_deref());
    log::debug!("Effective configuration: {:?}", config);

    match cli.command {
        Commands::Analyze(args) => handle_analyze(config, &args, !cli.no_color),
        Commands::Columns(args) => handle_columns(config, &args),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(ExitCode::Success)
        }
    }
}

fn handle_analyze(mut config: Config, args: &AnalyzeArgs, color: bool) -> Result<ExitCode> {
    config.apply_analyze_args(args);

    let table = config
        .table_source(&args.file)?
        .read_path(&args.file)
        .with_context(|| format!("failed to load {}", args.file.display()))?;
    log::info!(
        "Loaded {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        args.file.display()
    );

    let analyzer = Analyzer::new(config.analysis_options());
    log::debug!("Analysis options: {:?}", analyzer.options());
    let report = analyzer
        .analyze(&table, &args.column)
        .with_context(|| format!("cannot analyze {}", args.file.display()))?;

    let exit_code = if report.has_duplicates() {
        ExitCode::Success
    } else {
        ExitCode::NoDuplicates
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match config.output {
        OutputFormat::Text => TextOutput::new(&report)
            .with_color(color)
            .write_to(&mut out)?,
        OutputFormat::Json => JsonOutput::new(&report, exit_code).write_to(&mut out)?,
        OutputFormat::Csv => CsvOutput::new(&report).write_to(&mut out)?,
    }
    out.flush()?;

    if let Some(dir) = &args.export_dir {
        CsvOutput::new(&report)
            .export_to_dir(dir)
            .with_context(|| format!("failed to export reports to {}", dir.display()))?;
    }

    Ok(exit_code)
}

fn handle_columns(mut config: Config, args: &ColumnsArgs) -> Result<ExitCode> {
    if let Some(delimiter) = args.delimiter {
        config.delimiter = delimiter;
    }

    let headers = config
        .table_source(&args.file)?
        .read_headers(&args.file)
        .with_context(|| format!("failed to read columns of {}", args.file.display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for header in headers {
        writeln!(out, "{header}")?;
    }
    Ok(ExitCode::Success)
}
