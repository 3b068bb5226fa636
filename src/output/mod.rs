//! Output formatters for analysis reports.
//!
//! This module provides different output formats for a report:
//! - Text for the terminal
//! - JSON for automation and scripting
//! - CSV for spreadsheet import (as one stream or one file per table)
//!
//! # Example
//!
//! ```no_run
//! use rowdupe::analysis::Analyzer;
//! use rowdupe::error::ExitCode;
//! use rowdupe::output::json::JsonOutput;
//! use rowdupe::table::CsvSource;
//! use std::path::Path;
//!
//! let table = CsvSource::default().read_path(Path::new("customers.csv")).unwrap();
//! let report = Analyzer::default().analyze(&table, "email").unwrap();
//!
//! // Output as JSON to stdout
//! let output = JsonOutput::new(&report, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

// Re-export main types
pub use self::csv::{CsvOutput, CsvOutputError};
pub use self::json::JsonOutput;
pub use self::text::TextOutput;
