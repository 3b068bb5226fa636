//! Structured error handling and exit codes.

use serde::Serialize;

use crate::table::{SourceError, TableError};

/// Exit codes for the RowDupe application.
///
/// - 0: Success (analysis completed, duplicates found)
/// - 1: General error (unexpected failure)
/// - 2: No duplicates found (analysis completed, nothing repeated)
/// - 3: Invalid input (unknown column, malformed table, unreadable file)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Analysis completed and duplicates were found.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// No duplicates: Analysis completed but no value repeats.
    NoDuplicates = 2,
    /// Invalid input: The table or column selection was rejected.
    InvalidInput = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "RW000",
            Self::GeneralError => "RW001",
            Self::NoDuplicates => "RW002",
            Self::InvalidInput => "RW003",
        }
    }

    /// Classify an application error.
    ///
    /// Table and source errors anywhere in the chain are invalid input;
    /// everything else is a general error.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        let invalid = err
            .chain()
            .any(|cause| cause.is::<TableError>() || cause.is::<SourceError>());
        if invalid {
            Self::InvalidInput
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "RW003")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
