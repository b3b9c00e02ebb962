/*!
 * Error types for chromsplit
 */

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SplitError>;

/// Exit code constants for structured process exit
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_IO: i32 = 1;
pub const EXIT_FATAL: i32 = 2;
pub const EXIT_CANCELLED: i32 = 130;

#[derive(Error, Debug)]
pub enum SplitError {
    /// Input file does not exist
    #[error("Input file does not exist: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Input path exists but is not a readable regular file
    #[error("Input path is not a regular file: {}", .0.display())]
    InvalidInput(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An output file could not be created
    #[error("Failed to create output file {}: {source}", path.display())]
    CreateOutput { path: PathBuf, source: io::Error },

    /// Reading the input failed
    #[error("Error reading input file {} at line {line}: {source}", path.display())]
    Read {
        path: PathBuf,
        line: u64,
        source: io::Error,
    },

    /// A record exceeded the configured maximum line size
    #[error(
        "Line {line} of {} exceeds the maximum line size of {limit} bytes",
        path.display()
    )]
    LineTooLong { path: PathBuf, line: u64, limit: usize },

    /// Writing a record to an output failed
    #[error("Failed to write to output file {} at line {line}: {source}", path.display())]
    Write {
        path: PathBuf,
        line: u64,
        source: io::Error,
    },

    /// Flushing or closing an output failed
    #[error("Failed to flush output file {}: {source}", path.display())]
    Flush { path: PathBuf, source: io::Error },

    /// Run was interrupted between records
    #[error("Interrupted after line {line}")]
    Cancelled { line: u64 },
}

impl SplitError {
    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SplitError::InputNotFound(_)
            | SplitError::InvalidInput(_)
            | SplitError::Config(_)
            | SplitError::CreateOutput { .. } => EXIT_FATAL,
            SplitError::Read { .. }
            | SplitError::LineTooLong { .. }
            | SplitError::Write { .. }
            | SplitError::Flush { .. } => EXIT_IO,
            SplitError::Cancelled { .. } => EXIT_CANCELLED,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            SplitError::InputNotFound(_) | SplitError::InvalidInput(_) | SplitError::Config(_) => {
                ErrorCategory::Configuration
            }
            SplitError::CreateOutput { .. }
            | SplitError::Write { .. }
            | SplitError::Flush { .. } => ErrorCategory::Output,
            SplitError::Read { .. } | SplitError::LineTooLong { .. } => ErrorCategory::Input,
            SplitError::Cancelled { .. } => ErrorCategory::Cancelled,
        }
    }

    /// Input line number the error is attached to, if any
    pub fn line(&self) -> Option<u64> {
        match self {
            SplitError::Read { line, .. }
            | SplitError::LineTooLong { line, .. }
            | SplitError::Write { line, .. }
            | SplitError::Cancelled { line } => Some(*line),
            _ => None,
        }
    }

    /// Suggestion shown by the CLI next to the error, when one applies
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SplitError::InputNotFound(_) => Some("Check the --input path"),
            SplitError::CreateOutput { .. } => {
                Some("Check that the --prefix directory exists and is writable")
            }
            SplitError::LineTooLong { .. } => Some("Raise the limit with --max-line-size"),
            _ => None,
        }
    }
}

/// Error category for classification and reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid configuration or input path
    Configuration,
    /// Output creation, write or flush failures
    Output,
    /// Input read failures and oversized records
    Input,
    /// Interrupted run
    Cancelled,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Output => write!(f, "output"),
            ErrorCategory::Input => write!(f, "input"),
            ErrorCategory::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl From<toml::de::Error> for SplitError {
    fn from(err: toml::de::Error) -> Self {
        SplitError::Config(format!("TOML parse error: {}", err))
    }
}
