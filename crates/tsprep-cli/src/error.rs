//! Application-wide error types using thiserror.

use tsprep_common::TsPrepError;

/// Main application error type.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// Failure inside one of the pipeline crates.
    #[error(transparent)]
    Pipeline(#[from] TsPrepError),
}

/// Result type for the CLI application.
pub type CliResult<T> = Result<T, CliError>;
