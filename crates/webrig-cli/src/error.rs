//! Error types for the webrig CLI.
//!
//! - [`CliError`] is what commands return; it converts from the library errors
//! - [`BuildError`] covers the build orchestrator's own failure modes
//!
//! Compile diagnostics are not errors until the orchestrator judges them: the
//! outcome tree is inspected first, then a single
//! [`BuildError::CompilationFailed`] carries the verdict.

mod report;

use std::path::PathBuf;

use thiserror::Error;

pub use report::cli_error_to_miette;

#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid options, entries, aliases or public path
    #[error("Configuration error: {0}")]
    Config(#[from] webrig_config::ConfigError),

    /// The bundler could not be invoked, or output could not be written
    #[error("Bundler error: {0}")]
    Bundler(#[from] webrig_bundler::Error),

    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Dev server startup or runtime failure
    #[error("Server error: {0}")]
    Server(String),

    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Failed to compile: {errors} error(s), {warnings} warning(s)")]
    CompilationFailed { errors: usize, warnings: usize },

    #[error("Output path exists but is not a directory: {}", .0.display())]
    OutputNotDirectory(PathBuf),

    #[error("Failed to copy static assets from {}: {message}", .source_dir.display())]
    StaticCopy { source_dir: PathBuf, message: String },

    #[error("Failed to write profile to {}: {message}", .path.display())]
    ProfileWrite { path: PathBuf, message: String },

    /// A pre-build checker exited unsuccessfully
    #[error("{tool} reported problems ({status})")]
    CheckFailed { tool: String, status: String },
}

impl BuildError {
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            BuildError::CompilationFailed { .. } => Some(
                "Warnings fail production builds too. Run with --verbose for the raw diagnostics",
            ),
            BuildError::OutputNotDirectory(_) => Some("Remove the file or choose another project"),
            BuildError::StaticCopy { .. } => Some("Check permissions and dangling symlinks in static/"),
            BuildError::ProfileWrite { .. } => Some("Check that the project directory is writable"),
            BuildError::CheckFailed { .. } => Some("Fix the reported problems or pass --mode fast"),
        }
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;
