/// Error types for bundler invocation and output writing.
///
/// Compile diagnostics are not errors here: they are collected on the
/// [`CompilationOutcome`](crate::CompilationOutcome). An `Error` means the
/// bundler could not run at all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The bundler rejected its options or could not be constructed.
    #[error("bundler invocation failed: {0}")]
    Invocation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output path escapes the output directory or is otherwise unusable.
    #[error("invalid output path: {0}")]
    InvalidOutputPath(String),

    #[error("write failure: {0}")]
    WriteFailure(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl miette::Diagnostic for Error {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        let code = match self {
            Error::Invocation(_) => "BUNDLER_INVOCATION",
            Error::Io(_) => "IO_ERROR",
            Error::InvalidOutputPath(_) => "INVALID_OUTPUT_PATH",
            Error::WriteFailure(_) => "WRITE_FAILURE",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        match self {
            Error::Invocation(_) => Some(Box::new(
                "Run with --verbose to print the full bundler configuration",
            )),
            Error::InvalidOutputPath(_) => Some(Box::new(
                "Output filenames must stay inside the output directory",
            )),
            _ => None,
        }
    }
}
