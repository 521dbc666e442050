//! Error types for configuration construction and alias resolution.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Broad category of a [`ConfigError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or missing static input, detected before any build starts.
    Construction,
    /// Dynamic aliases resolved for some prefixes but not all of them.
    Resolution,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("dynamic resolver #{index} has an empty prefix")]
    EmptyPrefix { index: usize },

    #[error("dynamic resolver prefix contains whitespace: {prefix:?}")]
    WhitespaceInPrefix { prefix: String },

    #[error("duplicated key for dynamic resolver: {prefix}")]
    DuplicatePrefix { prefix: String },

    #[error("no main entry found in {}, expected one of: {}", src_dir.display(), candidates.join(", "))]
    MissingMainEntry {
        src_dir: PathBuf,
        candidates: Vec<String>,
    },

    /// The main entry (`None`) or an extra entry has a blank name.
    #[error("entry name must not be empty")]
    EmptyEntryName { extra_path: Option<PathBuf> },

    #[error("duplicated entry name: {0}")]
    DuplicateEntryName(String),

    #[error("entry {name:?} not found: {}", path.display())]
    EntryNotFound { name: String, path: PathBuf },

    #[error(
        "dynamic aliases partially resolved ({} of {}), unresolved: {}",
        resolved.len(),
        resolved.len() + unresolved.len(),
        unresolved.join(", ")
    )]
    PartialAliasResolution {
        resolved: Vec<String>,
        unresolved: Vec<String>,
    },

    #[error("public path cannot be computed: {0}")]
    PublicPath(String),

    #[error("invalid configuration: {0}")]
    Load(String),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConfigError::PartialAliasResolution { .. } => ErrorKind::Resolution,
            _ => ErrorKind::Construction,
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(err.to_string())
    }
}
