//! The seam between orchestration and the bundler that does the work.

use async_trait::async_trait;
use webrig_config::BundlerConfig;

use crate::Result;
use crate::outcome::CompilationOutcome;

/// A file produced by a compilation, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    /// Forward-slash separated, e.g. `static/js/index.3f2a9c1b.js`.
    pub path: String,
    pub contents: Vec<u8>,
}

impl EmittedFile {
    pub fn new(path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.contents.len() as u64
    }
}

/// Everything one compilation produced.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    pub outcome: CompilationOutcome,
    pub files: Vec<EmittedFile>,
}

/// Compiles a [`BundlerConfig`].
///
/// Returning `Err` means the bundler could not be invoked. Problems found while
/// compiling are reported on the outcome instead, so the caller always sees
/// the full list.
#[async_trait]
pub trait Bundler: Send + Sync {
    async fn compile(&self, config: &BundlerConfig) -> Result<Compilation>;
}
