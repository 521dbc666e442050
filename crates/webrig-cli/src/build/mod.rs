//! One-shot production build.
//!
//! [`BuildOrchestrator::run`] cleans the output directory, copies static
//! assets, invokes the bundler exactly once and judges the outcome tree.
//! Errors and warnings alike fail the build.

pub mod checks;
mod output;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, error, info, warn};
use webrig_bundler::{AssetInfo, BuildResult, Bundler, CompilationOutcome, write_files};
use webrig_config::ConfigSynthesizer;

use crate::error::{BuildError, Result};

pub use output::{clean_output_dir, copy_static};

/// What a successful build produced. Passed to the success callback.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub output_dir: PathBuf,
    pub assets: Vec<AssetInfo>,
    /// Emitted file paths, relative to `output_dir`.
    pub files: Vec<String>,
    pub static_files: usize,
    pub duration: Duration,
}

pub struct BuildOrchestrator<'a> {
    synthesizer: &'a ConfigSynthesizer,
    bundler: Arc<dyn Bundler>,
    output_dir: PathBuf,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(synthesizer: &'a ConfigSynthesizer, bundler: Arc<dyn Bundler>) -> Self {
        Self {
            synthesizer,
            bundler,
            output_dir: synthesizer.output_dir(),
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Run the build. `on_success` is called exactly once, and only when the
    /// flattened outcome has neither errors nor warnings.
    ///
    /// A bundler invocation error propagates unchanged. A failed compilation
    /// returns [`BuildError::CompilationFailed`] after reporting every
    /// diagnostic.
    pub async fn run<F>(self, on_success: F) -> Result<BuildReport>
    where
        F: FnOnce(&BuildReport),
    {
        let started = Instant::now();
        let flags = self.synthesizer.flags();

        clean_output_dir(&self.output_dir)?;
        let static_files = copy_static(&self.synthesizer.static_dir(), &self.output_dir)?;
        debug!("copied {static_files} static file(s)");

        info!("Creating an optimized production build...");
        let config = self.synthesizer.production(&self.output_dir);
        let compilation = self.bundler.compile(&config).await?;
        write_files(&compilation.files, &self.output_dir)?;

        if flags.profile() {
            write_profile(&self.synthesizer.profile_path(), &compilation.outcome)?;
        }

        let result = BuildResult::judge(&compilation.outcome);
        if !result.succeeded {
            report_failure(&result, self.synthesizer.verbose());
            return Err(BuildError::CompilationFailed {
                errors: result.flattened_errors.len(),
                warnings: result.flattened_warnings.len(),
            }
            .into());
        }

        let report = BuildReport {
            output_dir: self.output_dir,
            assets: compilation.outcome.assets,
            files: compilation.files.into_iter().map(|f| f.path).collect(),
            static_files,
            duration: started.elapsed(),
        };
        info!("Build successfully");
        on_success(&report);
        Ok(report)
    }
}

fn write_profile(path: &Path, outcome: &CompilationOutcome) -> Result<()> {
    let profile_error = |message: String| BuildError::ProfileWrite {
        path: path.to_path_buf(),
        message,
    };
    let json = serde_json::to_string_pretty(outcome).map_err(|e| profile_error(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| profile_error(e.to_string()))?;
    info!("Profile written to {}", path.display());
    Ok(())
}

fn report_failure(result: &BuildResult, verbose: bool) {
    error!("Failed to compile.");
    for diagnostic in &result.flattened_errors {
        error!("{diagnostic}");
    }
    for diagnostic in &result.flattened_warnings {
        warn!("{diagnostic}");
    }

    if verbose {
        #[derive(Serialize)]
        struct Raw<'a> {
            errors: &'a [webrig_bundler::Diagnostic],
            warnings: &'a [webrig_bundler::Diagnostic],
        }
        let raw = Raw {
            errors: &result.flattened_errors,
            warnings: &result.flattened_warnings,
        };
        match serde_json::to_string_pretty(&raw) {
            Ok(json) => info!("Raw diagnostics:\n{json}"),
            Err(e) => debug!("could not serialize diagnostics: {e}"),
        }
    }
}
