//! # webrig-bundler
//!
//! Compiles a [`BundlerConfig`](webrig_config::BundlerConfig) and reports what
//! happened as an immutable [`CompilationOutcome`] tree.
//!
//! The [`Bundler`] trait is the seam orchestration code depends on.
//! [`RolldownBundler`] is the production implementation; tests substitute their
//! own.
//!
//! ```no_run
//! use webrig_bundler::{BuildResult, Bundler, RolldownBundler, write_files};
//! # use webrig_config::{ConfigSynthesizer, Flags, SynthesizerOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let synthesizer = ConfigSynthesizer::new(&SynthesizerOptions::new("."), &Flags::new())?;
//! let output_dir = synthesizer.output_dir();
//! let config = synthesizer.production(&output_dir);
//!
//! let compilation = RolldownBundler::new().compile(&config).await?;
//! write_files(&compilation.files, &output_dir)?;
//!
//! let result = BuildResult::judge(&compilation.outcome);
//! println!("succeeded: {}", result.succeeded);
//! # Ok(()) }
//! ```

pub mod backend;
pub mod budget;
pub mod bundler;
pub mod diagnostics;
pub mod error;
pub mod filename;
pub mod html;
pub mod outcome;
pub mod writer;

pub use backend::RolldownBundler;
pub use bundler::{Bundler, Compilation, EmittedFile};
pub use diagnostics::Diagnostic;
pub use error::{Error, Result};
pub use outcome::{AssetInfo, BuildResult, CompilationOutcome, Flattened};
pub use writer::{validate_output_path, write_files};
