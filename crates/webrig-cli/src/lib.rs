//! webrig CLI - production builds and a dev server driven by project conventions.
//!
//! # Architecture
//!
//! - [`cli`] - clap definitions for `webrig build` and `webrig dev`
//! - [`build`] - the one-shot build orchestrator
//! - [`dev`] - the long-running dev session: axum server, proxy, watcher
//! - [`commands`] - glue from parsed arguments to the orchestrators
//! - [`error`] - CLI error types and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - colored status lines and formatting helpers
//!
//! Process-wide flags (`--env`, `--profile`, `--mode fast`) are parsed once
//! into a [`webrig_config::Flags`] value and passed down explicitly.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use webrig_bundler::RolldownBundler;
//! use webrig_cli::build::BuildOrchestrator;
//! use webrig_config::{ConfigSynthesizer, Flags, SynthesizerOptions};
//!
//! # async fn run() -> webrig_cli::Result<()> {
//! let synthesizer = ConfigSynthesizer::new(&SynthesizerOptions::new("."), &Flags::new())?;
//! let report = BuildOrchestrator::new(&synthesizer, Arc::new(RolldownBundler::new()))
//!     .run(|report| println!("{} files", report.files.len()))
//!     .await?;
//! # let _ = report;
//! # Ok(()) }
//! ```

pub mod build;
pub mod cli;
pub mod commands;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{BuildError, CliError, Result};
