//! Command implementations.
//!
//! - [`build`] - checks, then a production build via [`crate::build::BuildOrchestrator`]
//! - [`dev`] - a dev session via [`crate::dev::SessionOrchestrator`]
//!
//! Each command provides an `execute` function taking the parsed arguments.

pub mod build;
pub mod dev;
pub(crate) mod utils;

pub use build::execute as build_execute;
pub use dev::execute as dev_execute;
