//! # webrig-config
//!
//! Turns a handful of project conventions into a complete bundler configuration.
//!
//! ## Architecture
//!
//! Four small resolvers each produce one immutable fragment:
//!
//! - [`resolve_extensions`] orders resolvable file extensions, with per-platform prefixes first
//! - [`resolve_entries`] discovers the main entry and merges extra entries
//! - [`resolve_aliases`] maps import prefixes to per-environment directories, all or nothing
//! - [`resolve_public_path`] computes the base URL for emitted assets
//!
//! [`ConfigSynthesizer`] runs them once and composes the results into a
//! development or production [`BundlerConfig`].
//!
//! ```no_run
//! use webrig_config::{ConfigSynthesizer, Flags, SynthesizerOptions};
//!
//! # fn main() -> webrig_config::Result<()> {
//! let options = SynthesizerOptions::new("./my-app");
//! let flags = Flags::new().with_env(Some("staging"));
//! let synthesizer = ConfigSynthesizer::new(&options, &flags)?;
//! let config = synthesizer.production(&synthesizer.output_dir());
//! assert!(config.bail);
//! # Ok(()) }
//! ```

pub mod alias;
pub mod bundler_config;
pub mod constants;
pub mod entry;
pub mod error;
pub mod extensions;
pub mod flags;
pub mod options;
pub mod public_path;
pub mod synthesizer;

pub use alias::{AliasMap, AliasSource, DynamicConfigResolver, resolve_aliases};
pub use bundler_config::{
    AssetKind, BundlerConfig, CacheConfig, Devtool, FilenameRule, Minimizer, Mode, Optimization,
    OutputConfig, Performance, Plugin, ResolveConfig, Rule, SplitChunks, Target,
};
pub use entry::{
    ConventionalTemplate, EntryDescriptor, EntryOptions, TemplateLocator, resolve_entries,
};
pub use error::{ConfigError, ErrorKind, Result};
pub use extensions::resolve_extensions;
pub use flags::Flags;
pub use options::{Overrides, SynthesizerOptions};
pub use public_path::{PublicPathSpec, resolve_public_path};
pub use synthesizer::ConfigSynthesizer;
