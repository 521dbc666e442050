//! The synthesized bundler configuration.
//!
//! A plain data value: the synthesizer produces it, the bundler implementation
//! reads it. Serializes to JSON for verbose dumps.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::alias::AliasMap;
use crate::entry::EntryDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Web,
    Es5,
}

/// How entry chunks are named.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilenameRule {
    /// One template for every entry.
    Template(String),
    /// Each entry's own `output_filename`.
    PerEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub filename: FilenameRule,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_filename: Option<String>,
    pub public_path: String,
    /// Value for the `crossorigin` attribute on injected script tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_origin_loading: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveConfig {
    pub extensions: Vec<String>,
    pub modules: Vec<PathBuf>,
    pub alias: AliasMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Devtool {
    InlineCheapModuleSourceMap,
    /// Separate map files, not referenced from the emitted code.
    HiddenSourceMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitChunks {
    pub automatic_name_delimiter: String,
    pub max_async_requests: u32,
}

impl Default for SplitChunks {
    fn default() -> Self {
        Self {
            automatic_name_delimiter: "-".to_string(),
            max_async_requests: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Minimizer {
    Script { source_map: bool },
    Stylesheet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Optimization {
    pub used_exports: bool,
    pub split_chunks: SplitChunks,
    pub minimizer: Vec<Minimizer>,
}

impl Optimization {
    pub fn minify_scripts(&self) -> bool {
        self.minimizer
            .iter()
            .any(|m| matches!(m, Minimizer::Script { .. }))
    }
}

/// Size budgets in bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Performance {
    /// `None` lifts the entry budget.
    pub max_entrypoint_size: Option<u64>,
    pub max_asset_size: u64,
    /// Files ending in one of these are never checked.
    pub excluded_extensions: Vec<String>,
}

impl Performance {
    pub fn applies_to(&self, filename: &str) -> bool {
        !self
            .excluded_extensions
            .iter()
            .any(|ext| filename.ends_with(ext.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetKind {
    /// Emitted as a separate file.
    Resource,
    /// Embedded as a data URL.
    Inline,
}

/// Module rule, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Rule {
    #[serde(rename_all = "camelCase")]
    Script {
        tsconfig: PathBuf,
        transpile_only: bool,
        fast_refresh: bool,
    },
    #[serde(rename_all = "camelCase")]
    Stylesheet { minimize: bool, extract: bool },
    Asset {
        kind: AssetKind,
        extensions: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Plugin {
    #[serde(rename_all = "camelCase")]
    Html { entry: String, template: PathBuf },
    ReactRefresh,
    HotModuleReplacement,
    #[serde(rename_all = "camelCase")]
    Progress { profile: bool },
    CrossOriginScriptTag,
    #[serde(rename_all = "camelCase")]
    CssExtract { filename: String, ignore_order: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    pub cache_directory: PathBuf,
}

/// A complete configuration for one compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundlerConfig {
    pub mode: Mode,
    pub context: PathBuf,
    pub entry: Vec<EntryDescriptor>,
    pub target: Vec<Target>,
    pub output: OutputConfig,
    pub resolve: ResolveConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devtool: Option<Devtool>,
    pub optimization: Optimization,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<Performance>,
    pub rules: Vec<Rule>,
    pub plugins: Vec<Plugin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheConfig>,
    pub bail: bool,
}

impl BundlerConfig {
    /// Filename template for the entry called `name`.
    pub fn entry_filename(&self, name: &str) -> Option<&str> {
        match &self.output.filename {
            FilenameRule::Template(t) => Some(t.as_str()),
            FilenameRule::PerEntry => self
                .entry
                .iter()
                .find(|e| e.name == name)
                .map(|e| e.output_filename.as_str()),
        }
    }

    /// Template for extracted stylesheets, if css extraction is on.
    pub fn css_filename(&self) -> Option<&str> {
        self.plugins.iter().find_map(|p| match p {
            Plugin::CssExtract { filename, .. } => Some(filename.as_str()),
            _ => None,
        })
    }

    pub fn html_plugins(&self) -> impl Iterator<Item = (&str, &PathBuf)> {
        self.plugins.iter().filter_map(|p| match p {
            Plugin::Html { entry, template } => Some((entry.as_str(), template)),
            _ => None,
        })
    }

    pub fn hot(&self) -> bool {
        self.plugins
            .iter()
            .any(|p| matches!(p, Plugin::HotModuleReplacement))
    }

    /// Pretty JSON for verbose dumps.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("<unserializable: {e}>"))
    }
}
