//! Constructor options and their layered loading.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized},
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alias::DynamicConfigResolver;
use crate::constants::{
    CONFIG_FILE, DEFAULT_INDEX_NAME, MAX_ASSET_KILO_BYTE, MAX_ENTRY_POINT_KILO_BYTE,
};
use crate::error::Result;
use crate::public_path::PublicPathSpec;

/// Everything a [`ConfigSynthesizer`](crate::ConfigSynthesizer) is built from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SynthesizerOptions {
    /// Root holding `src/`, `static/` and the config file.
    pub project_directory: PathBuf,
    /// Extra module search roots, after `src/`.
    pub external_modules: Vec<PathBuf>,
    pub tsconfig_file_path: Option<PathBuf>,
    /// Extension prefixes that win over the canonical ones, without the dot.
    pub prioritized_extension_prefixes: Vec<String>,
    pub dynamic_config_resolvers: Vec<DynamicConfigResolver>,
    #[serde(alias = "webpackPublicPath")]
    pub public_path: Option<PublicPathSpec>,
    pub index_name: String,
    pub extra_entries: IndexMap<String, PathBuf>,
    pub max_entry_point_kilo_byte: u64,
    pub max_asset_kilo_byte: u64,
    /// Dump the full synthesized configuration.
    pub verbose: bool,
}

impl Default for SynthesizerOptions {
    fn default() -> Self {
        Self {
            project_directory: PathBuf::from("."),
            external_modules: Vec::new(),
            tsconfig_file_path: None,
            prioritized_extension_prefixes: Vec::new(),
            dynamic_config_resolvers: Vec::new(),
            public_path: None,
            index_name: DEFAULT_INDEX_NAME.to_string(),
            extra_entries: IndexMap::new(),
            max_entry_point_kilo_byte: MAX_ENTRY_POINT_KILO_BYTE,
            max_asset_kilo_byte: MAX_ASSET_KILO_BYTE,
            verbose: false,
        }
    }
}

/// Command-line values that win over every other source.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entry_point_kilo_byte: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_asset_kilo_byte: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
}

impl SynthesizerOptions {
    pub fn new(project_directory: impl Into<PathBuf>) -> Self {
        Self {
            project_directory: project_directory.into(),
            ..Self::default()
        }
    }

    /// Load options for `project_dir`.
    ///
    /// Priority: overrides > `WEBRIG_*` environment > config file > defaults.
    /// The config file is `config_path` when given, otherwise
    /// `<project_dir>/webrig.config.json` if it exists.
    pub fn load(
        project_dir: &Path,
        config_path: Option<&Path>,
        overrides: &Overrides,
    ) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = config_path.map(Path::to_path_buf).or_else(|| {
            let default_path = project_dir.join(CONFIG_FILE);
            default_path.exists().then_some(default_path)
        });
        if let Some(path) = config_file {
            debug!("loading options from {}", path.display());
            figment = figment.merge(Json::file(path));
        }

        figment = figment
            .merge(Env::prefixed("WEBRIG_").map(|key| snake_to_camel(key.as_str()).into()))
            .merge(Serialized::defaults(overrides))
            .merge(Serialized::default("projectDirectory", project_dir));

        Ok(figment.extract()?)
    }
}

fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
