//! Entry point discovery.
//!
//! The main entry is picked from a fixed list of conventional filenames under the
//! source directory; extra entries are merged in afterwards. Every entry name is
//! unique across the resulting list.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::MAIN_ENTRY_FILENAMES;
use crate::error::{ConfigError, Result};

/// Output template for entries rendered into an HTML page.
pub const HASHED_ENTRY_FILENAME: &str = "static/js/[name].[chunkhash:8].js";

/// A named root module the bundler starts from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDescriptor {
    pub name: String,
    pub entry_path: PathBuf,
    pub output_filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_path: Option<PathBuf>,
}

impl EntryDescriptor {
    /// Script-only entry with a stable, non-hashed filename.
    pub fn script(name: impl Into<String>, entry_path: impl Into<PathBuf>) -> Self {
        let name = name.into();
        Self {
            output_filename: format!("static/js/{name}.js"),
            name,
            entry_path: entry_path.into(),
            html_path: None,
        }
    }

    /// Entry rendered into `html_path`; its script name carries a content hash.
    pub fn with_template(
        name: impl Into<String>,
        entry_path: impl Into<PathBuf>,
        html_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            entry_path: entry_path.into(),
            output_filename: HASHED_ENTRY_FILENAME.to_string(),
            html_path: Some(html_path.into()),
        }
    }

    pub fn has_template(&self) -> bool {
        self.html_path.is_some()
    }
}

/// Decides whether the main entry comes with an HTML template.
pub trait TemplateLocator {
    fn locate(&self, src_dir: &Path, main_entry: &Path) -> Option<PathBuf>;
}

/// Looks for `index.html` next to the main entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConventionalTemplate;

impl TemplateLocator for ConventionalTemplate {
    fn locate(&self, src_dir: &Path, _main_entry: &Path) -> Option<PathBuf> {
        let candidate = src_dir.join("index.html");
        candidate.is_file().then_some(candidate)
    }
}

/// Inputs for [`resolve_entries`].
pub struct EntryOptions<'a> {
    pub src_dir: &'a Path,
    pub project_dir: &'a Path,
    pub index_name: &'a str,
    pub extra_entries: &'a IndexMap<String, PathBuf>,
}

/// Discover the main entry and merge in the extra ones.
///
/// Extra entry paths are taken relative to the project directory. Blank names
/// are rejected before anything is looked up on disk.
pub fn resolve_entries(
    options: &EntryOptions<'_>,
    templates: &dyn TemplateLocator,
) -> Result<Vec<EntryDescriptor>> {
    if options.index_name.trim().is_empty() {
        return Err(ConfigError::EmptyEntryName { extra_path: None });
    }
    if let Some(path) = options
        .extra_entries
        .iter()
        .find_map(|(name, path)| name.trim().is_empty().then_some(path))
    {
        return Err(ConfigError::EmptyEntryName {
            extra_path: Some(path.clone()),
        });
    }

    let main_path = MAIN_ENTRY_FILENAMES
        .iter()
        .map(|candidate| options.src_dir.join(candidate))
        .find(|path| path.is_file())
        .ok_or_else(|| ConfigError::MissingMainEntry {
            src_dir: options.src_dir.to_path_buf(),
            candidates: MAIN_ENTRY_FILENAMES.iter().map(|s| s.to_string()).collect(),
        })?;

    debug!("main entry {}: {}", options.index_name, main_path.display());

    let main = match templates.locate(options.src_dir, &main_path) {
        Some(html) => EntryDescriptor::with_template(options.index_name, main_path, html),
        None => EntryDescriptor::script(options.index_name, main_path),
    };

    let mut descriptors = vec![main];
    for (name, path) in options.extra_entries {
        if descriptors.iter().any(|d| &d.name == name) {
            return Err(ConfigError::DuplicateEntryName(name.clone()));
        }

        let entry_path = if path.is_absolute() {
            path.clone()
        } else {
            options.project_dir.join(path)
        };
        if !entry_path.is_file() {
            return Err(ConfigError::EntryNotFound {
                name: name.clone(),
                path: entry_path,
            });
        }

        descriptors.push(EntryDescriptor::script(name.as_str(), entry_path));
    }

    Ok(descriptors)
}
