//! Environment-driven module aliases.
//!
//! Aliases are all-or-nothing: either every dynamic resolver maps to an existing
//! path, or none does and the static mapping elsewhere takes over. A partial
//! result is rejected.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{error, info};

use crate::error::{ConfigError, Result};

/// Import-path prefix to concrete directory.
pub type AliasMap = IndexMap<String, PathBuf>;

/// Placeholder replaced by the active environment in templated paths.
pub const ENV_PLACEHOLDER: &str = "{env}";

type ResolveFn = dyn Fn(&str) -> Option<PathBuf> + Send + Sync;

/// Where a dynamic alias points for a given environment.
#[derive(Clone)]
pub enum AliasSource {
    /// Fixed path, or `None` for "always fall back".
    Static(Option<PathBuf>),
    /// Path containing `{env}`, e.g. `conf/{env}`.
    Template(String),
    Dynamic(Arc<ResolveFn>),
}

impl AliasSource {
    pub fn dynamic(f: impl Fn(&str) -> Option<PathBuf> + Send + Sync + 'static) -> Self {
        AliasSource::Dynamic(Arc::new(f))
    }

    fn resolve(&self, env: &str) -> Option<PathBuf> {
        match self {
            AliasSource::Static(path) => path.clone(),
            AliasSource::Template(template) => {
                Some(PathBuf::from(template.replace(ENV_PLACEHOLDER, env)))
            }
            AliasSource::Dynamic(f) => f(env),
        }
    }
}

impl fmt::Debug for AliasSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasSource::Static(path) => f.debug_tuple("Static").field(path).finish(),
            AliasSource::Template(t) => f.debug_tuple("Template").field(t).finish(),
            AliasSource::Dynamic(_) => f.write_str("Dynamic([Function])"),
        }
    }
}

impl Serialize for AliasSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            AliasSource::Static(None) => serializer.serialize_none(),
            AliasSource::Static(Some(path)) => path.serialize(serializer),
            AliasSource::Template(t) => serializer.serialize_str(t),
            AliasSource::Dynamic(_) => serializer.serialize_str("[Function]"),
        }
    }
}

impl<'de> Deserialize<'de> for AliasSource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match Option::<String>::deserialize(deserializer)? {
            None => AliasSource::Static(None),
            Some(s) if s.contains(ENV_PLACEHOLDER) => AliasSource::Template(s),
            Some(s) => AliasSource::Static(Some(PathBuf::from(s))),
        })
    }
}

/// One candidate alias rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicConfigResolver {
    pub prefix: String,
    pub resolver: AliasSource,
}

impl DynamicConfigResolver {
    pub fn new(prefix: impl Into<String>, resolver: AliasSource) -> Self {
        Self {
            prefix: prefix.into(),
            resolver,
        }
    }
}

/// Validate every prefix before anything touches the filesystem.
fn validate_prefixes(resolvers: &[DynamicConfigResolver]) -> Result<()> {
    for (index, resolver) in resolvers.iter().enumerate() {
        let prefix = &resolver.prefix;
        if prefix.is_empty() {
            return Err(ConfigError::EmptyPrefix { index });
        }
        if prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::WhitespaceInPrefix {
                prefix: prefix.clone(),
            });
        }
        if resolvers[..index].iter().any(|r| &r.prefix == prefix) {
            return Err(ConfigError::DuplicatePrefix {
                prefix: prefix.clone(),
            });
        }
    }
    Ok(())
}

/// Resolve dynamic aliases for `env`.
///
/// Relative candidate paths are taken from `base_dir`. With no environment the
/// map is always empty.
pub fn resolve_aliases(
    env: Option<&str>,
    resolvers: &[DynamicConfigResolver],
    base_dir: &Path,
) -> Result<AliasMap> {
    let Some(env) = env else {
        return Ok(AliasMap::new());
    };

    validate_prefixes(resolvers)?;

    let attempts: Vec<(&str, Option<PathBuf>)> = resolvers
        .iter()
        .map(|r| {
            let candidate = r
                .resolver
                .resolve(env)
                .map(|p| if p.is_absolute() { p } else { base_dir.join(p) })
                .filter(|p| p.exists());
            if candidate.is_none() {
                info!("dynamic alias {} falls back for env {env}", r.prefix);
            }
            (r.prefix.as_str(), candidate)
        })
        .collect();

    let resolved = attempts.iter().filter(|(_, path)| path.is_some()).count();

    match resolved {
        0 => Ok(AliasMap::new()),
        n if n == attempts.len() => Ok(attempts
            .into_iter()
            .filter_map(|(prefix, path)| path.map(|p| (prefix.to_string(), p)))
            .collect()),
        _ => {
            let (hit, miss): (Vec<_>, Vec<_>) = attempts.iter().partition(|(_, p)| p.is_some());
            let err = ConfigError::PartialAliasResolution {
                resolved: hit.iter().map(|(prefix, _)| prefix.to_string()).collect(),
                unresolved: miss.iter().map(|(prefix, _)| prefix.to_string()).collect(),
            };
            error!("{err}");
            Err(err)
        }
    }
}
