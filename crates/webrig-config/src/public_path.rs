//! Base URL under which emitted assets are served.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::alias::ENV_PLACEHOLDER;
use crate::constants::DEFAULT_PUBLIC_PATH;
use crate::error::{ConfigError, Result};

type PublicPathFn = dyn Fn(Option<&str>) -> std::result::Result<String, String> + Send + Sync;

#[derive(Clone)]
pub enum PublicPathSpec {
    Literal(String),
    /// URL containing `{env}`, e.g. `https://cdn.example.com/{env}/`.
    Template(String),
    Dynamic(Arc<PublicPathFn>),
}

impl PublicPathSpec {
    pub fn dynamic(
        f: impl Fn(Option<&str>) -> std::result::Result<String, String> + Send + Sync + 'static,
    ) -> Self {
        PublicPathSpec::Dynamic(Arc::new(f))
    }
}

impl fmt::Debug for PublicPathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublicPathSpec::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            PublicPathSpec::Template(s) => f.debug_tuple("Template").field(s).finish(),
            PublicPathSpec::Dynamic(_) => f.write_str("Dynamic([Function])"),
        }
    }
}

impl Serialize for PublicPathSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            PublicPathSpec::Literal(s) | PublicPathSpec::Template(s) => serializer.serialize_str(s),
            PublicPathSpec::Dynamic(_) => serializer.serialize_str("[Function]"),
        }
    }
}

impl<'de> Deserialize<'de> for PublicPathSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(if s.contains(ENV_PLACEHOLDER) {
            PublicPathSpec::Template(s)
        } else {
            PublicPathSpec::Literal(s)
        })
    }
}

/// Compute the public path for `env`, defaulting to `/`.
pub fn resolve_public_path(env: Option<&str>, spec: Option<&PublicPathSpec>) -> Result<String> {
    match spec {
        None => Ok(DEFAULT_PUBLIC_PATH.to_string()),
        Some(PublicPathSpec::Literal(s)) => Ok(s.clone()),
        Some(PublicPathSpec::Template(t)) => {
            let env = env.ok_or_else(|| {
                ConfigError::PublicPath(format!("{t:?} needs an env, pass --env <name>"))
            })?;
            Ok(t.replace(ENV_PLACEHOLDER, env))
        }
        Some(PublicPathSpec::Dynamic(f)) => f(env).map_err(ConfigError::PublicPath),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_root() {
        assert_eq!(resolve_public_path(Some("prod"), None).unwrap(), "/");
    }

    #[test]
    fn literal_is_used_as_is() {
        let spec = PublicPathSpec::Literal("https://cdn.example.com/".into());
        assert_eq!(
            resolve_public_path(None, Some(&spec)).unwrap(),
            "https://cdn.example.com/"
        );
    }

    #[test]
    fn template_substitutes_env() {
        let spec: PublicPathSpec = serde_json::from_str(r#""https://cdn.example.com/{env}/""#).unwrap();
        assert_eq!(
            resolve_public_path(Some("uat"), Some(&spec)).unwrap(),
            "https://cdn.example.com/uat/"
        );
        assert!(resolve_public_path(None, Some(&spec)).is_err());
    }

    #[test]
    fn callback_errors_propagate() {
        let spec = PublicPathSpec::dynamic(|env| match env {
            Some(env) => Ok(format!("/{env}/")),
            None => Err("no env".into()),
        });
        assert_eq!(resolve_public_path(Some("qa"), Some(&spec)).unwrap(), "/qa/");
        let err = resolve_public_path(None, Some(&spec)).unwrap_err();
        assert_eq!(err.to_string(), "public path cannot be computed: no env");
    }
}
