//! Process-level switches, captured once at startup.

use serde::{Deserialize, Serialize};

/// Immutable process flags threaded through every component.
///
/// Built once from the command line and passed by reference; nothing in the
/// workspace reads process arguments on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flags {
    env: Option<String>,
    profile: bool,
    fast_mode: bool,
}

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the active environment. Blank names count as unset.
    pub fn with_env(mut self, env: Option<impl Into<String>>) -> Self {
        self.env = env.map(Into::into).filter(|e| !e.trim().is_empty());
        self
    }

    pub fn with_profile(mut self, profile: bool) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_fast_mode(mut self, fast_mode: bool) -> Self {
        self.fast_mode = fast_mode;
        self
    }

    pub fn env(&self) -> Option<&str> {
        self.env.as_deref()
    }

    pub fn profile(&self) -> bool {
        self.profile
    }

    pub fn fast_mode(&self) -> bool {
        self.fast_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_are_all_off() {
        let flags = Flags::new();
        assert_eq!(flags.env(), None);
        assert!(!flags.profile());
        assert!(!flags.fast_mode());
    }

    #[test]
    fn blank_env_is_treated_as_unset() {
        assert_eq!(Flags::new().with_env(Some("  ")).env(), None);
        assert_eq!(Flags::new().with_env(Some("staging")).env(), Some("staging"));
        assert_eq!(Flags::new().with_env(None::<String>).env(), None);
    }
}
