//! The result tree of one bundler invocation.
//!
//! A compilation may fan out into child compilations (HTML emission, budget
//! checks), each with its own errors and warnings. The tree is an immutable
//! value; [`CompilationOutcome::flatten`] collapses it without touching it.

use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;

/// Size record for one emitted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetInfo {
    pub name: String,
    pub size: u64,
    /// Entry this file was generated for, if it is an entry chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationOutcome {
    pub name: String,
    #[serde(default)]
    pub errors: Vec<Diagnostic>,
    #[serde(default)]
    pub warnings: Vec<Diagnostic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<AssetInfo>,
    #[serde(default)]
    pub children: Vec<CompilationOutcome>,
}

impl CompilationOutcome {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_errors(mut self, errors: impl IntoIterator<Item = Diagnostic>) -> Self {
        self.errors.extend(errors);
        self
    }

    pub fn with_warnings(mut self, warnings: impl IntoIterator<Item = Diagnostic>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_assets(mut self, assets: impl IntoIterator<Item = AssetInfo>) -> Self {
        self.assets.extend(assets);
        self
    }

    pub fn with_child(mut self, child: CompilationOutcome) -> Self {
        self.children.push(child);
        self
    }

    /// Depth-first, order-preserving collection of every error and warning.
    ///
    /// A node's own diagnostics come before those of its children.
    pub fn flatten(&self) -> Flattened {
        let mut flat = Flattened::default();
        self.collect_into(&mut flat);
        flat
    }

    fn collect_into(&self, flat: &mut Flattened) {
        flat.errors.extend(self.errors.iter().cloned());
        flat.warnings.extend(self.warnings.iter().cloned());
        for child in &self.children {
            child.collect_into(flat);
        }
    }
}

/// Errors and warnings of a whole outcome tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flattened {
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

/// Pass/fail judgement for one build invocation.
///
/// Warnings fail a build just like errors do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildResult {
    pub succeeded: bool,
    pub flattened_errors: Vec<Diagnostic>,
    pub flattened_warnings: Vec<Diagnostic>,
}

impl BuildResult {
    pub fn judge(outcome: &CompilationOutcome) -> Self {
        let Flattened { errors, warnings } = outcome.flatten();
        Self {
            succeeded: errors.is_empty() && warnings.is_empty(),
            flattened_errors: errors,
            flattened_warnings: warnings,
        }
    }
}
