//! Format and lint checks that run before a default-mode build.
//!
//! Each checker is an external tool. A checker that is not installed (neither
//! in `node_modules/.bin` nor on `PATH`) is skipped with a warning. One that
//! exits unsuccessfully aborts the build.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::debug;

use crate::error::{BuildError, Result};
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checker {
    pub tool: &'static str,
    pub args: &'static [&'static str],
}

pub const DEFAULT_CHECKERS: &[Checker] = &[
    Checker {
        tool: "prettier",
        args: &["--check", "src"],
    },
    Checker {
        tool: "eslint",
        args: &["src", "--ext", ".ts,.tsx,.js,.jsx"],
    },
    Checker {
        tool: "stylelint",
        args: &["src/**/*.{css,less}", "--allow-empty-input"],
    },
];

pub async fn run_checks(project_dir: &Path, checkers: &[Checker]) -> Result<()> {
    for checker in checkers {
        let Some(program) = locate(checker.tool, project_dir) else {
            ui::warning(&format!("{} not found, skipping", checker.tool));
            continue;
        };

        ui::info(&format!("Running {}...", checker.tool));
        debug!("{} {}", program.display(), checker.args.join(" "));
        let status = Command::new(&program)
            .args(checker.args)
            .current_dir(project_dir)
            .status()
            .await?;

        if !status.success() {
            return Err(BuildError::CheckFailed {
                tool: checker.tool.to_string(),
                status: status.to_string(),
            }
            .into());
        }
    }
    Ok(())
}

/// Project-local binaries win over `PATH`. Only executables count.
fn locate(tool: &str, project_dir: &Path) -> Option<PathBuf> {
    let local_bin = project_dir.join("node_modules").join(".bin");
    which::which_in(tool, Some(&local_bin), project_dir)
        .or_else(|_| which::which(tool))
        .ok()
}
