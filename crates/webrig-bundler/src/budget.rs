//! Size budget checks.
//!
//! Violations are warnings on a `performance` child compilation. Since
//! production builds treat warnings as failures, an oversized bundle fails the
//! build.

use webrig_config::Performance;

use crate::bundler::EmittedFile;
use crate::diagnostics::Diagnostic;
use crate::outcome::CompilationOutcome;

/// Files making up one entrypoint, entry chunk first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrypoint {
    pub name: String,
    pub files: Vec<String>,
}

pub fn check(
    performance: &Performance,
    files: &[EmittedFile],
    entrypoints: &[Entrypoint],
) -> CompilationOutcome {
    let checked = |path: &str| !path.ends_with(".map") && performance.applies_to(path);
    let mut warnings = Vec::new();

    for file in files.iter().filter(|f| checked(&f.path)) {
        if file.size() > performance.max_asset_size {
            warnings.push(Diagnostic::new(format!(
                "asset size limit: '{}' is {} and exceeds the limit of {}",
                file.path,
                format_bytes(file.size()),
                format_bytes(performance.max_asset_size),
            )));
        }
    }

    if let Some(limit) = performance.max_entrypoint_size {
        for entrypoint in entrypoints {
            let size: u64 = entrypoint
                .files
                .iter()
                .filter(|path| checked(path))
                .filter_map(|path| files.iter().find(|f| &f.path == path))
                .map(EmittedFile::size)
                .sum();
            if size > limit {
                warnings.push(Diagnostic::new(format!(
                    "entrypoint size limit: '{}' is {} and exceeds the limit of {} ({})",
                    entrypoint.name,
                    format_bytes(size),
                    format_bytes(limit),
                    entrypoint.files.join(", "),
                )));
            }
        }
    }

    CompilationOutcome::new("performance").with_warnings(warnings)
}

fn format_bytes(bytes: u64) -> String {
    if bytes >= 1_000_000 {
        format!("{:.2} MB", bytes as f64 / 1_000_000.0)
    } else if bytes >= 1_000 {
        format!("{:.2} KB", bytes as f64 / 1_000.0)
    } else {
        format!("{bytes} B")
    }
}
