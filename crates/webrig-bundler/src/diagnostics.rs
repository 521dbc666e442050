//! Diagnostic extraction from rolldown errors and warnings.
//!
//! Rolldown's diagnostic types are not stable across releases, so messages are
//! taken from their debug rendering and location details are parsed out of it.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// One error or warning on a compilation outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: None,
            line: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{file}:{line}: {}", self.message),
            (Some(file), None) => write!(f, "{file}: {}", self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// Extract diagnostics from a rolldown error batch or a single diagnostic.
pub fn from_rolldown(error: &dyn Debug) -> Vec<Diagnostic> {
    let error_str = format!("{error:?}");

    let parts: Vec<&str> = error_str
        .split("BatchedBuildDiagnostic")
        .filter(|s| !s.trim().is_empty())
        .collect();

    if parts.len() > 1 {
        parts.iter().map(|part| extract_single(part)).collect()
    } else {
        vec![extract_single(&error_str)]
    }
}

fn extract_single(text: &str) -> Diagnostic {
    Diagnostic {
        message: text.trim().to_string(),
        file: extract_file_path(text),
        line: extract_line_number(text),
    }
}

/// Find a source file path by its extension and a leading indicator.
fn extract_file_path(text: &str) -> Option<String> {
    for ext in [".tsx", ".ts", ".jsx", ".js", ".mjs", ".css", ".less"] {
        let Some(pos) = text.find(ext) else {
            continue;
        };
        let before = &text[..pos + ext.len()];
        for indicator in ["in ", "at ", "file: ", "path: ", "\"", "'"] {
            if let Some(start) = before.rfind(indicator) {
                let path = before[start + indicator.len()..].trim();
                if !path.is_empty() && !path.contains(char::is_whitespace) {
                    return Some(path.to_string());
                }
            }
        }
    }
    None
}

/// Parse `line 5` or `file.ts:5:10` style locations.
fn extract_line_number(text: &str) -> Option<u32> {
    if let Some(pos) = text.find("line ") {
        let digits: String = text[pos + 5..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if let Ok(line) = digits.parse() {
            return Some(line);
        }
    }

    text.match_indices(':').find_map(|(pos, _)| {
        let digits: String = text[pos + 1..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        let followed_by_column = text[pos + 1 + digits.len()..].starts_with(':');
        if followed_by_column { digits.parse().ok() } else { None }
    })
}
