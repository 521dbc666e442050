//! Resolution extension ordering with per-platform overrides.

use crate::constants::RESOLVE_EXTENSIONS;

/// Build the ordered list of resolvable extensions.
///
/// Each prefix expands to `.{prefix}{ext}` for every canonical extension, in the
/// order the prefixes are given; the canonical set follows unmodified. Nothing
/// is de-duplicated, earlier entries win by position.
///
/// ```
/// use webrig_config::resolve_extensions;
///
/// let exts = resolve_extensions(&["mobile".to_string()]);
/// assert_eq!(exts[0], ".mobile.ts");
/// assert_eq!(exts[6], ".ts");
/// ```
pub fn resolve_extensions(prioritized_prefixes: &[String]) -> Vec<String> {
    let mut extensions =
        Vec::with_capacity((prioritized_prefixes.len() + 1) * RESOLVE_EXTENSIONS.len());

    for prefix in prioritized_prefixes {
        extensions.extend(RESOLVE_EXTENSIONS.iter().map(|ext| format!(".{prefix}{ext}")));
    }
    extensions.extend(RESOLVE_EXTENSIONS.iter().map(|ext| ext.to_string()));

    extensions
}
