//! Browser page shown instead of the app while the last compile failed.
//!
//! The page subscribes to hot-reload events, so it disappears as soon as a
//! compile succeeds.

use crate::dev::server::CLIENT_SCRIPT_PATH;

pub fn generate_error_overlay(errors: &[String]) -> String {
    let items: String = errors
        .iter()
        .map(|e| format!("<pre class=\"error\">{}</pre>\n", html_escape(e)))
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Failed to compile</title>
<style>
  body {{ margin: 0; padding: 2rem; background: #1e1e1e; color: #e8e8e8; font-family: Menlo, Consolas, monospace; }}
  h1 {{ color: #ff5555; font-size: 1.4rem; }}
  .error {{ background: #2a2a2a; border-left: 4px solid #ff5555; padding: 1rem; white-space: pre-wrap; overflow-x: auto; }}
  footer {{ color: #888; margin-top: 2rem; }}
</style>
</head>
<body>
<h1>Failed to compile</h1>
<p>{count} problem(s) found.</p>
{items}<footer>This page reloads when the next build succeeds.</footer>
<script src="{CLIENT_SCRIPT_PATH}"></script>
</body>
</html>
"#,
        count = errors.len(),
    )
}

pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(
            html_escape("<script>alert('x')</script>"),
            "&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"
        );
        assert_eq!(html_escape(r#"say "hi""#), "say &quot;hi&quot;");
    }

    #[test]
    fn overlay_lists_every_error() {
        let html = generate_error_overlay(&[
            "src/index.ts:3: Unexpected token".to_string(),
            "Could not resolve '<missing>'".to_string(),
        ]);
        assert!(html.contains("2 problem(s) found."));
        assert!(html.contains("src/index.ts:3: Unexpected token"));
        assert!(html.contains("Could not resolve &#x27;&lt;missing&gt;&#x27;"));
        assert!(html.contains(CLIENT_SCRIPT_PATH));
    }
}
