//! HTML page emission for entries that carry a template.
//!
//! Each page is its own child compilation named `html:<entry>`, so a missing
//! or unreadable template shows up as an error on the outcome tree rather than
//! aborting the whole compile.

use std::path::Path;

use crate::bundler::EmittedFile;
use crate::diagnostics::Diagnostic;
use crate::outcome::CompilationOutcome;

/// Tags injected into one page.
#[derive(Debug, Clone, Default)]
pub struct PageAssets<'a> {
    pub public_path: &'a str,
    pub scripts: Vec<&'a str>,
    pub stylesheets: Vec<&'a str>,
    /// Value of the `crossorigin` attribute, if any.
    pub cross_origin: Option<&'a str>,
}

/// Read `template` and emit `<entry>.html` with its assets injected.
pub fn emit_page(
    entry: &str,
    template: &Path,
    assets: &PageAssets<'_>,
) -> (CompilationOutcome, Option<EmittedFile>) {
    let outcome = CompilationOutcome::new(format!("html:{entry}"));
    match std::fs::read_to_string(template) {
        Ok(source) => {
            let page = EmittedFile::new(format!("{entry}.html"), inject(&source, assets));
            (outcome, Some(page))
        }
        Err(e) => {
            let error = Diagnostic::new(format!("failed to read HTML template: {e}"))
                .with_file(template.display().to_string());
            (outcome.with_errors([error]), None)
        }
    }
}

/// Insert stylesheet links before `</head>` and scripts before `</body>`.
///
/// Missing closing tags fall back to prepending (links) or appending (scripts).
pub fn inject(source: &str, assets: &PageAssets<'_>) -> String {
    let crossorigin = assets
        .cross_origin
        .map(|value| format!(" crossorigin=\"{value}\""))
        .unwrap_or_default();

    let links: String = assets
        .stylesheets
        .iter()
        .map(|href| {
            format!(
                "<link href=\"{}\" rel=\"stylesheet\">",
                public_url(assets.public_path, href)
            )
        })
        .collect();
    let scripts: String = assets
        .scripts
        .iter()
        .map(|src| {
            format!(
                "<script type=\"module\" src=\"{}\"{crossorigin}></script>",
                public_url(assets.public_path, src)
            )
        })
        .collect();

    let with_links = insert_before(source, "</head>", &links, false);
    insert_before(&with_links, "</body>", &scripts, true)
}

/// Join the public path and an output-relative file.
pub fn public_url(public_path: &str, file: &str) -> String {
    if public_path.is_empty() || public_path.ends_with('/') {
        format!("{public_path}{file}")
    } else {
        format!("{public_path}/{file}")
    }
}

fn insert_before(source: &str, tag: &str, fragment: &str, append_if_missing: bool) -> String {
    if fragment.is_empty() {
        return source.to_string();
    }
    match source.rfind(tag) {
        Some(pos) => format!("{}{fragment}{}", &source[..pos], &source[pos..]),
        None if append_if_missing => format!("{source}{fragment}"),
        None => format!("{fragment}{source}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "<html><head><title>t</title></head><body><div id=\"root\"></div></body></html>";

    #[test]
    fn tags_land_before_closing_tags() {
        let assets = PageAssets {
            public_path: "https://cdn.example.com/app/",
            scripts: vec!["static/js/index.1a2b3c4d.js"],
            stylesheets: vec!["static/css/9f8e7d6c.css"],
            cross_origin: Some("anonymous"),
        };
        let html = inject(TEMPLATE, &assets);
        assert!(html.contains(
            "<link href=\"https://cdn.example.com/app/static/css/9f8e7d6c.css\" rel=\"stylesheet\"></head>"
        ));
        assert!(html.contains(
            "src=\"https://cdn.example.com/app/static/js/index.1a2b3c4d.js\" crossorigin=\"anonymous\"></script></body>"
        ));
    }

    #[test]
    fn no_crossorigin_without_setting() {
        let assets = PageAssets {
            public_path: "/",
            scripts: vec!["static/js/index.js"],
            ..PageAssets::default()
        };
        let html = inject(TEMPLATE, &assets);
        assert!(html.contains("<script type=\"module\" src=\"/static/js/index.js\"></script>"));
        assert!(!html.contains("crossorigin"));
        assert!(!html.contains("<link"));
    }

    #[test]
    fn public_url_adds_missing_slash() {
        assert_eq!(public_url("/app", "a.js"), "/app/a.js");
        assert_eq!(public_url("/", "a.js"), "/a.js");
        assert_eq!(public_url("", "a.js"), "a.js");
    }

    #[test]
    fn missing_template_is_a_child_error() {
        let (outcome, page) = emit_page(
            "admin",
            Path::new("/definitely/not/here/admin.html"),
            &PageAssets::default(),
        );
        assert!(page.is_none());
        assert_eq!(outcome.name, "html:admin");
        assert_eq!(outcome.errors.len(), 1);
    }

    #[test]
    fn page_is_named_after_entry() {
        let temp = tempfile::TempDir::new().unwrap();
        let template = temp.path().join("index.html");
        std::fs::write(&template, TEMPLATE).unwrap();

        let (outcome, page) = emit_page("index", &template, &PageAssets::default());
        assert!(outcome.errors.is_empty());
        let page = page.unwrap();
        assert_eq!(page.path, "index.html");
        assert_eq!(page.contents, TEMPLATE.as_bytes());
    }
}
