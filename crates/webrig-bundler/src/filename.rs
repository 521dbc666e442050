//! Output filename templates.
//!
//! Supported placeholders: `[name]`, `[id]`, `[ext]` and the hash forms
//! `[hash]`, `[chunkhash]`, `[contenthash]`, each optionally truncated with
//! `:N` (e.g. `[contenthash:8]`). Hashes are SHA-256 over the file contents.

use sha2::{Digest, Sha256};

pub fn content_hash(contents: &[u8]) -> String {
    let digest = Sha256::digest(contents);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Values substituted into a template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateVars<'a> {
    pub name: &'a str,
    pub id: usize,
    /// Extension including the dot, e.g. `.js`.
    pub ext: &'a str,
    pub contents: &'a [u8],
}

pub fn render(template: &str, vars: TemplateVars<'_>) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut hash: Option<String> = None;
    let mut rest = template;

    while let Some(open) = rest.find('[') {
        out.push_str(&rest[..open]);
        let Some(close) = rest[open..].find(']') else {
            rest = &rest[open..];
            break;
        };
        let token = &rest[open + 1..open + close];
        let (key, len) = match token.split_once(':') {
            Some((key, len)) => (key, len.parse::<usize>().ok()),
            None => (token, None),
        };

        match key {
            "name" => out.push_str(vars.name),
            "id" => out.push_str(&vars.id.to_string()),
            "ext" => out.push_str(vars.ext),
            "hash" | "chunkhash" | "contenthash" => {
                let full = hash.get_or_insert_with(|| content_hash(vars.contents));
                let len = len.unwrap_or(full.len()).min(full.len());
                out.push_str(&full[..len]);
            }
            _ => out.push_str(&rest[open..=open + close]),
        }
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars<'a>(name: &'a str, contents: &'a [u8]) -> TemplateVars<'a> {
        TemplateVars {
            name,
            id: 3,
            ext: ".js",
            contents,
        }
    }

    #[test]
    fn plain_template_is_unchanged() {
        assert_eq!(render("static/js/app.js", vars("x", b"")), "static/js/app.js");
    }

    #[test]
    fn name_and_id_are_substituted() {
        assert_eq!(
            render("static/js/[id].[name].js", vars("vendor", b"")),
            "static/js/3.vendor.js"
        );
    }

    #[test]
    fn hash_is_truncated_and_stable() {
        let a = render("static/js/[name].[chunkhash:8].js", vars("index", b"code"));
        let b = render("static/js/[name].[chunkhash:8].js", vars("index", b"code"));
        let c = render("static/js/[name].[chunkhash:8].js", vars("index", b"other"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), "static/js/index.12345678.js".len());
        assert!(a.starts_with("static/js/index."));
    }

    #[test]
    fn hash_matches_sha256() {
        let hash = content_hash(b"abc");
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(render("[contenthash:8][ext]", vars("x", b"abc")), "ba7816bf.js");
    }

    #[test]
    fn unknown_and_unclosed_tokens_pass_through() {
        assert_eq!(render("a/[query]/[name", vars("n", b"")), "a/[query]/[name");
    }
}
