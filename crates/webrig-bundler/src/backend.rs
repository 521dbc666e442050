//! [`Bundler`] implementation backed by rolldown.
//!
//! Rolldown produces flat, self-named chunks. They are then laid out the way
//! the configuration asks: entry and split chunks renamed by their filename
//! templates, stylesheets under `static/css`, other assets under
//! `static/media`. Imports between chunks are rewritten to match. HTML pages
//! and size budgets run afterwards as child compilations.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use rolldown::{
    BundlerBuilder, BundlerOptions, InputItem, OutputFormat, Platform, RawMinifyOptions,
    ResolveOptions, SourceMapType,
};
use rolldown_common::Output;
use tracing::debug;
use webrig_config::{BundlerConfig, Devtool, ResolveConfig};

use crate::budget::{self, Entrypoint};
use crate::bundler::{Bundler, Compilation, EmittedFile};
use crate::diagnostics;
use crate::filename::{self, TemplateVars};
use crate::html::{self, PageAssets};
use crate::outcome::{AssetInfo, CompilationOutcome};
use crate::{Error, Result};

const FALLBACK_ENTRY_FILENAME: &str = "static/js/[name].js";
const FALLBACK_CSS_FILENAME: &str = "static/css/[name].css";

#[derive(Debug, Clone, Copy, Default)]
pub struct RolldownBundler;

impl RolldownBundler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Bundler for RolldownBundler {
    async fn compile(&self, config: &BundlerConfig) -> Result<Compilation> {
        let mut bundler = BundlerBuilder::default()
            .with_options(to_rolldown_options(config))
            .build()
            .map_err(|e| Error::Invocation(format!("{e:?}")))?;

        let output = match bundler.generate().await {
            Ok(output) => output,
            Err(errors) => {
                let outcome =
                    CompilationOutcome::new("main").with_errors(diagnostics::from_rolldown(&errors));
                return Ok(Compilation {
                    outcome,
                    files: Vec::new(),
                });
            }
        };

        let mut chunks = Vec::new();
        let mut assets = Vec::new();
        for item in &output.assets {
            match item {
                Output::Chunk(chunk) => chunks.push(RawChunk {
                    name: chunk.name.to_string(),
                    filename: chunk.filename.to_string(),
                    code: chunk.code.clone(),
                    is_entry: chunk.is_entry,
                    imports: chunk.imports.iter().map(|s| s.to_string()).collect(),
                    map: chunk.map.as_ref().map(|m| m.to_json_string()),
                }),
                Output::Asset(asset) => assets.push(RawAsset {
                    filename: asset.filename.to_string(),
                    names: asset.names.clone(),
                    source: asset.source.as_bytes().to_vec(),
                }),
            }
        }
        let warnings: Vec<_> = output
            .warnings
            .iter()
            .flat_map(|w| diagnostics::from_rolldown(w))
            .collect();

        debug!(
            "rolldown produced {} chunk(s) and {} asset(s)",
            chunks.len(),
            assets.len()
        );

        let mut compilation = layout(config, chunks, assets);
        compilation.outcome.warnings = warnings;
        Ok(compilation)
    }
}

fn to_rolldown_options(config: &BundlerConfig) -> BundlerOptions {
    let input = config
        .entry
        .iter()
        .map(|entry| InputItem {
            name: Some(entry.name.clone()),
            import: entry.entry_path.to_string_lossy().into_owned(),
        })
        .collect();

    BundlerOptions {
        input: Some(input),
        cwd: Some(config.context.clone()),
        format: Some(OutputFormat::Esm),
        platform: Some(Platform::Browser),
        sourcemap: config.devtool.map(|devtool| match devtool {
            Devtool::InlineCheapModuleSourceMap => SourceMapType::Inline,
            Devtool::HiddenSourceMap => SourceMapType::Hidden,
        }),
        minify: config
            .optimization
            .minify_scripts()
            .then(|| RawMinifyOptions::from(true)),
        resolve: Some(to_resolve_options(&config.resolve)),
        ..Default::default()
    }
}

fn to_resolve_options(resolve: &ResolveConfig) -> ResolveOptions {
    let alias: Vec<(String, Vec<Option<String>>)> = resolve
        .alias
        .iter()
        .map(|(prefix, target)| {
            (
                prefix.clone(),
                vec![Some(target.to_string_lossy().into_owned())],
            )
        })
        .collect();

    let mut modules: Vec<String> = resolve
        .modules
        .iter()
        .map(|m| m.to_string_lossy().into_owned())
        .collect();
    modules.push("node_modules".to_string());

    ResolveOptions {
        alias: (!alias.is_empty()).then_some(alias),
        main_fields: Some(vec![
            "browser".to_string(),
            "module".to_string(),
            "main".to_string(),
        ]),
        condition_names: Some(vec![
            "browser".to_string(),
            "import".to_string(),
            "module".to_string(),
            "default".to_string(),
        ]),
        extensions: Some(resolve.extensions.clone()),
        modules: Some(modules),
        symlinks: Some(true),
        ..Default::default()
    }
}

/// A chunk as rolldown named it.
#[derive(Debug, Clone)]
struct RawChunk {
    name: String,
    filename: String,
    code: String,
    is_entry: bool,
    /// Filenames of statically imported chunks.
    imports: Vec<String>,
    map: Option<String>,
}

#[derive(Debug, Clone)]
struct RawAsset {
    filename: String,
    names: Vec<String>,
    source: Vec<u8>,
}

struct PlacedChunk {
    raw: RawChunk,
    path: String,
}

fn layout(config: &BundlerConfig, chunks: Vec<RawChunk>, assets: Vec<RawAsset>) -> Compilation {
    let mut next_id = 0;
    let placed: Vec<PlacedChunk> = chunks
        .into_iter()
        .map(|raw| {
            let path = chunk_path(config, &raw, &mut next_id);
            PlacedChunk { raw, path }
        })
        .collect();

    let renamed: HashMap<&str, &str> = placed
        .iter()
        .map(|c| (c.raw.filename.as_str(), c.path.as_str()))
        .collect();

    let mut files = Vec::new();
    let mut infos = Vec::new();
    for chunk in &placed {
        let code = rewrite_imports(&chunk.raw.code, &renamed);
        infos.push(AssetInfo {
            name: chunk.path.clone(),
            size: code.len() as u64,
            entry: chunk.raw.is_entry.then(|| chunk.raw.name.clone()),
        });
        files.push(EmittedFile::new(chunk.path.clone(), code));

        if config.devtool == Some(Devtool::HiddenSourceMap) {
            if let Some(map) = &chunk.raw.map {
                files.push(EmittedFile::new(format!("{}.map", chunk.path), map.clone()));
            }
        }
    }

    let mut stylesheets: Vec<(String, String)> = Vec::new();
    for asset in assets {
        if let Some(owner) = asset.filename.strip_suffix(".map") {
            if renamed.contains_key(owner) {
                continue;
            }
        }
        let path = if asset.filename.ends_with(".css") {
            let name = asset_name(&asset);
            let template = config.css_filename().unwrap_or(FALLBACK_CSS_FILENAME);
            let path = filename::render(
                template,
                TemplateVars {
                    name: &name,
                    id: 0,
                    ext: ".css",
                    contents: &asset.source,
                },
            );
            stylesheets.push((name, path.clone()));
            path
        } else {
            format!("static/media/{}", basename(&asset.filename))
        };
        infos.push(AssetInfo {
            name: path.clone(),
            size: asset.source.len() as u64,
            entry: None,
        });
        files.push(EmittedFile::new(path, asset.source));
    }

    let entrypoints = entrypoints(&placed);
    let mut outcome = CompilationOutcome::new("main").with_assets(infos);

    for (entry, template) in config.html_plugins() {
        let Some(entrypoint) = entrypoints.iter().find(|e| e.name == entry) else {
            outcome = outcome.with_child(
                CompilationOutcome::new(format!("html:{entry}")).with_errors([
                    diagnostics::Diagnostic::new(format!("no chunk was emitted for entry '{entry}'")),
                ]),
            );
            continue;
        };
        let page_assets = PageAssets {
            public_path: &config.output.public_path,
            scripts: entrypoint.files.first().map(String::as_str).into_iter().collect(),
            stylesheets: stylesheets
                .iter()
                .filter(|(name, _)| name == entry)
                .map(|(_, path)| path.as_str())
                .collect(),
            cross_origin: config.output.cross_origin_loading.as_deref(),
        };
        let (child, page) = html::emit_page(entry, template, &page_assets);
        outcome = outcome.with_child(child);
        files.extend(page);
    }

    if let Some(performance) = &config.performance {
        outcome = outcome.with_child(budget::check(performance, &files, &entrypoints));
    }

    Compilation { outcome, files }
}

fn chunk_path(config: &BundlerConfig, chunk: &RawChunk, next_id: &mut usize) -> String {
    let vars = |id| TemplateVars {
        name: &chunk.name,
        id,
        ext: ".js",
        contents: chunk.code.as_bytes(),
    };

    if chunk.is_entry {
        let template = config
            .entry_filename(&chunk.name)
            .unwrap_or(FALLBACK_ENTRY_FILENAME);
        return filename::render(template, vars(0));
    }

    let id = *next_id;
    *next_id += 1;
    match &config.output.chunk_filename {
        Some(template) => filename::render(template, vars(id)),
        None => format!("static/js/{}", basename(&chunk.filename)),
    }
}

/// Entry chunk followed by everything it statically imports, transitively.
fn entrypoints(placed: &[PlacedChunk]) -> Vec<Entrypoint> {
    let by_filename: HashMap<&str, &PlacedChunk> = placed
        .iter()
        .map(|c| (c.raw.filename.as_str(), c))
        .collect();

    placed
        .iter()
        .filter(|c| c.raw.is_entry)
        .map(|entry| {
            let mut files = vec![entry.path.clone()];
            let mut pending: Vec<&str> = entry.raw.imports.iter().map(String::as_str).collect();
            while let Some(import) = pending.pop() {
                let Some(chunk) = by_filename.get(import) else {
                    continue;
                };
                if files.contains(&chunk.path) {
                    continue;
                }
                files.push(chunk.path.clone());
                pending.extend(chunk.raw.imports.iter().map(String::as_str));
            }
            Entrypoint {
                name: entry.raw.name.clone(),
                files,
            }
        })
        .collect()
}

/// Point relative chunk imports at their new names. All chunks share one
/// directory, so only the basename changes.
fn rewrite_imports(code: &str, renamed: &HashMap<&str, &str>) -> String {
    let mut code = code.to_string();
    for (old, new) in renamed {
        let (old, new) = (basename(old), basename(new));
        if old == new {
            continue;
        }
        for quote in ['"', '\''] {
            code = code.replace(
                &format!("{quote}./{old}{quote}"),
                &format!("{quote}./{new}{quote}"),
            );
        }
    }
    code
}

fn asset_name(asset: &RawAsset) -> String {
    let source = asset.names.first().unwrap_or(&asset.filename);
    Path::new(source)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.clone())
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
