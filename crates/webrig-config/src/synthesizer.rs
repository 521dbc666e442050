//! Composition of the resolvers into development and production configs.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use tracing::info;

use crate::alias::{AliasMap, resolve_aliases};
use crate::bundler_config::{
    AssetKind, BundlerConfig, CacheConfig, Devtool, FilenameRule, Minimizer, Mode, Optimization,
    OutputConfig, Performance, Plugin, ResolveConfig, Rule, SplitChunks, Target,
};
use crate::constants::{
    CACHE_DIR, FONT_EXTENSIONS, IMAGE_EXTENSIONS, MEDIA_EXTENSIONS, OUTPUT_DIR, PROFILE_FILE,
    SRC_DIR, STATIC_DIR, TSCONFIG_FILE,
};
use crate::entry::{ConventionalTemplate, EntryDescriptor, EntryOptions, TemplateLocator, resolve_entries};
use crate::error::Result;
use crate::extensions::resolve_extensions;
use crate::flags::Flags;
use crate::options::SynthesizerOptions;
use crate::public_path::resolve_public_path;

/// Resolves entries, aliases, extensions and the public path once, then
/// composes them into either configuration variant.
///
/// Both [`development`](Self::development) and [`production`](Self::production)
/// are pure: they never re-run resolution and can be called any number of times.
#[derive(Debug, Clone)]
pub struct ConfigSynthesizer {
    flags: Flags,
    project_dir: PathBuf,
    src_dir: PathBuf,
    tsconfig: PathBuf,
    max_entry_point_kilo_byte: u64,
    max_asset_kilo_byte: u64,
    verbose: bool,
    entries: Vec<EntryDescriptor>,
    extensions: Vec<String>,
    modules: Vec<PathBuf>,
    aliases: AliasMap,
    public_path: String,
}

impl ConfigSynthesizer {
    pub fn new(options: &SynthesizerOptions, flags: &Flags) -> Result<Self> {
        Self::with_template_locator(options, flags, &ConventionalTemplate)
    }

    pub fn with_template_locator(
        options: &SynthesizerOptions,
        flags: &Flags,
        templates: &dyn TemplateLocator,
    ) -> Result<Self> {
        let project_dir = options.project_directory.clean();
        let src_dir = project_dir.join(SRC_DIR);
        let tsconfig = options
            .tsconfig_file_path
            .as_deref()
            .map(|p| absolutize(&project_dir, p))
            .unwrap_or_else(|| project_dir.join(TSCONFIG_FILE));

        let entries = resolve_entries(
            &EntryOptions {
                src_dir: &src_dir,
                project_dir: &project_dir,
                index_name: &options.index_name,
                extra_entries: &options.extra_entries,
            },
            templates,
        )?;
        let public_path = resolve_public_path(flags.env(), options.public_path.as_ref())?;
        let extensions = resolve_extensions(&options.prioritized_extension_prefixes);
        let modules = std::iter::once(src_dir.clone())
            .chain(
                options
                    .external_modules
                    .iter()
                    .map(|m| absolutize(&project_dir, m)),
            )
            .collect();
        let aliases = resolve_aliases(flags.env(), &options.dynamic_config_resolvers, &project_dir)?;

        let synthesizer = Self {
            flags: flags.clone(),
            project_dir,
            src_dir,
            tsconfig,
            max_entry_point_kilo_byte: options.max_entry_point_kilo_byte,
            max_asset_kilo_byte: options.max_asset_kilo_byte,
            verbose: options.verbose,
            entries,
            extensions,
            modules,
            aliases,
            public_path,
        };
        synthesizer.log_summary();
        Ok(synthesizer)
    }

    fn log_summary(&self) {
        let entries: Vec<&str> = self.entries.iter().map(|e| e.name.as_str()).collect();
        let aliases = serde_json::to_string_pretty(&self.aliases).unwrap_or_default();

        info!("Config constructed:");
        info!(
            "-- Code Checking: {}",
            if self.flags.fast_mode() { "Minimal Check" } else { "Default" }
        );
        info!("-- Env: {}", self.flags.env().unwrap_or("[N/A]"));
        info!("-- Src Directory: {}", self.src_dir.display());
        info!("-- HTML Entries: {}", entries.join(" / "));
        info!("-- Public URL: {}", self.public_path);
        info!("-- Dynamic Aliases: {aliases}");
    }

    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    pub fn static_dir(&self) -> PathBuf {
        self.project_dir.join(STATIC_DIR)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.project_dir.join(OUTPUT_DIR)
    }

    pub fn profile_path(&self) -> PathBuf {
        self.project_dir.join(PROFILE_FILE)
    }

    pub fn entries(&self) -> &[EntryDescriptor] {
        &self.entries
    }

    pub fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    fn resolve_config(&self) -> ResolveConfig {
        ResolveConfig {
            extensions: self.extensions.clone(),
            modules: self.modules.clone(),
            alias: self.aliases.clone(),
        }
    }

    fn html_plugins(&self) -> impl Iterator<Item = Plugin> + '_ {
        self.entries.iter().filter_map(|e| {
            e.html_path.as_ref().map(|template| Plugin::Html {
                entry: e.name.clone(),
                template: template.clone(),
            })
        })
    }

    /// Fast, unminified, hot-reloading configuration.
    pub fn development(&self) -> BundlerConfig {
        let plugins = self
            .html_plugins()
            .chain([
                Plugin::ReactRefresh,
                Plugin::HotModuleReplacement,
                Plugin::Progress { profile: false },
            ])
            .collect();

        let config = BundlerConfig {
            mode: Mode::Development,
            context: self.project_dir.clone(),
            entry: self.entries.clone(),
            target: vec![Target::Web],
            output: OutputConfig {
                path: None,
                filename: FilenameRule::Template("static/js/[name].js".to_string()),
                chunk_filename: None,
                public_path: "/".to_string(),
                cross_origin_loading: None,
            },
            resolve: self.resolve_config(),
            devtool: Some(Devtool::InlineCheapModuleSourceMap),
            optimization: Optimization {
                used_exports: true,
                split_chunks: SplitChunks::default(),
                minimizer: Vec::new(),
            },
            performance: None,
            rules: vec![
                Rule::Script {
                    tsconfig: self.tsconfig.clone(),
                    transpile_only: true,
                    fast_refresh: true,
                },
                stylesheet_rule(false),
                image_rule(),
                inline_rule(),
            ],
            plugins,
            cache: Some(CacheConfig {
                cache_directory: self.project_dir.join(CACHE_DIR),
            }),
            bail: false,
        };
        self.dump(&config);
        config
    }

    /// Minified, content-hashed, budget-enforced configuration writing to
    /// `output_dir`.
    pub fn production(&self, output_dir: &Path) -> BundlerConfig {
        let profile = self.flags.profile();

        let mut plugins: Vec<Plugin> = self.html_plugins().collect();
        plugins.push(Plugin::CrossOriginScriptTag);
        plugins.push(Plugin::CssExtract {
            filename: if profile {
                "static/css/[name].[contenthash:8].css"
            } else {
                "static/css/[contenthash:8].css"
            }
            .to_string(),
            ignore_order: true,
        });
        if profile {
            plugins.push(Plugin::Progress { profile: true });
        }

        let config = BundlerConfig {
            mode: Mode::Production,
            context: self.project_dir.clone(),
            entry: self.entries.clone(),
            target: vec![Target::Web, Target::Es5],
            output: OutputConfig {
                path: Some(output_dir.to_path_buf()),
                filename: if profile {
                    FilenameRule::Template("static/js/[name].js".to_string())
                } else {
                    FilenameRule::PerEntry
                },
                chunk_filename: Some(
                    if profile {
                        "static/js/[id].[name].js"
                    } else {
                        "static/js/[id].[chunkhash:8].js"
                    }
                    .to_string(),
                ),
                public_path: self.public_path.clone(),
                cross_origin_loading: Some("anonymous".to_string()),
            },
            resolve: self.resolve_config(),
            devtool: Some(Devtool::HiddenSourceMap),
            optimization: Optimization {
                used_exports: true,
                split_chunks: SplitChunks::default(),
                minimizer: vec![Minimizer::Script { source_map: true }, Minimizer::Stylesheet],
            },
            performance: Some(Performance {
                max_entrypoint_size: (!profile)
                    .then(|| self.max_entry_point_kilo_byte.saturating_mul(1000)),
                max_asset_size: self.max_asset_kilo_byte.saturating_mul(1000),
                excluded_extensions: to_strings(MEDIA_EXTENSIONS),
            }),
            rules: vec![
                Rule::Script {
                    tsconfig: self.tsconfig.clone(),
                    transpile_only: false,
                    fast_refresh: false,
                },
                stylesheet_rule(true),
                image_rule(),
                inline_rule(),
            ],
            plugins,
            cache: None,
            bail: true,
        };
        self.dump(&config);
        config
    }

    fn dump(&self, config: &BundlerConfig) {
        if self.verbose {
            info!("Full bundler config:\n{}", config.to_json_pretty());
        }
    }
}

fn absolutize(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.clean()
    } else {
        base.join(path).clean()
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn stylesheet_rule(minimize: bool) -> Rule {
    Rule::Stylesheet {
        minimize,
        extract: minimize,
    }
}

fn image_rule() -> Rule {
    Rule::Asset {
        kind: AssetKind::Resource,
        extensions: to_strings(IMAGE_EXTENSIONS),
    }
}

fn inline_rule() -> Rule {
    let mut extensions = vec![".ico".to_string()];
    extensions.extend(to_strings(MEDIA_EXTENSIONS));
    extensions.extend(to_strings(FONT_EXTENSIONS));
    Rule::Asset {
        kind: AssetKind::Inline,
        extensions,
    }
}
