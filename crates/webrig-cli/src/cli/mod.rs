//! Command-line interface definition.
//!
//! # Command Structure
//!
//! - `webrig build` - one-shot production build into `build/dist`
//! - `webrig dev` - development server with hot reload and API proxy

mod tests;

use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use webrig_config::{Flags, Overrides};

/// webrig - builds web applications from project conventions
#[derive(Parser, Debug)]
#[command(
    name = "webrig",
    version,
    about = "Convention-driven builds and dev server for web applications",
    long_about = "webrig discovers entries, aliases and asset paths from your project layout\n\
                  and drives a bundler with a complete development or production configuration."
)]
pub struct Cli {
    /// Enable verbose logging and dump the synthesized bundler configuration
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the project for production
    ///
    /// Cleans the output directory, copies static assets, compiles once and
    /// fails on any error or warning.
    Build(BuildArgs),

    /// Start the development server
    ///
    /// Serves the development build with hot reload, history fallback and an
    /// in-browser error overlay.
    Dev(DevArgs),
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project directory containing `src/` and `static/`
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub project: PathBuf,

    /// Options file (defaults to `<project>/webrig.config.json` when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Active environment, used by dynamic aliases and the public path
    #[arg(short, long, value_name = "NAME")]
    pub env: Option<String>,

    /// Name of the main entry
    #[arg(long, value_name = "NAME")]
    pub index_name: Option<String>,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Write profile.json and lift the entry-point size budget
    #[arg(long)]
    pub profile: bool,

    /// Checking mode. `fast` skips the pre-build format and lint checks
    #[arg(long, value_enum, default_value = "default")]
    pub mode: CheckMode,

    /// Per-entry-point size budget in kilobytes
    #[arg(long, value_name = "KB")]
    pub max_entry_point_kilo_byte: Option<u64>,

    /// Per-asset size budget in kilobytes
    #[arg(long, value_name = "KB")]
    pub max_asset_kilo_byte: Option<u64>,
}

#[derive(Args, Debug)]
pub struct DevArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Port to listen on
    #[arg(short, long, default_value = "3000", value_name = "PORT")]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0", value_name = "IP")]
    pub host: IpAddr,

    /// Serve over HTTPS with a self-signed certificate
    #[arg(long)]
    pub https: bool,

    /// Upstream that proxied API requests are forwarded to
    #[arg(long, value_name = "URL")]
    pub proxy_target: Option<String>,

    /// Path prefix to proxy, repeatable
    #[arg(long = "proxy-context", value_name = "PATH", requires = "proxy_target")]
    pub proxy_context: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckMode {
    #[default]
    Default,
    Fast,
}

impl BuildArgs {
    pub fn flags(&self) -> Flags {
        Flags::new()
            .with_env(self.project.env.as_deref())
            .with_profile(self.profile)
            .with_fast_mode(self.mode == CheckMode::Fast)
    }

    pub fn overrides(&self, verbose: bool) -> Overrides {
        Overrides {
            index_name: self.project.index_name.clone(),
            max_entry_point_kilo_byte: self.max_entry_point_kilo_byte,
            max_asset_kilo_byte: self.max_asset_kilo_byte,
            verbose: verbose.then_some(true),
        }
    }
}

impl DevArgs {
    pub fn flags(&self) -> Flags {
        Flags::new().with_env(self.project.env.as_deref())
    }

    pub fn overrides(&self, verbose: bool) -> Overrides {
        Overrides {
            index_name: self.project.index_name.clone(),
            verbose: verbose.then_some(true),
            ..Overrides::default()
        }
    }
}
