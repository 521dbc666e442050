//! Fixed policy values shared by the resolvers and the synthesizer.

pub const MAX_ENTRY_POINT_KILO_BYTE: u64 = 1500;
pub const MAX_ASSET_KILO_BYTE: u64 = 4000;

/// Canonical resolution order, before any prioritized prefixes.
pub const RESOLVE_EXTENSIONS: &[&str] = &[".ts", ".tsx", ".js", ".jsx", ".less", ".css"];

/// Conventional main entry filenames, highest priority first.
pub const MAIN_ENTRY_FILENAMES: &[&str] = &[
    "index.tsx",
    "index.ts",
    "index.jsx",
    "index.js",
    "index.less",
    "index.css",
];

pub const IMAGE_EXTENSIONS: &[&str] = &[".png", ".jpeg", ".jpg", ".gif", ".svg"];
pub const FONT_EXTENSIONS: &[&str] = &[".woff", ".woff2", ".eot", ".ttf", ".otf"];
pub const MEDIA_EXTENSIONS: &[&str] = &[".mp3", ".mp4", ".wav", ".mov", ".flv", ".avi"];

pub const DEFAULT_INDEX_NAME: &str = "index";
pub const DEFAULT_PUBLIC_PATH: &str = "/";

pub const SRC_DIR: &str = "src";
pub const STATIC_DIR: &str = "static";
pub const OUTPUT_DIR: &str = "build/dist";
pub const PROFILE_FILE: &str = "profile.json";
pub const CACHE_DIR: &str = ".webrig-cache";
pub const TSCONFIG_FILE: &str = "tsconfig.json";
pub const CONFIG_FILE: &str = "webrig.config.json";
