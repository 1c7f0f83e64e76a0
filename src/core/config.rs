//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.atlas/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::listing::DEFAULT_PAGE_SIZE;
use crate::core::state::Route;
use crate::countries::client::DEFAULT_BASE_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AtlasConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub debounce_ms: Option<u64>,
    pub page_size: Option<usize>,
    pub start_route: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    pub data_dir: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub debounce: Duration,
    pub page_size: usize,
    pub start_route: Route,
    /// `None` = no home directory; favorites live in memory for this run.
    pub data_dir: Option<PathBuf>,
}

/// Values given on the command line (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub route: Option<String>,
    pub data_dir: Option<String>,
    pub debounce_ms: Option<u64>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.atlas`.
pub fn atlas_home() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".atlas"))
}

/// Returns the path to `~/.atlas/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    atlas_home().map(|h| h.join("config.toml"))
}

/// Load config from `~/.atlas/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `AtlasConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<AtlasConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(AtlasConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<AtlasConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(AtlasConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: AtlasConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Atlas Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults -> this file -> env vars -> CLI flags.

# [general]
# debounce_ms = 500                  # Quiet period before a search is sent
# page_size = 16                     # Countries revealed per page
# start_route = "/"                  # Or "/country/BRA"

# [api]
# base_url = "https://restcountries.com/v3.1"   # Or set ATLAS_BASE_URL

# [storage]
# data_dir = "/home/me/.atlas/storage"          # Or set ATLAS_DATA_DIR
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &AtlasConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("ATLAS_BASE_URL").ok())
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Data dir: CLI → env → config → ~/.atlas/storage
    let data_dir = cli
        .data_dir
        .clone()
        .or_else(|| std::env::var("ATLAS_DATA_DIR").ok())
        .or_else(|| config.storage.data_dir.clone())
        .map(PathBuf::from)
        .or_else(|| atlas_home().map(|h| h.join("storage")));

    let debounce_ms = cli
        .debounce_ms
        .or(config.general.debounce_ms)
        .unwrap_or(DEFAULT_DEBOUNCE_MS);

    let page_size = match config.general.page_size {
        Some(0) => {
            warn!("page_size must be at least 1, using {}", DEFAULT_PAGE_SIZE);
            DEFAULT_PAGE_SIZE
        }
        Some(n) => n,
        None => DEFAULT_PAGE_SIZE,
    };

    let start_route = resolve_route(cli.route.as_deref().or(config.general.start_route.as_deref()));

    ResolvedConfig {
        base_url,
        debounce: Duration::from_millis(debounce_ms),
        page_size,
        start_route,
        data_dir,
    }
}

/// Parses the start route, falling back to the listing on a bad path.
fn resolve_route(raw: Option<&str>) -> Route {
    let Some(raw) = raw else {
        return Route::Listing;
    };
    match Route::parse(raw) {
        Some(route) => route,
        None => {
            warn!("Unknown start route {:?}, using /", raw);
            Route::Listing
        }
    }
}
