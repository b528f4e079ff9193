//! Configuration schema for partials
//!
//! Configuration is stored at `~/.config/partials/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Mount point discovery and cache keying
    pub loader: LoaderConfig,

    /// Where fragments are fetched from
    pub fetch: FetchConfig,

    /// Session cache settings
    pub storage: StorageConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
        }
    }
}

/// Loader settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Attribute marking a mount point; its value is the fragment path
    pub marker_attribute: String,

    /// Namespace prefix for session cache keys
    pub cache_prefix: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            marker_attribute: "data-include".to_string(),
            cache_prefix: "partials:".to_string(),
        }
    }
}

/// Fragment source settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Base URL fragment paths are resolved against
    pub base_url: Option<String>,

    /// Local site root fragment paths are resolved against
    pub root: Option<PathBuf>,

    /// User-Agent sent with HTTP requests
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            root: None,
            user_agent: format!("partials/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Session cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Use the session cache (default: true)
    pub enabled: bool,

    /// Session name; each session has its own cache file
    pub session: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            session: "default".to_string(),
        }
    }
}
