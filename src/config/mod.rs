//! Configuration management for partials

pub mod schema;

pub use schema::Config;

use crate::error::{PartialsError, PartialsResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("partials")
            .join("config.toml")
    }

    /// Get the state directory path
    pub fn state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("partials")
    }

    /// Get the session cache directory path
    pub fn sessions_dir() -> PathBuf {
        Self::state_dir().join("sessions")
    }

    /// Get the cache file for a named session
    ///
    /// Session names are single file names: separators and leading dots
    /// are rejected so a session can never point outside the sessions dir.
    pub fn session_path(session: &str) -> PartialsResult<PathBuf> {
        if session.is_empty()
            || session.starts_with('.')
            || session.contains(['/', '\\', '\0'])
        {
            return Err(PartialsError::InvalidSession(session.to_string()));
        }
        Ok(Self::sessions_dir().join(format!("{}.json", session)))
    }

    /// Load configuration, falling back to defaults if the file is missing
    pub async fn load(&self) -> PartialsResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> PartialsResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| PartialsError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| PartialsError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> PartialsResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PartialsError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            PartialsError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
