//! File-backed session store
//!
//! One JSON file per session under the state directory. A session stands
//! in for a browsing session: entries survive between renders that share
//! the session name and are discarded by `cache clear`.

use super::Storage;
use crate::config::ConfigManager;
use crate::error::{PartialsError, PartialsResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Cached fragment entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedFragment {
    /// Raw markup
    pub html: String,

    /// When the markup was last stored
    pub stored_at: DateTime<Utc>,
}

impl CachedFragment {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            stored_at: Utc::now(),
        }
    }

    /// Short content digest for listings
    pub fn digest(&self) -> String {
        let hash = Sha256::digest(self.html.as_bytes());
        hex::encode(&hash[..6])
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    entries: BTreeMap<String, CachedFragment>,
}

/// Session cache persisted as a JSON file
pub struct SessionStore {
    path: PathBuf,
    // Serialises read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl SessionStore {
    /// Open the store for a named session in the state directory
    pub fn open(session: &str) -> PartialsResult<Self> {
        Ok(Self::at(ConfigManager::session_path(session)?))
    }

    /// Open a store backed by an explicit file
    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All entries, ordered by key
    pub async fn entries(&self) -> PartialsResult<Vec<(String, CachedFragment)>> {
        let _guard = self.lock.lock().await;
        let file = self.read_file().await?;
        Ok(file.entries.into_iter().collect())
    }

    /// Remove the session file, returning how many entries it held
    ///
    /// An unreadable file counts as empty and is removed all the same.
    pub async fn clear(&self) -> PartialsResult<usize> {
        let _guard = self.lock.lock().await;
        let count = match self.read_file().await {
            Ok(file) => file.entries.len(),
            Err(e) => {
                warn!("Discarding unreadable session file {}: {}", self.path.display(), e);
                0
            }
        };
        if self.path.exists() {
            fs::remove_file(&self.path).await.map_err(|e| {
                PartialsError::io(format!("removing session file {}", self.path.display()), e)
            })?;
        }
        debug!("Cleared {} cached fragments from {}", count, self.path.display());
        Ok(count)
    }

    async fn read_file(&self) -> PartialsResult<SessionFile> {
        if !self.path.exists() {
            return Ok(SessionFile::default());
        }

        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            PartialsError::io(format!("reading session file {}", self.path.display()), e)
        })?;

        Ok(serde_json::from_str(&content)?)
    }

    async fn write_file(&self, file: &SessionFile) -> PartialsResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PartialsError::io("creating sessions directory", e))?;
        }

        // Write beside the target and rename so readers never see a torn file
        let tmp = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(file)?;
        fs::write(&tmp, content)
            .await
            .map_err(|e| PartialsError::io(format!("writing session file {}", tmp.display()), e))?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            PartialsError::io(format!("replacing session file {}", self.path.display()), e)
        })?;

        Ok(())
    }
}

#[async_trait]
impl Storage for SessionStore {
    async fn get(&self, key: &str) -> PartialsResult<Option<String>> {
        let _guard = self.lock.lock().await;
        let file = self
            .read_file()
            .await
            .map_err(|e| PartialsError::storage("read", key, e))?;
        Ok(file.entries.get(key).map(|entry| entry.html.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> PartialsResult<()> {
        let _guard = self.lock.lock().await;
        // An unreadable file is replaced rather than blocking every write
        let mut file = self.read_file().await.unwrap_or_default();
        file.entries
            .insert(key.to_string(), CachedFragment::new(value));
        self.write_file(&file)
            .await
            .map_err(|e| PartialsError::storage("write", key, e))
    }
}
