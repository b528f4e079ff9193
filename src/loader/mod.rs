//! Partial-include loader
//!
//! Resolves the content of every mount point on a page: cached markup is
//! rendered immediately when the mount is empty, then a fresh fetch
//! replaces it. When the fetch fails, stale cache is better than nothing.
//!
//! # Per-mount states
//!
//! | From | Event | To |
//! |------|-------|----|
//! | empty | cache hit | rendered(cache), still loading |
//! | any | fetch ok | rendered(network) |
//! | rendered(cache) | fetch failed | rendered(cache) |
//! | no content | fetch failed, cache hit | rendered(cache) |
//! | any | fetch failed otherwise | error (content untouched) |
//!
//! Every attempt starts by clearing `load_error` and `cache_applied`, so a
//! mount can be loaded again after a failed run.
//!
//! Network always wins over cache for the same mount. Nothing here ever
//! fails the caller: fetch and storage errors go to the [`LoadObserver`].

mod mount;
mod observer;

pub use mount::{MountOutcome, MountPoint, RenderSource};
pub use observer::{FailureKind, LoadObserver, TracingObserver};

use crate::fetch::FragmentFetcher;
use crate::storage::Storage;
use futures_util::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Default namespace for cache keys
pub const DEFAULT_CACHE_PREFIX: &str = "partials:";

/// Terminal states after a `load_all`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub network: usize,
    pub cache: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl LoadSummary {
    pub fn from_mounts(mounts: &[MountPoint]) -> Self {
        let mut summary = Self::default();
        for mount in mounts {
            match mount.outcome() {
                MountOutcome::Network => summary.network += 1,
                MountOutcome::Cache => summary.cache += 1,
                MountOutcome::Error => summary.failed += 1,
                MountOutcome::Skipped => summary.skipped += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.network + self.cache + self.failed + self.skipped
    }
}

/// Loads fragments into mount points through injected capabilities
pub struct PartialLoader {
    fetcher: Arc<dyn FragmentFetcher>,
    storage: Arc<dyn Storage>,
    observer: Arc<dyn LoadObserver>,
    cache_prefix: String,
}

impl PartialLoader {
    pub fn new(fetcher: Arc<dyn FragmentFetcher>, storage: Arc<dyn Storage>) -> Self {
        Self {
            fetcher,
            storage,
            observer: Arc::new(TracingObserver),
            cache_prefix: DEFAULT_CACHE_PREFIX.to_string(),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn LoadObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_cache_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.cache_prefix = prefix.into();
        self
    }

    /// Cache key for a fragment
    pub fn cache_key(&self, fragment_id: &str) -> String {
        format!("{}{}", self.cache_prefix, fragment_id)
    }

    /// Load every mount point concurrently and wait for all of them
    ///
    /// On return each mount is in a terminal state: rendered from the
    /// network, rendered from cache, marked as failed, or skipped.
    pub async fn load_all(&self, mounts: &mut [MountPoint]) -> LoadSummary {
        join_all(mounts.iter_mut().map(|mount| self.load_one(mount))).await;

        let summary = LoadSummary::from_mounts(mounts);
        info!(
            "Loaded {} mount points: {} network, {} cache, {} failed, {} skipped",
            summary.total(),
            summary.network,
            summary.cache,
            summary.failed,
            summary.skipped
        );
        summary
    }

    /// Run one mount through its cache-then-network attempt
    pub async fn load_one(&self, mount: &mut MountPoint) {
        if mount.fragment_id.is_empty() {
            debug!("Skipping mount point without fragment id");
            return;
        }

        let fragment_id = mount.fragment_id.clone();
        mount.loading = true;
        mount.load_error = false;
        mount.cache_applied = false;

        if let Some(html) = self.read_cache(&fragment_id).await {
            if !mount.has_content() {
                debug!(fragment = %fragment_id, "Rendering cached fragment");
                mount.inject(html, RenderSource::Cache);
            }
        }

        match self.fetcher.fetch(&fragment_id).await {
            Ok(html) => {
                self.write_cache(&fragment_id, &html).await;
                mount.inject(html, RenderSource::Network);
                mount.loading = false;
            }
            Err(e) => {
                self.observer.on_failure(&fragment_id, FailureKind::Fetch, &e);

                // The optimistic cache render already stands in for the fragment
                if mount.cache_applied {
                    debug!(fragment = %fragment_id, "Keeping cached fragment after failed fetch");
                    mount.loading = false;
                    return;
                }

                // Re-read: a sibling mount may have stored it meanwhile
                if !mount.has_content() {
                    if let Some(html) = self.read_cache(&fragment_id).await {
                        debug!(fragment = %fragment_id, "Falling back to cached fragment");
                        mount.inject(html, RenderSource::Cache);
                        mount.loading = false;
                        return;
                    }
                }

                mount.loading = false;
                mount.load_error = true;
            }
        }
    }

    async fn read_cache(&self, fragment_id: &str) -> Option<String> {
        match self.storage.get(&self.cache_key(fragment_id)).await {
            Ok(html) => html,
            Err(e) => {
                self.observer.on_failure(fragment_id, FailureKind::CacheRead, &e);
                None
            }
        }
    }

    async fn write_cache(&self, fragment_id: &str, html: &str) {
        if let Err(e) = self.storage.set(&self.cache_key(fragment_id), html).await {
            self.observer.on_failure(fragment_id, FailureKind::CacheWrite, &e);
        }
    }
}
