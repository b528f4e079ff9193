//! Fragment sources
//!
//! Provides a trait for retrieving fragment markup that can be implemented
//! by different backends:
//! - HTTP: `GET <base>/<fragment>` with caching disabled
//! - Site root: files under a local directory, for pages built on disk

mod http;
mod site_root;

pub use http::HttpFetcher;
pub use site_root::SiteRootFetcher;

use crate::config::Config;
use crate::error::{PartialsError, PartialsResult};
use async_trait::async_trait;
use std::path::PathBuf;

/// Abstract fragment source
///
/// Any error is a fetch failure to the loader: non-success status,
/// transport failure, or an unreadable body.
#[async_trait]
pub trait FragmentFetcher: Send + Sync {
    /// Fetch the markup for `fragment`, bypassing any intermediate cache
    async fn fetch(&self, fragment: &str) -> PartialsResult<String>;

    /// Human-readable source description for display
    fn describe(&self) -> String;
}

/// Where fragments come from, after CLI flags and config are merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentSource {
    Http { base_url: String },
    SiteRoot(PathBuf),
}

impl FragmentSource {
    /// Pick a source: explicit flags win over config, a root wins over a URL
    pub fn resolve(
        root: Option<PathBuf>,
        base_url: Option<String>,
        config: &Config,
    ) -> PartialsResult<Self> {
        if let Some(root) = root {
            return Ok(Self::SiteRoot(root));
        }
        if let Some(base_url) = base_url {
            return Ok(Self::Http { base_url });
        }
        if let Some(root) = config.fetch.root.clone() {
            return Ok(Self::SiteRoot(root));
        }
        if let Some(base_url) = config.fetch.base_url.clone() {
            return Ok(Self::Http { base_url });
        }
        Err(PartialsError::NoFragmentSource)
    }
}

/// Create the fetcher for a resolved source
pub fn create_fetcher(source: &FragmentSource, config: &Config) -> Box<dyn FragmentFetcher> {
    match source {
        FragmentSource::Http { base_url } => Box::new(HttpFetcher::new(
            base_url.clone(),
            config.fetch.user_agent.clone(),
        )),
        FragmentSource::SiteRoot(root) => Box::new(SiteRootFetcher::new(root.clone())),
    }
}
