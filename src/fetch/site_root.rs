//! Local site-root fragment source

use super::FragmentFetcher;
use crate::error::{PartialsError, PartialsResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Reads fragments from files under a site root, the way a static file
/// server would map request paths
#[derive(Debug, Clone)]
pub struct SiteRootFetcher {
    root: PathBuf,
}

impl SiteRootFetcher {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Map a fragment path onto a file under the root
    ///
    /// Query strings and anchors are dropped. Paths that would leave the
    /// root are rejected.
    pub fn resolve_path(&self, fragment: &str) -> PartialsResult<PathBuf> {
        let path = fragment
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_start_matches('/');

        let mut resolved = self.root.clone();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => return Err(PartialsError::FragmentOutsideRoot(fragment.to_string())),
            }
        }

        Ok(resolved)
    }
}

#[async_trait]
impl FragmentFetcher for SiteRootFetcher {
    async fn fetch(&self, fragment: &str) -> PartialsResult<String> {
        let path = self.resolve_path(fragment)?;

        let bytes = fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => PartialsError::FetchStatus {
                fragment: fragment.to_string(),
                status: 404,
            },
            _ => PartialsError::fetch(fragment, e),
        })?;

        String::from_utf8(bytes).map_err(|e| PartialsError::FetchBody {
            fragment: fragment.to_string(),
            reason: e.to_string(),
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
