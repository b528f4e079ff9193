//! HTTP fragment source

use super::FragmentFetcher;
use crate::error::{PartialsError, PartialsResult};
use async_trait::async_trait;
use tracing::debug;

/// Fetches fragments over HTTP with revalidation forced on every request
#[derive(Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    base_url: String,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        // Status codes are mapped here so the error carries the fragment
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build();

        Self {
            agent: ureq::Agent::new_with_config(config),
            base_url: base_url.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Resolve a fragment path against the base URL
    ///
    /// Absolute URLs are used as-is.
    pub fn resolve_url(&self, fragment: &str) -> String {
        if fragment.starts_with("http://") || fragment.starts_with("https://") {
            return fragment.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            fragment.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl FragmentFetcher for HttpFetcher {
    async fn fetch(&self, fragment: &str) -> PartialsResult<String> {
        let agent = self.agent.clone();
        let url = self.resolve_url(fragment);
        let user_agent = self.user_agent.clone();
        let fragment = fragment.to_string();

        // ureq is blocking; keep it off the cooperative loader task
        let task_fragment = fragment.clone();
        tokio::task::spawn_blocking(move || get_no_cache(&agent, &url, &user_agent, &task_fragment))
            .await
            .map_err(|e| PartialsError::fetch(fragment, e))?
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

fn get_no_cache(
    agent: &ureq::Agent,
    url: &str,
    user_agent: &str,
    fragment: &str,
) -> PartialsResult<String> {
    debug!("GET {}", url);

    let mut response = agent
        .get(url)
        .header("Cache-Control", "no-cache")
        .header("Pragma", "no-cache")
        .header("User-Agent", user_agent)
        .call()
        .map_err(|e| PartialsError::fetch(fragment, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PartialsError::FetchStatus {
            fragment: fragment.to_string(),
            status: status.as_u16(),
        });
    }

    response
        .body_mut()
        .read_to_string()
        .map_err(|e| PartialsError::FetchBody {
            fragment: fragment.to_string(),
            reason: e.to_string(),
        })
}
