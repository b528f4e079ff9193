//! Mount point state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a mount's current content came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderSource {
    #[default]
    None,
    Cache,
    Network,
}

impl RenderSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderSource::None => "none",
            RenderSource::Cache => "cache",
            RenderSource::Network => "network",
        }
    }
}

impl fmt::Display for RenderSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of one load attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountOutcome {
    Skipped,
    Network,
    Cache,
    Error,
}

/// A document location that receives fragment content
///
/// `content` holds the mount's children, never the element itself, so the
/// flags below stay attached to the same element across renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountPoint {
    /// Fragment path, used both as cache key and fetch target
    pub fragment_id: String,

    /// Current children markup
    pub content: String,

    pub render_source: RenderSource,

    pub loading: bool,

    /// Set whenever cached markup was injected
    pub cache_applied: bool,

    pub load_error: bool,
}

impl MountPoint {
    pub fn new(fragment_id: impl Into<String>) -> Self {
        Self {
            fragment_id: fragment_id.into(),
            ..Self::default()
        }
    }

    /// Mount with pre-existing children
    pub fn with_content(fragment_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            fragment_id: fragment_id.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    /// Whether anything visible is rendered into the mount
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }

    /// Replace the mount's children and record their provenance
    pub fn inject(&mut self, html: String, source: RenderSource) {
        self.content = html;
        self.render_source = source;
        if source == RenderSource::Cache {
            self.cache_applied = true;
        }
    }

    /// Outcome once the attempt has settled
    pub fn outcome(&self) -> MountOutcome {
        if self.fragment_id.is_empty() {
            MountOutcome::Skipped
        } else if self.load_error {
            MountOutcome::Error
        } else {
            match self.render_source {
                RenderSource::Network => MountOutcome::Network,
                RenderSource::Cache => MountOutcome::Cache,
                RenderSource::None => MountOutcome::Skipped,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_not_content() {
        assert!(!MountPoint::with_content("/a.html", "  \n ").has_content());
        assert!(MountPoint::with_content("/a.html", "<p>x</p>").has_content());
    }

    #[test]
    fn inject_tracks_cache_application() {
        let mut mount = MountPoint::new("/a.html");
        mount.inject("<p>old</p>".into(), RenderSource::Cache);
        mount.inject("<p>new</p>".into(), RenderSource::Network);

        assert_eq!(mount.content, "<p>new</p>");
        assert_eq!(mount.render_source, RenderSource::Network);
        assert!(mount.cache_applied);
        assert_eq!(mount.outcome(), MountOutcome::Network);
    }

    #[test]
    fn render_source_serializes_lowercase() {
        let json = serde_json::to_string(&RenderSource::Network).unwrap();
        assert_eq!(json, "\"network\"");
        assert_eq!(RenderSource::Cache.to_string(), "cache");
    }
}
