//! Failure reporting for the loader
//!
//! The loader swallows every failure; observers are how they stay visible.

use crate::error::PartialsError;
use tracing::warn;

/// Which step of a load attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Fetching the fragment (status, transport or body)
    Fetch,
    /// Reading the session cache
    CacheRead,
    /// Writing the session cache
    CacheWrite,
}

/// Receives every contained failure
pub trait LoadObserver: Send + Sync {
    fn on_failure(&self, fragment_id: &str, kind: FailureKind, error: &PartialsError);
}

/// Default observer: logs through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_failure(&self, fragment_id: &str, kind: FailureKind, error: &PartialsError) {
        match kind {
            FailureKind::Fetch => warn!(fragment = fragment_id, "{}", error),
            FailureKind::CacheRead | FailureKind::CacheWrite => {
                warn!(fragment = fragment_id, ?kind, "cache unavailable: {}", error)
            }
        }
    }
}
