//! Partials - HTML partial includes with session caching
//!
//! Fills placeholder elements with fragment markup: cached markup renders
//! first, a fresh fetch replaces it, and stale cache covers fetch failures.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetch;
pub mod loader;
pub mod page;
pub mod storage;

pub use error::{PartialsError, PartialsResult};
pub use loader::{LoadSummary, MountPoint, PartialLoader, RenderSource};
