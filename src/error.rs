//! Error types for partials
//!
//! All modules use `PartialsResult<T>` as their return type. The loader
//! itself never surfaces these to its caller; they flow to the observer.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for partials operations
pub type PartialsResult<T> = Result<T, PartialsError>;

/// All errors that can occur in partials
#[derive(Error, Debug)]
pub enum PartialsError {
    // Fetch errors
    #[error("Failed to load {fragment}: HTTP {status}")]
    FetchStatus { fragment: String, status: u16 },

    #[error("Failed to load {fragment}: {reason}")]
    Fetch { fragment: String, reason: String },

    #[error("Failed to read body of {fragment}: {reason}")]
    FetchBody { fragment: String, reason: String },

    #[error("Fragment path escapes site root: {0}")]
    FragmentOutsideRoot(String),

    #[error("No fragment source configured")]
    NoFragmentSource,

    // Storage errors
    #[error("Session storage {operation} failed for {key}: {reason}")]
    Storage {
        operation: &'static str,
        key: String,
        reason: String,
    },

    #[error("Invalid session name: {0}")]
    InvalidSession(String),

    // Page errors
    #[error("Invalid marker attribute: {0}")]
    InvalidMarker(String),

    #[error("Page has {expected} mount points but {actual} were supplied")]
    MountMismatch { expected: usize, actual: usize },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl PartialsError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a transport-level fetch error
    pub fn fetch(fragment: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            fragment: fragment.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a storage error for a read or write
    pub fn storage(operation: &'static str, key: impl Into<String>, reason: impl ToString) -> Self {
        Self::Storage {
            operation,
            key: key.into(),
            reason: reason.to_string(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NoFragmentSource => Some("Pass --root <dir> or --base-url <url>, or set fetch.root in config"),
            Self::FragmentOutsideRoot(_) => Some("Fragment paths must stay inside the site root"),
            Self::InvalidSession(_) => Some("Session names are single path segments, e.g. --session staging"),
            Self::InvalidMarker(_) => Some("Set loader.marker_attribute to an attribute name such as data-include"),
            Self::MountMismatch { .. } => Some("Render the same page the mount points were discovered from"),
            Self::ConfigInvalid { .. } => Some("Run: partials config init --force"),
            _ => None,
        }
    }
}
