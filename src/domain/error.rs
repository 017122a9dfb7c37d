//! Asset resolution errors.

use crate::domain::value_objects::BackendName;

/// Errors surfaced by backends and the backend registry.
///
/// Nothing is retried and no fallback backend is tried; every error is
/// terminal for the call that produced it.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The computed path or URL does not exist or answered with a non-success status.
    #[error("asset not found: {location}")]
    NotFound { location: String },

    #[error("unknown backend: {name}. available: {}", .valid.join(", "))]
    UnknownBackend {
        name: String,
        valid: Vec<&'static str>,
    },

    /// An optional dependency could not be bound while constructing a backend.
    #[error("optional dependency missing: {0}")]
    DependencyMissing(String),

    /// Operation invoked on a backend that failed to initialize.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("{operation} is not supported by the {backend} backend")]
    Unsupported {
        backend: BackendName,
        operation: &'static str,
    },

    #[error("request to {location} failed: {source}")]
    Transport {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    /// Failure reported by the external catalogue, passed through unchanged.
    #[error("catalogue error: {0}")]
    Catalogue(String),
}

impl AssetError {
    pub fn not_found(location: impl Into<String>) -> Self {
        Self::NotFound {
            location: location.into(),
        }
    }

    pub fn unknown_backend(name: impl Into<String>) -> Self {
        Self::UnknownBackend {
            name: name.into(),
            valid: BackendName::valid_names(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;
