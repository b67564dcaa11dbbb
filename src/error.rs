//! Error types for card_price_lookup
//!
//! Sources are held behind `Arc` so a single load outcome can be handed to
//! every caller waiting on the same in-flight load.

use std::sync::Arc;
use thiserror::Error;

/// Unified error type for catalog loading
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(Arc<reqwest::Error>),
    /// HTTP error status code
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// Failed to parse catalog JSON
    #[error("Parse error: {0}")]
    Parse(Arc<serde_json::Error>),
    /// Reading a local catalog file failed
    #[error("I/O error: {0}")]
    Io(Arc<std::io::Error>),
    /// Catalog parsed but its content is unusable
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
    /// The background load task ended without producing a result
    #[error("Catalog load aborted: {0}")]
    LoadAborted(String),
}

impl CatalogError {
    /// Whether this error only means "no catalog available right now".
    ///
    /// Unavailability is not surfaced to callers; the service stays unloaded
    /// and searches return nothing.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            CatalogError::Network(_) | CatalogError::HttpStatus(_) | CatalogError::Io(_)
        )
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        CatalogError::Network(Arc::new(err))
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(Arc::new(err))
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(Arc::new(err))
    }
}

/// Result alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_covers_transport_errors_only() {
        let status = CatalogError::HttpStatus(reqwest::StatusCode::SERVICE_UNAVAILABLE);
        assert!(status.is_unavailable());

        let io = CatalogError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert!(io.is_unavailable());

        let parse = CatalogError::from(serde_json::from_str::<u32>("nope").unwrap_err());
        assert!(!parse.is_unavailable());
        assert!(!CatalogError::InvalidCatalog("empty".into()).is_unavailable());
    }

    #[test]
    fn display_includes_context() {
        let err = CatalogError::HttpStatus(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "HTTP error: 404 Not Found");

        let err = CatalogError::LoadAborted("task panicked".into());
        assert_eq!(err.to_string(), "Catalog load aborted: task panicked");
    }
}
