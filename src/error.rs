//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`
//! ([`crate::downstream::DownstreamError`], [`crate::config::ConfigError`]);
//! this module aggregates them for unified handling. CLI/main uses `anyhow`
//! for convenient propagation at the binary edge.

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Downstream library service error
    #[error("Downstream service error: {0}")]
    Downstream(#[from] crate::downstream::DownstreamError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Requested entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// Create a not found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("album rg-1");
        assert!(err.to_string().contains("album rg-1"));
    }

    #[test]
    fn test_downstream_error_converts() {
        let err: Error = crate::downstream::DownstreamError::Config("no key".to_string()).into();
        assert!(err.to_string().contains("no key"));
    }
}
