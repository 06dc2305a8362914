//! Error types for the gateway client.

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while preparing or performing a request.
///
/// Validation errors are returned before any cache or transport interaction.
/// Cache misses and cache insert failures are never surfaced here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Gateway configuration is unusable (missing or too-short base URL).
    #[error("invalid gateway: {0}")]
    InvalidGateway(String),

    /// Request is unusable (missing path).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Opaque transport failure. The exchange did not complete.
    #[error("failed to connect: {0}")]
    Connection(String),

    /// The resolved request URL exceeds the transport limit.
    #[error("request URL too long ({length} bytes, limit {limit})")]
    UrlTooLong { length: usize, limit: usize },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing required field or data.
    #[error("missing required: {0}")]
    Missing(String),
}

impl Error {
    /// Create an invalid-gateway error.
    pub fn invalid_gateway(message: impl Into<String>) -> Self {
        Self::InvalidGateway(message.into())
    }

    /// Create an invalid-request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a missing field error.
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing(field.into())
    }
}
