//! Error types for courier-http.

/// HTTP errors.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("malformed query parameter: {0:?}")]
    MalformedQuery(String),

    #[error("unsupported payload type: {0}")]
    UnsupportedType(&'static str),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    TransportFailure(#[source] reqwest::Error),

    #[error("response body is not available")]
    BodyUnavailable,

    #[error("JSON encode/decode failed: {0}")]
    DecodeFailure(#[from] serde_json::Error),

    #[error("invalid value for {var}: {message}")]
    Config { var: String, message: String },
}

impl HttpError {
    /// Whether this error is a transport failure caused by a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::TransportFailure(e) if e.is_timeout())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        HttpError::InvalidArgument(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HttpError>;
