/// Failures below the GraphQL layer: connectivity, timeouts, and body
/// handling. Status-code classification happens above this crate.
#[derive(thiserror::Error, Debug)]
pub enum HttpServiceError {
    /// Failed to establish a connection to the endpoint.
    #[error("Connect error: {:?}", .0)]
    Connect(Box<dyn std::error::Error + Send + Sync + 'static>),
    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    TimedOut,
    /// Failed to stream or buffer a request or response body.
    #[error("Body error: {:?}", .0)]
    Body(Box<dyn std::error::Error + Send + Sync + 'static>),
    /// [`http`]-related error, usually from request construction.
    #[error("HTTP error: {:?}", .0)]
    Http(#[from] http::Error),
    /// Anything the other variants do not cover.
    #[error("Unexpected HTTP error: {:?}", .0)]
    Unexpected(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl HttpServiceError {
    /// Whether this error is a connection failure.
    pub fn is_connect(&self) -> bool {
        matches!(self, HttpServiceError::Connect(_))
    }
    /// Whether this error is a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpServiceError::TimedOut)
    }
}
