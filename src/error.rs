use std::time::Duration;

use anilist_http::HttpServiceError;
use anilist_query::QueryBuildError;
use bytes::Bytes;
use http::StatusCode;
use thiserror::Error;

use crate::response::GraphQlError;

/// All failures that can surface from a client request.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The query tree was malformed; surfaced before any network call.
    #[error("invalid query: {0}")]
    Build(#[from] QueryBuildError),
    /// The client was misconfigured.
    #[error("invalid client configuration: {0}")]
    Config(String),
    /// Could not encode the outgoing request body.
    #[error("failed to encode request body: {0}")]
    EncodeRequest(String),
    /// The configured endpoint could not be converted to a request URI.
    #[error("unable to convert endpoint URL to URI")]
    InvalidUri(#[from] http::uri::InvalidUri),
    /// Tried to build an `Authorization` header from an invalid token.
    #[error("invalid bearer token")]
    InvalidToken(#[from] http::header::InvalidHeaderValue),
    /// The request failed below the GraphQL layer.
    #[error(transparent)]
    Transport(#[from] HttpServiceError),
    /// The server answered with a status outside {200, 429}.
    #[error("unexpected status code: {status}")]
    Status {
        /// The HTTP status code.
        status: StatusCode,
        /// The raw response body, for diagnostics.
        data: Bytes,
    },
    /// The response body was not valid JSON.
    #[error("response body was not valid JSON: {message}")]
    Json {
        /// The deserialization failure.
        message: String,
        /// The raw response body, for diagnostics.
        data: Bytes,
    },
    /// The server broke the response envelope contract.
    #[error("malformed response envelope: {message}")]
    MalformedResponse {
        /// What was missing or mistyped.
        message: String,
    },
    /// The server answered 429, with the `Retry-After` value if it sent one.
    #[error("rate limited by the server (retry after: {retry_after:?})")]
    RateLimited {
        /// Parsed `Retry-After` header, in whole seconds.
        retry_after: Option<Duration>,
    },
    /// The server reported semantic errors; never retried.
    #[error("server reported {} GraphQL error(s): {}", .errors.len(), first_message(.errors))]
    GraphQl {
        /// The ordered error list from the response envelope.
        errors: Vec<GraphQlError>,
    },
    /// The caller's cancellation signal fired.
    #[error("request was cancelled")]
    Cancelled,
    /// A retry budget ran out; always carries the triggering cause.
    #[error("retries exhausted after {attempts} attempts")]
    RetryExhausted {
        /// Total attempts made, including the first.
        attempts: u32,
        /// The last underlying error.
        #[source]
        source: Box<ClientError>,
    },
    /// Prebuilt query filters failed validation.
    #[error("invalid media list filters: {0}")]
    Filters(String),
}

fn first_message(errors: &[GraphQlError]) -> &str {
    errors.first().map(|err| err.message.as_str()).unwrap_or("")
}

/// How the retry policy treats an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RetryClass {
    /// Retried on the rate-limit budget, honoring `Retry-After`.
    RateLimit,
    /// Possibly transient; retried on the smaller transport budget.
    Transport,
    /// Never retried.
    Fatal,
}

impl ClientError {
    pub(crate) fn retry_class(&self) -> RetryClass {
        match self {
            ClientError::RateLimited { .. } => RetryClass::RateLimit,
            ClientError::Transport(_) | ClientError::Status { .. } | ClientError::Json { .. } => {
                RetryClass::Transport
            }
            _ => RetryClass::Fatal,
        }
    }
}
