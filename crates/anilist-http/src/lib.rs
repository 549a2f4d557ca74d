#![warn(missing_docs)]

//! [`tower`] transport seam for the AniList client.
//!
//! Everything above this crate works against [`HttpService`], a boxed
//! clonable [`tower::Service`] from [`http`] requests to fully-buffered
//! [`http`] responses. [`ReqwestService`] is the production
//! implementation; tests substitute mock services.

use std::time::Duration;

use buildstructor::Builder;
use bytes::Bytes;
use derive_getters::Getters;
pub use http_body_util::{BodyExt, Empty, Full};
use tower::util::BoxCloneService;

pub mod body;
mod error;
mod reqwest;

pub use error::HttpServiceError;
pub use reqwest::ReqwestService;

/// Ease-of-use synonym for the request type this crate operates on
pub type HttpRequest = http::Request<Full<Bytes>>;
/// Ease-of-use synonym for the response type this crate operates on
pub type HttpResponse = http::Response<Full<Bytes>>;
/// Ease-of-use synonym for the [`tower::Service`] type this crate provides
pub type HttpService = BoxCloneService<HttpRequest, HttpResponse, HttpServiceError>;

/// Configuration for constructing an [`HttpService`], agnostic to the
/// underlying implementation.
#[derive(Clone, Debug, Builder, Default, Getters)]
pub struct HttpServiceConfig {
    timeout: Option<Duration>,
}
