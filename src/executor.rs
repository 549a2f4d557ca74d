//! The single-request executor.
//!
//! [`GraphQlExecutor`] sends exactly one HTTP request per call and
//! classifies the outcome; retrying is layered on top by
//! [`RetryPolicy`](crate::RetryPolicy) so the two stay independently
//! testable.

use std::str::FromStr;
use std::time::Duration;

use anilist_http::{body::body_to_bytes, HttpService};
use anilist_query::Document;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri};
use http_body_util::Full;
use tokio_util::sync::CancellationToken;
use tower::{Service, ServiceExt};
use tracing::debug;
use url::Url;

use crate::{ClientError, QueryEnvelope};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Issues one GraphQL request per call against a fixed endpoint.
#[derive(Clone)]
pub struct GraphQlExecutor {
    endpoint: Url,
    http: HttpService,
}

impl GraphQlExecutor {
    /// Construct an executor from an endpoint URL and a transport.
    pub fn new(endpoint: Url, http: HttpService) -> Self {
        Self { endpoint, http }
    }

    /// Send `document` once and classify the response.
    ///
    /// `token`, when present, is attached as a bearer `Authorization`
    /// header. Fails with `RateLimited` on 429 (carrying any
    /// `Retry-After` seconds), `Status` on any other non-200, transport
    /// errors from the service, `Json` on an unparseable body, and
    /// `GraphQl` when the envelope carries errors and no data.
    pub async fn execute(
        &self,
        document: &Document,
        token: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<QueryEnvelope, ClientError> {
        let body = serde_json::to_vec(document)
            .map_err(|err| ClientError::EncodeRequest(err.to_string()))?;

        let req = http::Request::builder()
            .uri(Uri::from_str(self.endpoint.as_ref())?)
            .method(Method::POST)
            .header(
                header::CONTENT_TYPE,
                HeaderValue::from_static(JSON_CONTENT_TYPE),
            )
            .header(header::ACCEPT, HeaderValue::from_static(JSON_CONTENT_TYPE));
        let req = match token {
            Some(token) => req.header(
                header::AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))?,
            ),
            None => req,
        };
        let req = req
            .body(Full::new(Bytes::from(body)))
            .map_err(|err| ClientError::Transport(err.into()))?;

        debug!(endpoint = %self.endpoint, "sending GraphQL request");

        // https://docs.rs/tower/latest/tower/trait.Service.html#be-careful-when-cloning-inner-services
        let mut http = self.http.clone();
        let send = async move { http.ready().await?.call(req).await };
        let mut resp = tokio::select! {
            () = cancel.cancelled() => return Err(ClientError::Cancelled),
            resp = send => resp.map_err(ClientError::Transport)?,
        };

        let status = resp.status();
        let retry_after = parse_retry_after(resp.headers());
        let bytes = match body_to_bytes(resp.body_mut()).await {
            Ok(bytes) => bytes,
            Err(err) => match err {},
        };

        if status == StatusCode::TOO_MANY_REQUESTS {
            debug!(?retry_after, "rate limited");
            return Err(ClientError::RateLimited { retry_after });
        }
        if status != StatusCode::OK {
            return Err(ClientError::Status {
                status,
                data: bytes,
            });
        }

        let envelope: QueryEnvelope =
            serde_json::from_slice(&bytes).map_err(|err| ClientError::Json {
                message: err.to_string(),
                data: bytes.clone(),
            })?;

        if envelope.data.is_none() {
            if envelope.errors.is_empty() {
                return Err(ClientError::MalformedResponse {
                    message: "envelope carried neither data nor errors".to_string(),
                });
            }
            return Err(ClientError::GraphQl {
                errors: envelope.errors,
            });
        }

        Ok(envelope)
    }
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(header::RETRY_AFTER)?.to_str().ok()?;
    value.parse::<u64>().ok().map(Duration::from_secs)
}
