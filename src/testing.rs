//! Shared fixtures for in-crate tests.

use anilist_http::{HttpRequest, HttpResponse, HttpService, HttpServiceError};
use bytes::Bytes;
use http_body_util::Full;
use tower::ServiceExt;
use tower_test::mock;

pub(crate) type HttpHandle = mock::Handle<HttpRequest, HttpResponse>;

/// A scripted transport: tests pull requests off the handle and push
/// responses back.
pub(crate) fn mock_http_service() -> (HttpService, HttpHandle) {
    let (service, handle) = mock::pair::<HttpRequest, HttpResponse>();
    let service = service.map_err(HttpServiceError::Unexpected).boxed_clone();
    (service, handle)
}

pub(crate) fn json_response(status: u16, body: serde_json::Value) -> HttpResponse {
    http::Response::builder()
        .status(status)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

/// An AniList-shaped page envelope around `items`.
pub(crate) fn page_response(items: &[serde_json::Value], has_next: bool) -> HttpResponse {
    json_response(
        200,
        serde_json::json!({
            "data": {
                "Page": {
                    "pageInfo": {"hasNextPage": has_next},
                    "mediaList": items,
                }
            }
        }),
    )
}

pub(crate) async fn request_json(req: &mut HttpRequest) -> serde_json::Value {
    let bytes = match anilist_http::body::body_to_bytes(req.body_mut()).await {
        Ok(bytes) => bytes,
        Err(err) => match err {},
    };
    serde_json::from_slice(&bytes).unwrap()
}
