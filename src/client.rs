//! The high-level client tying the pieces together.

use std::sync::Arc;
use std::time::Duration;

use anilist_http::{HttpService, HttpServiceConfig, ReqwestService};
use anilist_query::{Document, Operation};
use buildstructor::buildstructor;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::auth::{AuthProvider, NoAuth};
use crate::executor::GraphQlExecutor;
use crate::pagination::{self, Pagination};
use crate::retry::RetryPolicy;
use crate::{ClientError, QueryEnvelope};

/// The public AniList GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://graphql.anilist.co";

/// An AniList GraphQL client: executor, retry policy, auth provider,
/// and cancellation token behind one surface.
///
/// Cloning is cheap; clones share the transport, the auth provider, and
/// the cancellation token.
#[derive(Clone)]
pub struct AnilistClient {
    executor: GraphQlExecutor,
    retry: RetryPolicy,
    auth: Arc<dyn AuthProvider>,
    cancel: CancellationToken,
}

#[buildstructor]
impl AnilistClient {
    /// Construct a client.
    ///
    /// Every part has a default: the public AniList endpoint, a
    /// [`ReqwestService`] transport (honoring `timeout` when given),
    /// [`NoAuth`], the default [`RetryPolicy`], and a fresh
    /// [`CancellationToken`].
    #[builder]
    pub fn new(
        endpoint: Option<Url>,
        http_service: Option<HttpService>,
        auth: Option<Arc<dyn AuthProvider>>,
        retry: Option<RetryPolicy>,
        timeout: Option<Duration>,
        cancellation_token: Option<CancellationToken>,
    ) -> Result<Self, ClientError> {
        let endpoint = match endpoint {
            Some(endpoint) => endpoint,
            None => Url::parse(DEFAULT_ENDPOINT)
                .map_err(|err| ClientError::Config(err.to_string()))?,
        };
        let http = match http_service {
            Some(service) => service,
            None => ReqwestService::builder()
                .config(HttpServiceConfig::builder().and_timeout(timeout).build())
                .build()
                .map_err(|err| ClientError::Config(err.to_string()))?
                .into(),
        };
        Ok(Self {
            executor: GraphQlExecutor::new(endpoint, http),
            retry: retry.unwrap_or_default(),
            auth: auth.unwrap_or_else(|| Arc::new(NoAuth)),
            cancel: cancellation_token.unwrap_or_default(),
        })
    }
}

impl AnilistClient {
    /// The token that aborts this client's in-flight work when
    /// cancelled.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Build `operation` into a document and execute it with retries,
    /// authenticated as `user_id` (or the provider's default user).
    ///
    /// Partial successes come back as envelopes; use [`Self::request_data`]
    /// for all-or-nothing semantics.
    pub async fn request(
        &self,
        operation: Operation,
        user_id: Option<&str>,
    ) -> Result<QueryEnvelope, ClientError> {
        self.request_document(operation.into_document()?, user_id)
            .await
    }

    /// Execute an already-built document with retries.
    pub async fn request_document(
        &self,
        document: Document,
        user_id: Option<&str>,
    ) -> Result<QueryEnvelope, ClientError> {
        let token = self.auth.token_for(user_id);
        self.retry
            .run(&self.cancel, || {
                let document = document.clone();
                let token = token.clone();
                async move {
                    self.executor
                        .execute(&document, token.as_deref(), &self.cancel)
                        .await
                }
            })
            .await
    }

    /// Like [`Self::request`], but demand total success and return the
    /// data map directly.
    pub async fn request_data(
        &self,
        operation: Operation,
        user_id: Option<&str>,
    ) -> Result<serde_json::Map<String, serde_json::Value>, ClientError> {
        self.request(operation, user_id).await?.into_data()
    }

    /// Fetch every page of `operation` per `pagination`, returning
    /// items in server order. The operation's `page`/`perPage`
    /// variables are rewritten by the engine.
    pub async fn paginated_request(
        &self,
        operation: Operation,
        pagination: &Pagination,
        user_id: Option<&str>,
    ) -> Result<Vec<serde_json::Map<String, serde_json::Value>>, ClientError> {
        pagination::paginate(
            &self.executor,
            &self.retry,
            &self.cancel,
            operation.into_document()?,
            self.auth.token_for(user_id),
            pagination,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use anilist_query::{Field, Operation, Variable};
    use anyhow::Result;
    use http::header;
    use speculoos::prelude::*;
    use tokio::task;
    use url::Url;

    use super::AnilistClient;
    use crate::auth::{AuthProvider, StaticToken, TokenStore};
    use crate::testing::{json_response, mock_http_service};
    use crate::ClientError;

    fn viewer_operation() -> Operation {
        let viewer = Field::new("Viewer")
            .select(vec![Field::new("id"), Field::new("name")])
            .unwrap();
        Operation::query(vec![viewer]).unwrap()
    }

    fn client_with(
        auth: Option<Arc<dyn AuthProvider>>,
    ) -> (AnilistClient, crate::testing::HttpHandle) {
        let (service, handle) = mock_http_service();
        let client = AnilistClient::builder()
            .endpoint(Url::parse("http://example.com/graphql").unwrap())
            .http_service(service)
            .and_auth(auth)
            .build()
            .unwrap();
        (client, handle)
    }

    #[tokio::test]
    async fn it_attaches_the_default_users_token() -> Result<()> {
        let mut store = TokenStore::new();
        store.insert("7", "seven-token");
        store.set_default_user("7");
        let (client, mut handle) = client_with(Some(Arc::new(store)));

        let responder = task::spawn(async move {
            let (req, send_response) = handle.next_request().await.unwrap();
            assert_that!(req.headers().get(header::AUTHORIZATION))
                .is_some()
                .is_equal_to(&http::HeaderValue::from_static("Bearer seven-token"));
            send_response.send_response(json_response(
                200,
                serde_json::json!({"data": {"Viewer": {"id": 7, "name": "somebody"}}}),
            ));
        });

        let data = client.request_data(viewer_operation(), None).await?;
        responder.await?;

        assert_eq!(data["Viewer"]["name"], serde_json::json!("somebody"));
        Ok(())
    }

    #[tokio::test]
    async fn unauthenticated_requests_carry_no_auth_header() -> Result<()> {
        let (client, mut handle) = client_with(None);

        let responder = task::spawn(async move {
            let (req, send_response) = handle.next_request().await.unwrap();
            assert_that!(req.headers().get(header::AUTHORIZATION)).is_none();
            send_response.send_response(json_response(
                200,
                serde_json::json!({"data": {"Viewer": null}}),
            ));
        });

        client.request(viewer_operation(), None).await?;
        responder.await?;
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limited_requests_are_retried_to_success() -> Result<()> {
        let (client, mut handle) = client_with(Some(Arc::new(StaticToken::new("t"))));

        let responder = task::spawn(async move {
            let (_, send_response) = handle.next_request().await.unwrap();
            let resp = http::Response::builder()
                .status(429)
                .header(header::RETRY_AFTER, "1")
                .body(anilist_http::Full::new(bytes::Bytes::new()))
                .unwrap();
            send_response.send_response(resp);

            let (_, send_response) = handle.next_request().await.unwrap();
            send_response.send_response(json_response(
                200,
                serde_json::json!({"data": {"Viewer": {"id": 7}}}),
            ));
        });

        let started = tokio::time::Instant::now();
        let data = client.request_data(viewer_operation(), None).await?;
        responder.await?;

        assert_eq!(data["Viewer"]["id"], serde_json::json!(7));
        assert_that!(started.elapsed()).is_greater_than_or_equal_to(Duration::from_secs(1));
        Ok(())
    }

    #[tokio::test]
    async fn strict_requests_reject_partial_success() -> Result<()> {
        let (client, mut handle) = client_with(None);

        let responder = task::spawn(async move {
            let (_, send_response) = handle.next_request().await.unwrap();
            send_response.send_response(json_response(
                200,
                serde_json::json!({
                    "data": {"Viewer": null},
                    "errors": [{"message": "Private profile"}]
                }),
            ));
        });

        let err = client
            .request_data(viewer_operation(), None)
            .await
            .unwrap_err();
        responder.await?;

        assert_that!(err).matches(|err| matches!(err, ClientError::GraphQl { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn cancelling_the_client_aborts_requests() -> Result<()> {
        let (client, _handle) = client_with(None);
        client.cancellation_token().cancel();

        let err = client
            .request(viewer_operation(), None)
            .await
            .unwrap_err();
        assert_that!(err).matches(|err| matches!(err, ClientError::Cancelled));
        Ok(())
    }

    #[test]
    fn invalid_builds_surface_before_any_request() {
        let user = Field::new("User")
            .arg("id", Variable::new("id", "Int", 7))
            .select(vec![Field::new("id"), Field::new("id")]);
        assert_that!(user).is_err();
    }
}
