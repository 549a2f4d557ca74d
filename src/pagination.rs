//! The pagination engine.
//!
//! Drives a `page`/`perPage`-parameterized document across pages,
//! reading `pageInfo.hasNextPage` and an item list from configured
//! response paths. Delivery is all-or-nothing: a failure on any page
//! returns the error and no items, so a caller can never mistake a
//! truncated list for the full set.

use anilist_query::Document;
use buildstructor::buildstructor;
use derive_getters::Getters;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::executor::GraphQlExecutor;
use crate::retry::RetryPolicy;
use crate::ClientError;

/// AniList caps `perPage` at 50.
pub const MAX_PER_PAGE: u32 = 50;

/// How to page a list-producing query.
#[derive(Clone, Debug, PartialEq, Eq, Getters)]
pub struct Pagination {
    /// Path from the data root to the item array.
    items_path: Vec<String>,
    /// Path from the data root to the `pageInfo` object.
    page_info_path: Vec<String>,
    /// Items requested per page, clamped to AniList's maximum.
    per_page: u32,
    /// Stop after this many items, truncating the final page's tail.
    max_items: Option<usize>,
}

#[buildstructor]
impl Pagination {
    /// Construct a pagination config.
    ///
    /// `page_info_path` defaults to `Page.pageInfo` and `per_page` to
    /// the AniList maximum of 50.
    #[builder]
    pub fn new(
        items_path: Vec<String>,
        page_info_path: Option<Vec<String>>,
        per_page: Option<u32>,
        max_items: Option<usize>,
    ) -> Self {
        Self {
            items_path,
            page_info_path: page_info_path
                .unwrap_or_else(|| vec!["Page".to_string(), "pageInfo".to_string()]),
            per_page: per_page.unwrap_or(MAX_PER_PAGE).clamp(1, MAX_PER_PAGE),
            max_items,
        }
    }
}

/// Fetch every page of `document`, returning items in server order.
pub(crate) async fn paginate(
    executor: &GraphQlExecutor,
    retry: &RetryPolicy,
    cancel: &CancellationToken,
    mut document: Document,
    token: Option<String>,
    pagination: &Pagination,
) -> Result<Vec<serde_json::Map<String, serde_json::Value>>, ClientError> {
    let mut items = Vec::new();
    if pagination.max_items == Some(0) {
        return Ok(items);
    }
    let mut page: u64 = 1;
    document.set_variable("perPage", pagination.per_page);

    loop {
        document.set_variable("page", page);
        let envelope = retry
            .run(cancel, || {
                let document = document.clone();
                let token = token.clone();
                async move {
                    executor
                        .execute(&document, token.as_deref(), cancel)
                        .await
                }
            })
            .await?;
        let data = envelope.into_data()?;

        let page_items = items_at(&data, &pagination.items_path)?;
        let has_next = has_next_page(&data, &pagination.page_info_path)?;
        debug!(page, count = page_items.len(), has_next, "fetched page");

        if page_items.is_empty() {
            // Guard against a server reporting hasNextPage forever.
            if has_next {
                warn!(page, "server reported hasNextPage on an empty page; stopping");
            }
            break;
        }

        for item in page_items {
            let item = item
                .as_object()
                .ok_or_else(|| ClientError::MalformedResponse {
                    message: format!("item under `{}` is not an object", pagination.items_path.join(".")),
                })?;
            items.push(item.clone());
            if let Some(cap) = pagination.max_items {
                if items.len() >= cap {
                    debug!(cap, "item cap reached; stopping");
                    return Ok(items);
                }
            }
        }

        if !has_next {
            break;
        }
        page += 1;
    }

    Ok(items)
}

fn value_at<'a>(
    data: &'a serde_json::Map<String, serde_json::Value>,
    path: &[String],
) -> Option<&'a serde_json::Value> {
    let (first, rest) = path.split_first()?;
    let mut current = data.get(first)?;
    for segment in rest {
        current = current.get(segment)?;
    }
    Some(current)
}

fn items_at<'a>(
    data: &'a serde_json::Map<String, serde_json::Value>,
    path: &[String],
) -> Result<&'a Vec<serde_json::Value>, ClientError> {
    value_at(data, path)
        .and_then(serde_json::Value::as_array)
        .ok_or_else(|| ClientError::MalformedResponse {
            message: format!("no item array at `{}`", path.join(".")),
        })
}

fn has_next_page(
    data: &serde_json::Map<String, serde_json::Value>,
    page_info_path: &[String],
) -> Result<bool, ClientError> {
    value_at(data, page_info_path)
        .and_then(|page_info| page_info.get("hasNextPage"))
        .and_then(serde_json::Value::as_bool)
        .ok_or_else(|| ClientError::MalformedResponse {
            message: format!("no `hasNextPage` under `{}`", page_info_path.join(".")),
        })
}
