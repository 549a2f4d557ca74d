//! Fetching a user's media list.

use anilist_query::{Field, Operation, Variable};

use crate::client::AnilistClient;
use crate::pagination::Pagination;
use crate::prebuilt::{MediaListSort, MediaListStatus, MediaType, ScoreFormat};
use crate::ClientError;

/// Filters for a user's media list.
///
/// Exactly one of `user_id`/`user_name` must be set. Date bounds are
/// AniList fuzzy dates, integers in `YYYYMMDD` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMediaListFilters {
    /// AniList id of the user. Set this or `user_name`, not both.
    pub user_id: Option<i64>,
    /// AniList user name of the user. Set this or `user_id`, not both.
    pub user_name: Option<String>,
    /// Restrict to anime or manga; `None` returns both.
    pub media_type: Option<MediaType>,
    /// Restrict to entries in any of these statuses; `None` allows all.
    pub status_in: Option<Vec<MediaListStatus>>,
    /// Earliest start date, `YYYYMMDD`.
    pub started_at_greater: Option<i64>,
    /// Latest start date, `YYYYMMDD`.
    pub started_at_lesser: Option<i64>,
    /// Earliest completion date, `YYYYMMDD`.
    pub completed_at_greater: Option<i64>,
    /// Latest completion date, `YYYYMMDD`.
    pub completed_at_lesser: Option<i64>,
    /// Sort order, applied in sequence.
    pub sort: Vec<MediaListSort>,
    /// Score rendering for the `score` field.
    pub score_format: ScoreFormat,
}

impl Default for UserMediaListFilters {
    fn default() -> Self {
        Self {
            user_id: None,
            user_name: None,
            media_type: None,
            status_in: None,
            started_at_greater: None,
            started_at_lesser: None,
            completed_at_greater: None,
            completed_at_lesser: None,
            sort: vec![MediaListSort::ScoreDesc, MediaListSort::MediaId],
            score_format: ScoreFormat::Point100,
        }
    }
}

impl UserMediaListFilters {
    /// Check the user id/name invariant.
    pub fn validate(&self) -> Result<(), ClientError> {
        match (&self.user_id, &self.user_name) {
            (None, None) => Err(ClientError::Filters(
                "provide one of `user_id` or `user_name`".to_string(),
            )),
            (Some(_), Some(_)) => Err(ClientError::Filters(
                "provide `user_id` or `user_name`, not both".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

fn fuzzy_date(name: &str) -> Result<Field, ClientError> {
    Ok(Field::new(name).select(vec![
        Field::new("year"),
        Field::new("month"),
        Field::new("day"),
    ])?)
}

/// Expand `filters` into the paged media list query.
///
/// The returned operation carries `$page`/`$perPage` variables for the
/// pagination engine to rewrite.
pub fn media_list_operation(filters: &UserMediaListFilters) -> Result<Operation, ClientError> {
    filters.validate()?;

    let mut list = Field::new("mediaList");
    if let Some(user_id) = filters.user_id {
        list = list.arg("userId", Variable::new("userId", "Int", user_id));
    }
    if let Some(user_name) = &filters.user_name {
        list = list.arg(
            "userName",
            Variable::new("userName", "String", user_name.clone()),
        );
    }
    if let Some(media_type) = filters.media_type {
        list = list.arg("type", media_type);
    }
    if let Some(statuses) = &filters.status_in {
        list = list.arg("status_in", statuses.clone());
    }
    if let Some(bound) = filters.started_at_greater {
        list = list.arg("startedAt_greater", bound);
    }
    if let Some(bound) = filters.started_at_lesser {
        list = list.arg("startedAt_lesser", bound);
    }
    if let Some(bound) = filters.completed_at_greater {
        list = list.arg("completedAt_greater", bound);
    }
    if let Some(bound) = filters.completed_at_lesser {
        list = list.arg("completedAt_lesser", bound);
    }
    if !filters.sort.is_empty() {
        list = list.arg("sort", filters.sort.clone());
    }

    let media = Field::new("media").select(vec![
        Field::new("id"),
        Field::new("title").select(vec![
            Field::new("romaji"),
            Field::new("native"),
            Field::new("english"),
        ])?,
        Field::new("format"),
        Field::new("episodes"),
        Field::new("chapters"),
        Field::new("averageScore"),
    ])?;

    let list = list.select(vec![
        Field::new("id"),
        Field::new("mediaId"),
        Field::new("status"),
        Field::new("score").arg("format", filters.score_format),
        Field::new("progress"),
        Field::new("repeat"),
        Field::new("private"),
        Field::new("notes"),
        Field::new("hiddenFromStatusLists"),
        fuzzy_date("startedAt")?,
        fuzzy_date("completedAt")?,
        media,
    ])?;

    let page = Field::new("Page")
        .arg("page", Variable::new("page", "Int", 1))
        .arg("perPage", Variable::new("perPage", "Int", 50))
        .select(vec![
            Field::new("pageInfo").select(vec![Field::new("hasNextPage")])?,
            list,
        ])?;

    Ok(Operation::query(vec![page])?)
}

/// Pagination config matching [`media_list_operation`]'s response shape.
pub fn media_list_pagination() -> Pagination {
    Pagination::builder()
        .items_path(vec!["Page".to_string(), "mediaList".to_string()])
        .build()
}

/// Fetch every entry of a user's media list, as raw item maps.
///
/// `user_id` selects whose token authenticates the request (not whose
/// list is fetched; that comes from `filters`).
pub async fn get_user_media_list(
    client: &AnilistClient,
    filters: &UserMediaListFilters,
    user_id: Option<&str>,
) -> Result<Vec<serde_json::Map<String, serde_json::Value>>, ClientError> {
    client
        .paginated_request(media_list_operation(filters)?, &media_list_pagination(), user_id)
        .await
}
