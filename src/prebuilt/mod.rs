//! Prebuilt queries for common AniList operations, plus the enum
//! vocabulary they use.
//!
//! Everything here expands into the same [`Field`](anilist_query::Field)
//! trees a caller could build by hand; the helpers just encode the
//! AniList schema's names so callers don't have to.

use anilist_query::ArgumentValue;

mod media_list;

pub use media_list::{
    get_user_media_list, media_list_operation, media_list_pagination, UserMediaListFilters,
};

/// The kind of media an entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    /// Japanese animation.
    Anime,
    /// Comics, light novels, and the like.
    Manga,
}

impl MediaType {
    /// The schema's enum identifier.
    pub const fn as_graphql(self) -> &'static str {
        match self {
            MediaType::Anime => "ANIME",
            MediaType::Manga => "MANGA",
        }
    }
}

/// Where an entry sits in a user's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaListStatus {
    /// Currently watching or reading.
    Current,
    /// Planned but not started.
    Planning,
    /// Finished.
    Completed,
    /// Abandoned.
    Dropped,
    /// On hold.
    Paused,
    /// Re-watching or re-reading.
    Repeating,
}

impl MediaListStatus {
    /// The schema's enum identifier.
    pub const fn as_graphql(self) -> &'static str {
        match self {
            MediaListStatus::Current => "CURRENT",
            MediaListStatus::Planning => "PLANNING",
            MediaListStatus::Completed => "COMPLETED",
            MediaListStatus::Dropped => "DROPPED",
            MediaListStatus::Paused => "PAUSED",
            MediaListStatus::Repeating => "REPEATING",
        }
    }
}

/// Sort order for media list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaListSort {
    /// By score, ascending.
    Score,
    /// By score, descending.
    ScoreDesc,
    /// By media id, ascending.
    MediaId,
    /// By media id, descending.
    MediaIdDesc,
    /// By last update, ascending.
    UpdatedTime,
    /// By last update, descending.
    UpdatedTimeDesc,
}

impl MediaListSort {
    /// The schema's enum identifier.
    pub const fn as_graphql(self) -> &'static str {
        match self {
            MediaListSort::Score => "SCORE",
            MediaListSort::ScoreDesc => "SCORE_DESC",
            MediaListSort::MediaId => "MEDIA_ID",
            MediaListSort::MediaIdDesc => "MEDIA_ID_DESC",
            MediaListSort::UpdatedTime => "UPDATED_TIME",
            MediaListSort::UpdatedTimeDesc => "UPDATED_TIME_DESC",
        }
    }
}

/// How scores are rendered in responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreFormat {
    /// 0-100 integer.
    Point100,
    /// 0-10 with one decimal.
    Point10Decimal,
    /// 0-10 integer.
    Point10,
    /// 0-5 stars.
    Point5,
    /// 3-point smiley scale.
    Point3,
}

impl ScoreFormat {
    /// The schema's enum identifier.
    pub const fn as_graphql(self) -> &'static str {
        match self {
            ScoreFormat::Point100 => "POINT_100",
            ScoreFormat::Point10Decimal => "POINT_10_DECIMAL",
            ScoreFormat::Point10 => "POINT_10",
            ScoreFormat::Point5 => "POINT_5",
            ScoreFormat::Point3 => "POINT_3",
        }
    }
}

impl From<MediaType> for ArgumentValue {
    fn from(value: MediaType) -> Self {
        ArgumentValue::enum_value(value.as_graphql())
    }
}

impl From<MediaListStatus> for ArgumentValue {
    fn from(value: MediaListStatus) -> Self {
        ArgumentValue::enum_value(value.as_graphql())
    }
}

impl From<MediaListSort> for ArgumentValue {
    fn from(value: MediaListSort) -> Self {
        ArgumentValue::enum_value(value.as_graphql())
    }
}

impl From<ScoreFormat> for ArgumentValue {
    fn from(value: ScoreFormat) -> Self {
        ArgumentValue::enum_value(value.as_graphql())
    }
}
