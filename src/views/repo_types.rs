use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::media::repo_types::MediaType;

/// One logged viewing of a title.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct View {
    pub id: Uuid,
    pub viewer_id: Uuid,
    pub tmdb_id: i32,
    pub title: String,
    pub media_type: MediaType,
    pub genre_ids: Vec<i32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub release_year: Option<i32>,
    pub runtime: Option<i32>,
    #[serde(with = "time::serde::rfc3339")]
    pub watched_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewView {
    pub viewer_id: Uuid,
    pub tmdb_id: i32,
    pub title: String,
    pub media_type: MediaType,
    pub genre_ids: Vec<i32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub release_year: Option<i32>,
    pub runtime: Option<i32>,
    pub watched_at: OffsetDateTime,
}

/// Narrows a viewer's history; `None` fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewFilter {
    pub media_type: Option<MediaType>,
    pub genre: Option<i32>,
}
