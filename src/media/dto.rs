use serde::{de, Deserialize, Deserializer};
use uuid::Uuid;

use super::repo_types::MediaType;

#[derive(Debug, Deserialize)]
pub struct CreateMediaRequest {
    pub watchlist_id: Uuid,
    pub tmdb_id: i32,
    pub title: String,
    pub media_type: MediaType,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<i32>,
}

/// Every field is optional; `watchlist_id` moves the entry to another watchlist.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMediaRequest {
    pub watchlist_id: Option<Uuid>,
    pub title: Option<String>,
    pub runtime: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenreQuery {
    pub genre: Option<i32>,
}

/// Media type path segment where `all` lifts the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaTypeFilter(pub Option<MediaType>);

impl<'de> Deserialize<'de> for MediaTypeFilter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(Self(None));
        }
        raw.parse::<MediaType>()
            .map(|t| Self(Some(t)))
            .map_err(de::Error::custom)
    }
}
