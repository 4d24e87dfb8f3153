use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::media::repo_types::MediaType;

#[derive(Debug, Deserialize)]
pub struct CreateViewRequest {
    /// Must be the caller when present.
    pub viewer_id: Option<Uuid>,
    pub tmdb_id: i32,
    pub title: String,
    pub media_type: MediaType,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "year_from_number_or_string")]
    pub release_year: Option<i32>,
    pub runtime: Option<i32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub watched_at: Option<OffsetDateTime>,
}

// Clients send the year either as 1999 or "1999".
fn year_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Number(i32),
        Text(String),
    }

    match Option::<Year>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Year::Number(y)) => Ok(Some(y)),
        Some(Year::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Year::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid release_year '{s}'"))),
    }
}
