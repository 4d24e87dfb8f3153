use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "media_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[serde(alias = "film")]
    Movie,
    #[serde(alias = "series")]
    Tv,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" | "film" => Ok(MediaType::Movie),
            "tv" | "series" => Ok(MediaType::Tv),
            other => Err(format!("unknown media type '{other}', expected movie or tv")),
        }
    }
}

/// A title saved on a watchlist.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Media {
    pub id: Uuid,
    pub watchlist_id: Uuid,
    pub tmdb_id: i32,
    pub title: String,
    pub media_type: MediaType,
    pub genre_ids: Vec<i32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<i32>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Lightweight reference used in watchlist listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MediaRef {
    pub id: Uuid,
    #[serde(skip)]
    pub watchlist_id: Uuid,
    pub tmdb_id: i32,
}

#[derive(Debug, Clone)]
pub struct NewMedia {
    pub watchlist_id: Uuid,
    pub tmdb_id: i32,
    pub title: String,
    pub media_type: MediaType,
    pub genre_ids: Vec<i32>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct MediaChanges {
    pub watchlist_id: Option<Uuid>,
    pub title: Option<String>,
    pub runtime: Option<i32>,
}

impl MediaChanges {
    pub fn is_empty(&self) -> bool {
        self.watchlist_id.is_none() && self.title.is_none() && self.runtime.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_accepts_aliases() {
        assert_eq!("film".parse::<MediaType>().unwrap(), MediaType::Movie);
        assert_eq!("TV".parse::<MediaType>().unwrap(), MediaType::Tv);
        assert_eq!("series".parse::<MediaType>().unwrap(), MediaType::Tv);
        assert!("podcast".parse::<MediaType>().is_err());

        let parsed: MediaType = serde_json::from_str("\"series\"").unwrap();
        assert_eq!(parsed, MediaType::Tv);
        assert_eq!(serde_json::to_string(&MediaType::Movie).unwrap(), "\"movie\"");
    }
}
