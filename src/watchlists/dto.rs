use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::media::repo_types::{Media, MediaRef};

#[derive(Debug, Deserialize)]
pub struct CreateWatchlistRequest {
    #[serde(alias = "title")]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameWatchlistRequest {
    #[serde(alias = "title")]
    pub name: String,
}

/// A watchlist as shown in a user's listing.
#[derive(Debug, Serialize)]
pub struct WatchlistSummary {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub medias: Vec<MediaRef>,
    pub media_count: usize,
}

#[derive(Debug, Serialize)]
pub struct WatchlistDetail {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub medias: Vec<Media>,
    /// Size of the whole watchlist, regardless of the genre filter.
    pub media_count: i64,
}
