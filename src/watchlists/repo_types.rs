use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Watchlist {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Watchlist {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}
