use std::fmt;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, watchlists::repo_types::Watchlist};

#[async_trait]
pub trait WatchlistRepo: Send + Sync {
    async fn create(&self, author_id: Uuid, name: &str) -> AppResult<Watchlist>;
    async fn find(&self, id: Uuid) -> AppResult<Option<Watchlist>>;
    async fn list_by_author(&self, author_id: Uuid) -> AppResult<Vec<Watchlist>>;
    async fn rename(&self, id: Uuid, name: &str) -> AppResult<bool>;
    /// Removes the watchlist together with its media entries.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgWatchlistRepo {
    pool: PgPool,
}

impl PgWatchlistRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl fmt::Debug for PgWatchlistRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgWatchlistRepo")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

#[async_trait]
impl WatchlistRepo for PgWatchlistRepo {
    async fn create(&self, author_id: Uuid, name: &str) -> AppResult<Watchlist> {
        let watchlist = sqlx::query_as::<_, Watchlist>(
            r#"
            INSERT INTO watchlists (author_id, name)
            VALUES ($1, $2)
            RETURNING id, author_id, name, created_at
            "#,
        )
        .bind(author_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(watchlist)
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Watchlist>> {
        let watchlist = sqlx::query_as::<_, Watchlist>(
            "SELECT id, author_id, name, created_at FROM watchlists WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(watchlist)
    }

    async fn list_by_author(&self, author_id: Uuid) -> AppResult<Vec<Watchlist>> {
        let rows = sqlx::query_as::<_, Watchlist>(
            r#"
            SELECT id, author_id, name, created_at
            FROM watchlists
            WHERE author_id = $1
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn rename(&self, id: Uuid, name: &str) -> AppResult<bool> {
        let res = sqlx::query("UPDATE watchlists SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        // media rows go with it through ON DELETE CASCADE
        let res = sqlx::query("DELETE FROM watchlists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
