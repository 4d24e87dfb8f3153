use std::fmt;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    media::repo_types::{Media, MediaChanges, MediaRef, NewMedia},
};

const MEDIA_COLUMNS: &str = "id, watchlist_id, tmdb_id, title, media_type, genre_ids, \
     poster_path, backdrop_path, release_date, runtime, created_at";

#[async_trait]
pub trait MediaRepo: Send + Sync {
    async fn create(&self, new: NewMedia) -> AppResult<Media>;
    async fn find(&self, id: Uuid) -> AppResult<Option<Media>>;
    /// Entries of one watchlist, oldest first, optionally restricted to a genre.
    async fn list_by_watchlist(&self, watchlist_id: Uuid, genre: Option<i32>)
        -> AppResult<Vec<Media>>;
    async fn count_by_watchlist(&self, watchlist_id: Uuid) -> AppResult<i64>;
    async fn list_refs(&self, watchlist_ids: &[Uuid]) -> AppResult<Vec<MediaRef>>;
    async fn update(&self, id: Uuid, changes: MediaChanges) -> AppResult<bool>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgMediaRepo {
    pool: PgPool,
}

impl PgMediaRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl fmt::Debug for PgMediaRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgMediaRepo")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

#[async_trait]
impl MediaRepo for PgMediaRepo {
    async fn create(&self, new: NewMedia) -> AppResult<Media> {
        let media = sqlx::query_as::<_, Media>(&format!(
            r#"
            INSERT INTO media
                (watchlist_id, tmdb_id, title, media_type, genre_ids,
                 poster_path, backdrop_path, release_date, runtime)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {MEDIA_COLUMNS}
            "#
        ))
        .bind(new.watchlist_id)
        .bind(new.tmdb_id)
        .bind(&new.title)
        .bind(new.media_type)
        .bind(&new.genre_ids)
        .bind(&new.poster_path)
        .bind(&new.backdrop_path)
        .bind(&new.release_date)
        .bind(new.runtime)
        .fetch_one(&self.pool)
        .await?;
        Ok(media)
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<Media>> {
        let media = sqlx::query_as::<_, Media>(&format!(
            "SELECT {MEDIA_COLUMNS} FROM media WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(media)
    }

    async fn list_by_watchlist(
        &self,
        watchlist_id: Uuid,
        genre: Option<i32>,
    ) -> AppResult<Vec<Media>> {
        let rows = sqlx::query_as::<_, Media>(&format!(
            r#"
            SELECT {MEDIA_COLUMNS}
            FROM media
            WHERE watchlist_id = $1
              AND ($2::int4 IS NULL OR $2 = ANY(genre_ids))
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .bind(watchlist_id)
        .bind(genre)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_by_watchlist(&self, watchlist_id: Uuid) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM media WHERE watchlist_id = $1")
            .bind(watchlist_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn list_refs(&self, watchlist_ids: &[Uuid]) -> AppResult<Vec<MediaRef>> {
        if watchlist_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, MediaRef>(
            r#"
            SELECT id, watchlist_id, tmdb_id
            FROM media
            WHERE watchlist_id = ANY($1)
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(watchlist_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, id: Uuid, changes: MediaChanges) -> AppResult<bool> {
        let res = sqlx::query(
            r#"
            UPDATE media
            SET watchlist_id = COALESCE($2, watchlist_id),
                title = COALESCE($3, title),
                runtime = COALESCE($4, runtime)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.watchlist_id)
        .bind(changes.title)
        .bind(changes.runtime)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
