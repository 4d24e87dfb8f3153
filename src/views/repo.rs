use std::fmt;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    views::repo_types::{NewView, View, ViewFilter},
};

const VIEW_COLUMNS: &str = "id, viewer_id, tmdb_id, title, media_type, genre_ids, poster_path, \
     backdrop_path, release_date, release_year, runtime, watched_at";

#[async_trait]
pub trait ViewRepo: Send + Sync {
    async fn create(&self, new: NewView) -> AppResult<View>;
    async fn find(&self, id: Uuid) -> AppResult<Option<View>>;
    /// Most recent first.
    async fn list(&self, viewer_id: Uuid, filter: ViewFilter) -> AppResult<Vec<View>>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct PgViewRepo {
    pool: PgPool,
}

impl PgViewRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl fmt::Debug for PgViewRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgViewRepo")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

#[async_trait]
impl ViewRepo for PgViewRepo {
    async fn create(&self, new: NewView) -> AppResult<View> {
        let view = sqlx::query_as::<_, View>(&format!(
            r#"
            INSERT INTO views
                (viewer_id, tmdb_id, title, media_type, genre_ids, poster_path,
                 backdrop_path, release_date, release_year, runtime, watched_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {VIEW_COLUMNS}
            "#
        ))
        .bind(new.viewer_id)
        .bind(new.tmdb_id)
        .bind(&new.title)
        .bind(new.media_type)
        .bind(&new.genre_ids)
        .bind(&new.poster_path)
        .bind(&new.backdrop_path)
        .bind(&new.release_date)
        .bind(new.release_year)
        .bind(new.runtime)
        .bind(new.watched_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(view)
    }

    async fn find(&self, id: Uuid) -> AppResult<Option<View>> {
        let view = sqlx::query_as::<_, View>(&format!(
            "SELECT {VIEW_COLUMNS} FROM views WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(view)
    }

    async fn list(&self, viewer_id: Uuid, filter: ViewFilter) -> AppResult<Vec<View>> {
        let rows = sqlx::query_as::<_, View>(&format!(
            r#"
            SELECT {VIEW_COLUMNS}
            FROM views
            WHERE viewer_id = $1
              AND ($2::media_type IS NULL OR media_type = $2)
              AND ($3::int4 IS NULL OR $3 = ANY(genre_ids))
            ORDER BY watched_at DESC, id ASC
            "#
        ))
        .bind(viewer_id)
        .bind(filter.media_type)
        .bind(filter.genre)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let res = sqlx::query("DELETE FROM views WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
