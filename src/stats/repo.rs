use std::fmt;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    stats::repo_types::{CountByType, CountByYear, RuntimeSummary},
    views::repo_types::ViewFilter,
};

/// Aggregates over a viewer's history.
#[async_trait]
pub trait StatsRepo: Send + Sync {
    async fn count_by_type(&self, viewer_id: Uuid, filter: ViewFilter)
        -> AppResult<Vec<CountByType>>;
    async fn count_by_year(&self, viewer_id: Uuid, filter: ViewFilter)
        -> AppResult<Vec<CountByYear>>;
    async fn runtime(&self, viewer_id: Uuid, filter: ViewFilter) -> AppResult<RuntimeSummary>;
}

#[derive(Clone)]
pub struct PgStatsRepo {
    pool: PgPool,
}

impl PgStatsRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl fmt::Debug for PgStatsRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgStatsRepo")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

const FILTER: &str = "viewer_id = $1 \
     AND ($2::media_type IS NULL OR media_type = $2) \
     AND ($3::int4 IS NULL OR $3 = ANY(genre_ids))";

#[async_trait]
impl StatsRepo for PgStatsRepo {
    async fn count_by_type(
        &self,
        viewer_id: Uuid,
        filter: ViewFilter,
    ) -> AppResult<Vec<CountByType>> {
        let rows = sqlx::query_as::<_, CountByType>(&format!(
            r#"
            SELECT media_type, COUNT(*) AS count
            FROM views
            WHERE {FILTER}
            GROUP BY media_type
            ORDER BY media_type
            "#
        ))
        .bind(viewer_id)
        .bind(filter.media_type)
        .bind(filter.genre)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_by_year(
        &self,
        viewer_id: Uuid,
        filter: ViewFilter,
    ) -> AppResult<Vec<CountByYear>> {
        let rows = sqlx::query_as::<_, CountByYear>(&format!(
            r#"
            SELECT release_year, COUNT(*) AS count
            FROM views
            WHERE {FILTER}
            GROUP BY release_year
            ORDER BY release_year ASC NULLS LAST
            "#
        ))
        .bind(viewer_id)
        .bind(filter.media_type)
        .bind(filter.genre)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn runtime(&self, viewer_id: Uuid, filter: ViewFilter) -> AppResult<RuntimeSummary> {
        let summary = sqlx::query_as::<_, RuntimeSummary>(&format!(
            r#"
            SELECT COUNT(*) AS views,
                   COUNT(runtime) AS timed_views,
                   COALESCE(SUM(runtime), 0)::int8 AS total_minutes,
                   AVG(runtime)::float8 AS average_minutes
            FROM views
            WHERE {FILTER}
            "#
        ))
        .bind(viewer_id)
        .bind(filter.media_type)
        .bind(filter.genre)
        .fetch_one(&self.pool)
        .await?;
        Ok(summary)
    }
}
