use serde::Serialize;
use sqlx::FromRow;

use crate::media::repo_types::MediaType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CountByType {
    pub media_type: MediaType,
    pub count: i64,
}

/// `release_year` is `None` for views whose year is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct CountByYear {
    pub release_year: Option<i32>,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct RuntimeSummary {
    pub views: i64,
    /// Views that carry a runtime.
    pub timed_views: i64,
    pub total_minutes: i64,
    pub average_minutes: Option<f64>,
}
