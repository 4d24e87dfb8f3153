use uuid::Uuid;

use super::repo_types::{CountByType, CountByYear, RuntimeSummary};
use crate::{
    error::AppResult, state::AppState, users::services::ensure_user_exists,
    views::repo_types::ViewFilter,
};

pub async fn count_by_type(
    state: &AppState,
    user_id: Uuid,
    filter: ViewFilter,
) -> AppResult<Vec<CountByType>> {
    ensure_user_exists(state, user_id).await?;
    state.stats.count_by_type(user_id, filter).await
}

pub async fn count_by_year(
    state: &AppState,
    user_id: Uuid,
    filter: ViewFilter,
) -> AppResult<Vec<CountByYear>> {
    ensure_user_exists(state, user_id).await?;
    state.stats.count_by_year(user_id, filter).await
}

pub async fn runtime(
    state: &AppState,
    user_id: Uuid,
    filter: ViewFilter,
) -> AppResult<RuntimeSummary> {
    ensure_user_exists(state, user_id).await?;
    state.stats.runtime(user_id, filter).await
}
