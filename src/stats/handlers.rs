use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;
use uuid::Uuid;

use super::{
    repo_types::{CountByType, CountByYear, RuntimeSummary},
    services,
};
use crate::{
    error::AppResult,
    extract::{AppPath, AppQuery},
    media::dto::{GenreQuery, MediaTypeFilter},
    state::AppState,
    views::repo_types::ViewFilter,
};

pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/statistics/count/:media_type/:user_id", get(count_by_type))
        .route("/statistics/year/:media_type/:user_id", get(count_by_year))
        .route("/statistics/runtime/:media_type/:user_id", get(runtime))
}

fn filter(media_type: MediaTypeFilter, q: GenreQuery) -> ViewFilter {
    ViewFilter {
        media_type: media_type.0,
        genre: q.genre,
    }
}

#[instrument(skip(state))]
pub async fn count_by_type(
    State(state): State<AppState>,
    AppPath((media_type, user_id)): AppPath<(MediaTypeFilter, Uuid)>,
    AppQuery(q): AppQuery<GenreQuery>,
) -> AppResult<Json<Vec<CountByType>>> {
    let rows = services::count_by_type(&state, user_id, filter(media_type, q)).await?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn count_by_year(
    State(state): State<AppState>,
    AppPath((media_type, user_id)): AppPath<(MediaTypeFilter, Uuid)>,
    AppQuery(q): AppQuery<GenreQuery>,
) -> AppResult<Json<Vec<CountByYear>>> {
    let rows = services::count_by_year(&state, user_id, filter(media_type, q)).await?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn runtime(
    State(state): State<AppState>,
    AppPath((media_type, user_id)): AppPath<(MediaTypeFilter, Uuid)>,
    AppQuery(q): AppQuery<GenreQuery>,
) -> AppResult<Json<RuntimeSummary>> {
    Ok(Json(
        services::runtime(&state, user_id, filter(media_type, q)).await?,
    ))
}
