use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::CreateViewRequest,
    repo_types::{View, ViewFilter},
    services,
};
use crate::{
    auth::extractors::AuthUser,
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    media::dto::{GenreQuery, MediaTypeFilter},
    response::Created,
    state::AppState,
};

pub fn view_routes() -> Router<AppState> {
    // `:id` is the viewer on GET and the view record on DELETE.
    Router::new()
        .route("/views", post(add_view))
        .route("/views/:id", get(list_views).delete(delete_view))
        .route("/views/:media_type/:user_id", get(list_views_by_type))
}

#[instrument(skip(state))]
pub async fn list_views(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<Uuid>,
) -> AppResult<Json<Vec<View>>> {
    Ok(Json(
        services::list(&state, user_id, ViewFilter::default()).await?,
    ))
}

#[instrument(skip(state))]
pub async fn list_views_by_type(
    State(state): State<AppState>,
    AppPath((MediaTypeFilter(media_type), user_id)): AppPath<(MediaTypeFilter, Uuid)>,
    AppQuery(q): AppQuery<GenreQuery>,
) -> AppResult<Json<Vec<View>>> {
    let filter = ViewFilter {
        media_type,
        genre: q.genre,
    };
    Ok(Json(services::list(&state, user_id, filter).await?))
}

#[instrument(skip(state, payload))]
pub async fn add_view(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateViewRequest>,
) -> AppResult<Created> {
    let view = services::add(&state, user_id, payload).await?;
    Ok(Created::new(
        "View added successfully",
        view.id,
        format!("/api/v1/views/{}", view.viewer_id),
    ))
}

#[instrument(skip(state))]
pub async fn delete_view(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    services::delete(&state, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
