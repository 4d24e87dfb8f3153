use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateMediaRequest, UpdateMediaRequest},
    repo_types::Media,
    services,
};
use crate::{
    auth::extractors::AuthUser,
    error::AppResult,
    extract::{AppJson, AppPath},
    response::Created,
    state::AppState,
};

pub fn media_routes() -> Router<AppState> {
    Router::new()
        .route("/medias", post(add_media))
        .route(
            "/medias/:id",
            get(get_media).put(update_media).delete(delete_media),
        )
}

#[instrument(skip(state, payload))]
pub async fn add_media(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateMediaRequest>,
) -> AppResult<Created> {
    let media = services::add(&state, user_id, payload).await?;
    Ok(Created::new(
        "Media added successfully",
        media.id,
        format!("/api/v1/medias/{}", media.id),
    ))
}

#[instrument(skip(state))]
pub async fn get_media(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<Media>> {
    Ok(Json(services::get(&state, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_media(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateMediaRequest>,
) -> AppResult<StatusCode> {
    services::update(&state, user_id, id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_media(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    services::delete(&state, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
