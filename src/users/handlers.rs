use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use axum_extra::extract::CookieJar;
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{
        BannerResponse, PublicUser, UpdateBannerRequest, UpdateEmailRequest,
        UpdatePasswordRequest, UpdateUserRequest,
    },
    services,
};
use crate::{
    auth::{extractors::AuthUser, handlers::clear_auth_cookie},
    error::AppResult,
    extract::{AppJson, AppPath},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/banner/:id", get(get_banner).put(update_banner))
        .route("/users/email/:id", put(update_email))
        .route("/users/password/:id", put(update_password))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<PublicUser>> {
    let user = services::ensure_user_exists(&state, id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn get_banner(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<Json<BannerResponse>> {
    let user = services::ensure_user_exists(&state, id).await?;
    Ok(Json(BannerResponse {
        profile_banner: user.profile_banner,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> AppResult<StatusCode> {
    services::update_profile(&state, caller, id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn update_email(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateEmailRequest>,
) -> AppResult<StatusCode> {
    services::update_email(&state, caller, id, &payload.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdatePasswordRequest>,
) -> AppResult<StatusCode> {
    services::update_password(
        &state,
        caller,
        id,
        &payload.password,
        &payload.confirm_password,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, payload))]
pub async fn update_banner(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateBannerRequest>,
) -> AppResult<StatusCode> {
    services::update_banner(&state, caller, id, &payload.profile_banner).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, jar))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    AppPath(id): AppPath<Uuid>,
    jar: CookieJar,
) -> AppResult<(CookieJar, StatusCode)> {
    services::delete(&state, caller, id).await?;
    Ok((clear_auth_cookie(&state.config, jar), StatusCode::NO_CONTENT))
}
