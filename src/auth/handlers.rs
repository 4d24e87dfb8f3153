use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;
use tracing::instrument;

use super::{
    dto::{
        ForgottenPasswordRequest, LoginRequest, RegisterRequest, RegisteredResponse,
        ResetPasswordRequest, UserResponse,
    },
    extractors::AuthUser,
    services,
};
use crate::{
    config::AppConfig,
    error::{AppError, AppResult},
    extract::AppJson,
    response::MessageResponse,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout).post(logout))
        .route("/auth/forgotten-password", post(forgotten_password))
        .route("/auth/reset-password", post(reset_password))
        .route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisteredResponse>)> {
    let user = services::register(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            message: "User created successfully",
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<(CookieJar, Json<UserResponse>)> {
    let (user, token) = services::login(&state, payload).await?;
    let jar = jar.add(auth_cookie(&state.config, token));
    Ok((jar, Json(user.into())))
}

#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    (
        clear_auth_cookie(&state.config, jar),
        MessageResponse::new("Logged out successfully"),
    )
}

#[instrument(skip(state, payload))]
pub async fn forgotten_password(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ForgottenPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    services::request_password_reset(&state, &payload.email).await?;
    Ok(MessageResponse::new("Password reset email sent"))
}

#[instrument(skip(state, payload))]
pub async fn reset_password(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    services::reset_password(&state, payload).await?;
    Ok(MessageResponse::new("Password reset successfully"))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;
    Ok(Json(user.into()))
}

pub(crate) fn auth_cookie(config: &AppConfig, token: String) -> Cookie<'static> {
    Cookie::build((config.cookie.name.clone(), token))
        .http_only(true)
        .secure(config.cookie.secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::minutes(config.jwt.ttl_minutes))
        .build()
}

pub(crate) fn clear_auth_cookie(config: &AppConfig, jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build((config.cookie.name.clone(), "")).path("/"))
}
