use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{CreateWatchlistRequest, RenameWatchlistRequest, WatchlistDetail, WatchlistSummary},
    services,
};
use crate::{
    auth::extractors::AuthUser,
    error::AppResult,
    extract::{AppJson, AppPath, AppQuery},
    media::dto::GenreQuery,
    response::Created,
    state::AppState,
};

pub fn watchlist_routes() -> Router<AppState> {
    // `:id` is the author on GET and the watchlist on PUT/DELETE; axum needs one name per segment.
    Router::new()
        .route("/watchlists", post(create_watchlist))
        .route(
            "/watchlists/:id",
            get(list_watchlists)
                .put(rename_watchlist)
                .delete(delete_watchlist),
        )
        .route("/watchlists/detail/:id", get(get_watchlist_detail))
}

#[instrument(skip(state))]
pub async fn list_watchlists(
    State(state): State<AppState>,
    AppPath(user_id): AppPath<Uuid>,
) -> AppResult<Json<Vec<WatchlistSummary>>> {
    Ok(Json(services::list_for_user(&state, user_id).await?))
}

#[instrument(skip(state))]
pub async fn get_watchlist_detail(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppQuery(q): AppQuery<GenreQuery>,
) -> AppResult<Json<WatchlistDetail>> {
    Ok(Json(services::detail(&state, id, q.genre).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_watchlist(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<CreateWatchlistRequest>,
) -> AppResult<Created> {
    let watchlist = services::create(&state, user_id, &payload.name).await?;
    Ok(Created::new(
        "Watchlist created successfully",
        watchlist.id,
        format!("/api/v1/watchlists/detail/{}", watchlist.id),
    ))
}

#[instrument(skip(state, payload))]
pub async fn rename_watchlist(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<RenameWatchlistRequest>,
) -> AppResult<StatusCode> {
    services::rename(&state, user_id, id, &payload.name).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_watchlist(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> AppResult<StatusCode> {
    services::delete(&state, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
