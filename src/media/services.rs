use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{CreateMediaRequest, UpdateMediaRequest},
    repo_types::{Media, MediaChanges, NewMedia},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    validation::{parse_release_date, required_text, validate_runtime},
    watchlists::services::load_owned,
};

const TITLE_MAX_LEN: usize = 255;

pub async fn add(state: &AppState, user_id: Uuid, req: CreateMediaRequest) -> AppResult<Media> {
    let title = required_text("title", &req.title, TITLE_MAX_LEN)?;
    if req.tmdb_id <= 0 {
        return Err(AppError::validation("tmdb_id must be positive"));
    }
    let release_date = match req.release_date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            parse_release_date(raw)?;
            Some(raw.to_string())
        }
        _ => None,
    };
    let runtime = validate_runtime(req.runtime)?;

    load_owned(state, req.watchlist_id, user_id).await?;

    let media = state
        .media
        .create(NewMedia {
            watchlist_id: req.watchlist_id,
            tmdb_id: req.tmdb_id,
            title,
            media_type: req.media_type,
            genre_ids: req.genre_ids,
            poster_path: req.poster_path,
            backdrop_path: req.backdrop_path,
            release_date,
            runtime,
        })
        .await?;

    info!(media_id = %media.id, watchlist_id = %media.watchlist_id, tmdb_id = media.tmdb_id, "media added");
    Ok(media)
}

pub async fn get(state: &AppState, id: Uuid) -> AppResult<Media> {
    state
        .media
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found("Media"))
}

/// Loads an entry whose watchlist belongs to the caller.
async fn load_owned_media(state: &AppState, id: Uuid, user_id: Uuid) -> AppResult<Media> {
    let media = get(state, id).await?;
    load_owned(state, media.watchlist_id, user_id)
        .await
        .map_err(|e| match e {
            // a dangling watchlist reference cannot happen under the FK, treat it as foreign
            AppError::NotFound(_) => AppError::forbidden("Not authorized to modify this media"),
            other => other,
        })?;
    Ok(media)
}

pub async fn update(
    state: &AppState,
    user_id: Uuid,
    id: Uuid,
    req: UpdateMediaRequest,
) -> AppResult<()> {
    let title = req
        .title
        .as_deref()
        .map(|t| required_text("title", t, TITLE_MAX_LEN))
        .transpose()?;
    let runtime = validate_runtime(req.runtime)?;

    let media = load_owned_media(state, id, user_id).await?;

    if let Some(target) = req.watchlist_id {
        if target != media.watchlist_id {
            match load_owned(state, target, user_id).await {
                Ok(_) => {}
                Err(AppError::NotFound(_) | AppError::Forbidden(_)) => {
                    warn!(media_id = %id, target = %target, "move to foreign or missing watchlist");
                    return Err(AppError::forbidden(
                        "Not authorized to move media to this watchlist",
                    ));
                }
                Err(e) => return Err(e),
            }
        }
    }

    let changes = MediaChanges {
        watchlist_id: req.watchlist_id,
        title,
        runtime,
    };
    if changes.is_empty() {
        return Ok(());
    }
    if !state.media.update(id, changes).await? {
        return Err(AppError::not_found("Media"));
    }
    info!(media_id = %id, "media updated");
    Ok(())
}

pub async fn delete(state: &AppState, user_id: Uuid, id: Uuid) -> AppResult<()> {
    load_owned_media(state, id, user_id).await?;
    if !state.media.delete(id).await? {
        return Err(AppError::not_found("Media"));
    }
    info!(media_id = %id, "media deleted");
    Ok(())
}
