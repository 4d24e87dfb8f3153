use std::collections::HashMap;

use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{WatchlistDetail, WatchlistSummary},
    repo_types::Watchlist,
};
use crate::{
    error::{AppError, AppResult},
    media::repo_types::MediaRef,
    state::AppState,
    users::services::ensure_user_exists,
    validation::required_text,
};

const NAME_MAX_LEN: usize = 255;

/// Loads a watchlist the caller is allowed to modify: 404 if it is missing, 403 if it belongs to someone else.
pub async fn load_owned(state: &AppState, id: Uuid, user_id: Uuid) -> AppResult<Watchlist> {
    let watchlist = state
        .watchlists
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found("Watchlist"))?;
    if !watchlist.is_owned_by(user_id) {
        warn!(watchlist_id = %id, user_id = %user_id, "watchlist owned by another user");
        return Err(AppError::forbidden("Not authorized to modify this watchlist"));
    }
    Ok(watchlist)
}

pub async fn list_for_user(state: &AppState, user_id: Uuid) -> AppResult<Vec<WatchlistSummary>> {
    ensure_user_exists(state, user_id).await?;

    let watchlists = state.watchlists.list_by_author(user_id).await?;
    let ids: Vec<Uuid> = watchlists.iter().map(|w| w.id).collect();

    let mut refs: HashMap<Uuid, Vec<MediaRef>> = HashMap::new();
    for r in state.media.list_refs(&ids).await? {
        refs.entry(r.watchlist_id).or_default().push(r);
    }

    Ok(watchlists
        .into_iter()
        .map(|w| {
            let medias = refs.remove(&w.id).unwrap_or_default();
            WatchlistSummary {
                id: w.id,
                author_id: w.author_id,
                name: w.name,
                created_at: w.created_at,
                media_count: medias.len(),
                medias,
            }
        })
        .collect())
}

pub async fn detail(state: &AppState, id: Uuid, genre: Option<i32>) -> AppResult<WatchlistDetail> {
    let watchlist = state
        .watchlists
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found("Watchlist"))?;

    let medias = state.media.list_by_watchlist(id, genre).await?;
    let media_count = state.media.count_by_watchlist(id).await?;

    Ok(WatchlistDetail {
        id: watchlist.id,
        author_id: watchlist.author_id,
        name: watchlist.name,
        medias,
        media_count,
    })
}

pub async fn create(state: &AppState, user_id: Uuid, name: &str) -> AppResult<Watchlist> {
    let name = required_text("name", name, NAME_MAX_LEN)?;
    let watchlist = state.watchlists.create(user_id, &name).await?;
    info!(watchlist_id = %watchlist.id, user_id = %user_id, "watchlist created");
    Ok(watchlist)
}

pub async fn rename(state: &AppState, user_id: Uuid, id: Uuid, name: &str) -> AppResult<()> {
    let name = required_text("name", name, NAME_MAX_LEN)?;
    load_owned(state, id, user_id).await?;
    if !state.watchlists.rename(id, &name).await? {
        return Err(AppError::not_found("Watchlist"));
    }
    info!(watchlist_id = %id, "watchlist renamed");
    Ok(())
}

pub async fn delete(state: &AppState, user_id: Uuid, id: Uuid) -> AppResult<()> {
    load_owned(state, id, user_id).await?;
    if !state.watchlists.delete(id).await? {
        return Err(AppError::not_found("Watchlist"));
    }
    info!(watchlist_id = %id, "watchlist deleted");
    Ok(())
}
