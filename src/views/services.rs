use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::CreateViewRequest,
    repo_types::{NewView, View, ViewFilter},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    users::services::ensure_user_exists,
    validation::{parse_release_date, required_text, validate_runtime},
};

const TITLE_MAX_LEN: usize = 255;

pub async fn list(state: &AppState, user_id: Uuid, filter: ViewFilter) -> AppResult<Vec<View>> {
    ensure_user_exists(state, user_id).await?;
    state.views.list(user_id, filter).await
}

pub async fn add(state: &AppState, user_id: Uuid, req: CreateViewRequest) -> AppResult<View> {
    if let Some(viewer_id) = req.viewer_id {
        if viewer_id != user_id {
            warn!(user_id = %user_id, viewer_id = %viewer_id, "view logged for another user");
            return Err(AppError::forbidden("Not authorized to add view for this user"));
        }
    }

    let title = required_text("title", &req.title, TITLE_MAX_LEN)?;
    if req.tmdb_id <= 0 {
        return Err(AppError::validation("tmdb_id must be positive"));
    }
    let runtime = validate_runtime(req.runtime)?;

    let (release_date, parsed_year) = match req.release_date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            let date = parse_release_date(raw)?;
            (Some(raw.to_string()), Some(date.year()))
        }
        _ => (None, None),
    };
    let release_year = req.release_year.or(parsed_year);

    let view = state
        .views
        .create(NewView {
            viewer_id: user_id,
            tmdb_id: req.tmdb_id,
            title,
            media_type: req.media_type,
            genre_ids: req.genre_ids,
            poster_path: req.poster_path,
            backdrop_path: req.backdrop_path,
            release_date,
            release_year,
            runtime,
            watched_at: req.watched_at.unwrap_or_else(OffsetDateTime::now_utc),
        })
        .await?;

    info!(view_id = %view.id, user_id = %user_id, media_type = %view.media_type, "view logged");
    Ok(view)
}

pub async fn delete(state: &AppState, user_id: Uuid, id: Uuid) -> AppResult<()> {
    let view = state
        .views
        .find(id)
        .await?
        .ok_or_else(|| AppError::not_found("View"))?;
    if view.viewer_id != user_id {
        warn!(view_id = %id, user_id = %user_id, "view owned by another user");
        return Err(AppError::forbidden("Not authorized to delete this view"));
    }
    if !state.views.delete(id).await? {
        return Err(AppError::not_found("View"));
    }
    info!(view_id = %id, "view deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{media::repo_types::MediaType, testing::TestContext};
    use sqlx::PgPool;

    fn view_req(media_type: MediaType, genres: &[i32]) -> CreateViewRequest {
        CreateViewRequest {
            viewer_id: None,
            tmdb_id: 1399,
            title: "Game of Thrones".into(),
            media_type,
            genre_ids: genres.to_vec(),
            poster_path: None,
            backdrop_path: None,
            release_date: Some("2011-04-17".into()),
            release_year: None,
            runtime: Some(57),
            watched_at: None,
        }
    }

    #[tokio::test]
    async fn release_year_is_derived_from_date() {
        let ctx = TestContext::new();
        let alice = ctx.user("alice").await;
        let view = add(&ctx.state, alice.id, view_req(MediaType::Tv, &[18]))
            .await
            .unwrap();
        assert_eq!(view.release_year, Some(2011));
        assert_eq!(view.viewer_id, alice.id);

        let mut req = view_req(MediaType::Tv, &[18]);
        req.release_year = Some(2012);
        let view = add(&ctx.state, alice.id, req).await.unwrap();
        assert_eq!(view.release_year, Some(2012));
    }

    #[tokio::test]
    async fn logging_for_someone_else_is_forbidden() {
        let ctx = TestContext::new();
        let alice = ctx.user("alice").await;
        let bob = ctx.user("bobby").await;
        let mut req = view_req(MediaType::Movie, &[]);
        req.viewer_id = Some(bob.id);

        let err = add(&ctx.state, alice.id, req).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let mut req = view_req(MediaType::Movie, &[]);
        req.viewer_id = Some(alice.id);
        assert!(add(&ctx.state, alice.id, req).await.is_ok());
    }

    async fn check_listing_applies_type_and_genre_filters(ctx: &TestContext) {
        let alice = ctx.user("alice").await;
        add(&ctx.state, alice.id, view_req(MediaType::Tv, &[18, 10765])).await.unwrap();
        add(&ctx.state, alice.id, view_req(MediaType::Tv, &[35])).await.unwrap();
        add(&ctx.state, alice.id, view_req(MediaType::Movie, &[18])).await.unwrap();

        let all = list(&ctx.state, alice.id, ViewFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let tv = ViewFilter {
            media_type: Some(MediaType::Tv),
            genre: None,
        };
        assert_eq!(list(&ctx.state, alice.id, tv).await.unwrap().len(), 2);

        let tv_drama = ViewFilter {
            media_type: Some(MediaType::Tv),
            genre: Some(18),
        };
        assert_eq!(list(&ctx.state, alice.id, tv_drama).await.unwrap().len(), 1);

        let err = list(&ctx.state, Uuid::new_v4(), ViewFilter::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn only_the_viewer_can_delete() {
        let ctx = TestContext::new();
        let alice = ctx.user("alice").await;
        let bob = ctx.user("bobby").await;
        let view = add(&ctx.state, alice.id, view_req(MediaType::Movie, &[])).await.unwrap();

        let err = delete(&ctx.state, bob.id, view.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        delete(&ctx.state, alice.id, view.id).await.unwrap();
        let err = delete(&ctx.state, alice.id, view.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn listing_applies_type_and_genre_filters() {
        check_listing_applies_type_and_genre_filters(&TestContext::new()).await;
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn pg_listing_applies_type_and_genre_filters(pool: PgPool) {
        check_listing_applies_type_and_genre_filters(&TestContext::with_pool(pool)).await;
    }
}
