use std::sync::Arc;

use sqlx::PgPool;

use crate::{
    auth::repo::{PgUserRepo, UserRepo},
    config::AppConfig,
    db,
    mail::{self, Mailer},
    media::repo::{MediaRepo, PgMediaRepo},
    stats::repo::{PgStatsRepo, StatsRepo},
    views::repo::{PgViewRepo, ViewRepo},
    watchlists::repo::{PgWatchlistRepo, WatchlistRepo},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub watchlists: Arc<dyn WatchlistRepo>,
    pub media: Arc<dyn MediaRepo>,
    pub views: Arc<dyn ViewRepo>,
    pub stats: Arc<dyn StatsRepo>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Connects to Postgres and applies migrations; either failing is fatal for startup.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(&config).await?;
        db::migrate(&pool).await?;
        let mailer = mail::from_config(&config.mail)?;
        Ok(Self::from_pool(Arc::new(config), pool, mailer))
    }

    pub fn from_pool(config: Arc<AppConfig>, pool: PgPool, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            config,
            users: Arc::new(PgUserRepo::new(pool.clone())),
            watchlists: Arc::new(PgWatchlistRepo::new(pool.clone())),
            media: Arc::new(PgMediaRepo::new(pool.clone())),
            views: Arc::new(PgViewRepo::new(pool.clone())),
            stats: Arc::new(PgStatsRepo::new(pool)),
            mailer,
        }
    }
}
