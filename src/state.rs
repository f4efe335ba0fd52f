use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::TokenService;
use crate::config::AppConfig;

/// Shared handles every handler can reach through `State<AppState>`
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(config: AppConfig, pool: SqlitePool) -> Self {
        let tokens = TokenService::from_config(&config.security);
        Self {
            pool,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
        }
    }
}
