use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AuthConfig;
use crate::external::price_provider::PriceProvider;
use crate::services::llm_service::LlmProvider;
use crate::services::news_service::NewsProvider;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub llm_provider: Arc<dyn LlmProvider>,
    pub price_provider: Arc<dyn PriceProvider>,
    pub news_provider: Arc<dyn NewsProvider>,
    pub quote_symbol: String,
    pub auth: Arc<AuthConfig>,
}
