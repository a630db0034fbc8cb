#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use stock_event_analyzer::config::AuthConfig;
use stock_event_analyzer::errors::{AppError, LlmError};
use stock_event_analyzer::external::price_provider::{PriceProvider, PriceProviderError};
use stock_event_analyzer::models::{NewsArticle, NewsSearchResult, RawDailyBar, RawDailySeries};
use stock_event_analyzer::services::llm_service::LlmProvider;
use stock_event_analyzer::services::news_service::NewsProvider;
use stock_event_analyzer::state::AppState;

/// In-memory credential store. A single connection keeps one shared database.
pub async fn setup_test_db() -> SqlitePool {
    stock_event_analyzer::db::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory sqlite should open")
}

pub fn series(points: &[(&str, &str)]) -> RawDailySeries {
    points
        .iter()
        .map(|(date, close)| (date.to_string(), RawDailyBar { close: close.to_string() }))
        .collect()
}

pub enum LlmReply {
    Text(String),
    MissingKey,
    Down,
}

pub struct FakeLlm(pub LlmReply);

#[async_trait]
impl LlmProvider for FakeLlm {
    async fn generate_completion(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
        match &self.0 {
            LlmReply::Text(text) => Ok(text.clone()),
            LlmReply::MissingKey => Err(LlmError::MissingApiKey),
            LlmReply::Down => Err(LlmError::NetworkError("connection refused".into())),
        }
    }
}

pub enum QuoteReply {
    Series(RawDailySeries),
    RateLimited,
    InvalidSymbol,
}

pub struct FakePrices(pub QuoteReply);

#[async_trait]
impl PriceProvider for FakePrices {
    async fn fetch_daily_series(&self, _symbol: &str) -> Result<RawDailySeries, PriceProviderError> {
        match &self.0 {
            QuoteReply::Series(series) => Ok(series.clone()),
            QuoteReply::RateLimited => Err(PriceProviderError::RateLimited("5 calls per minute".into())),
            QuoteReply::InvalidSymbol => Err(PriceProviderError::InvalidSymbol("Invalid API call".into())),
        }
    }
}

pub enum NewsReply {
    Articles(Vec<NewsArticle>),
    Empty,
}

pub struct FakeNews(pub NewsReply);

#[async_trait]
impl NewsProvider for FakeNews {
    async fn search(&self, query: &str) -> Result<NewsSearchResult, AppError> {
        match &self.0 {
            NewsReply::Articles(articles) => Ok(NewsSearchResult {
                query: query.to_string(),
                total_results: articles.len() as u64,
                articles: articles.clone(),
            }),
            NewsReply::Empty => Err(AppError::NoArticlesFound),
        }
    }
}

pub fn article(title: &str) -> NewsArticle {
    NewsArticle {
        title: title.to_string(),
        description: "No description available".to_string(),
        url: "https://example.com/story".to_string(),
        source: "Reuters".to_string(),
        published_at: "2024-05-01T12:00:00Z".to_string(),
        url_to_image: None,
    }
}

pub const BLACK_MONDAY: &str = r#"{
    "event": "Black Monday",
    "date": "1987-10-19",
    "influencers": ["Alan Greenspan"],
    "description": "The Dow Jones fell 22.6% in one session.",
    "reason": "Matches the query",
    "impact": "Worldwide market crash",
    "source": "Historical records"
}"#;

pub struct TestApp {
    pub llm: LlmReply,
    pub quotes: QuoteReply,
    pub news: NewsReply,
    pub jwt_secret: Option<String>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self {
            llm: LlmReply::Text(BLACK_MONDAY.to_string()),
            quotes: QuoteReply::Series(series(&[
                ("1987-10-19", "224.84"),
                ("1987-10-20", "236.83"),
                ("1987-11-19", "245.01"),
            ])),
            news: NewsReply::Articles(vec![article("Remembering Black Monday")]),
            jwt_secret: Some("test-secret".to_string()),
        }
    }
}

impl TestApp {
    pub async fn state(self) -> AppState {
        AppState {
            pool: setup_test_db().await,
            llm_provider: Arc::new(FakeLlm(self.llm)),
            price_provider: Arc::new(FakePrices(self.quotes)),
            news_provider: Arc::new(FakeNews(self.news)),
            quote_symbol: "SPY".to_string(),
            auth: Arc::new(AuthConfig {
                jwt_secret: self.jwt_secret,
                token_ttl_hours: 1,
            }),
        }
    }

    pub async fn router(self) -> axum::Router {
        stock_event_analyzer::app::create_app(self.state().await, &["http://localhost:3000".to_string()])
    }
}
