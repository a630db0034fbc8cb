use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{NewsQueryParams, NewsSearchResult};
use crate::services::news_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/news-articles", get(get_news_articles))
}

/// GET /api/news-articles?query=
pub async fn get_news_articles(
    Query(params): Query<NewsQueryParams>,
    State(state): State<AppState>,
) -> Result<Json<NewsSearchResult>, AppError> {
    let query = params.query.unwrap_or_default();
    info!("GET /api/news-articles - query: {}", query);
    let result = news_service::fetch_news_articles(state.news_provider.as_ref(), &query).await?;
    Ok(Json(result))
}
