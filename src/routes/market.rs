use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::QuoteSeriesResponse;
use crate::services::quote_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sp500-data", get(get_sp500_data))
}

#[derive(Debug, Deserialize)]
pub struct QuoteQueryParams {
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
}

/// GET /api/sp500-data?startDate=YYYY-MM-DD
pub async fn get_sp500_data(
    Query(params): Query<QuoteQueryParams>,
    State(state): State<AppState>,
) -> Result<Json<QuoteSeriesResponse>, AppError> {
    let start_date = params.start_date.unwrap_or_default();
    info!("GET /api/sp500-data - startDate: {}", start_date);
    let series = quote_service::fetch_quote_series(
        state.price_provider.as_ref(),
        &state.quote_symbol,
        &start_date,
    )
    .await?;
    Ok(Json(series))
}
