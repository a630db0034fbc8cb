use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{EventAnalysis, EventQueryParams, EventRecord};
use crate::services::{analysis_service, event_service};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/historical-event", get(get_historical_event))
        .route("/event-analysis", get(get_event_analysis))
}

/// GET /api/historical-event?query=
pub async fn get_historical_event(
    Query(params): Query<EventQueryParams>,
    State(state): State<AppState>,
) -> Result<Json<EventRecord>, AppError> {
    let query = params.query.unwrap_or_default();
    info!("GET /api/historical-event - query: {}", query);
    let event = event_service::fetch_historical_event(state.llm_provider.as_ref(), &query).await?;
    Ok(Json(event))
}

/// GET /api/event-analysis?query=
///
/// Event details plus related news and the index chart in one response.
pub async fn get_event_analysis(
    Query(params): Query<EventQueryParams>,
    State(state): State<AppState>,
) -> Result<Json<EventAnalysis>, AppError> {
    let query = params.query.unwrap_or_default();
    info!("GET /api/event-analysis - query: {}", query);
    let analysis = analysis_service::analyze_event(
        state.llm_provider.as_ref(),
        state.news_provider.as_ref(),
        state.price_provider.as_ref(),
        &state.quote_symbol,
        &query,
    )
    .await?;
    Ok(Json(analysis))
}
