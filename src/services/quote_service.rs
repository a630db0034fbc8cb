use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::QuoteSeriesResponse;
use crate::services::windowing;

/// Fetches the daily series of `symbol` and slices it into the chart windows
/// starting at `start_date`.
///
/// `start_date` follows the event date contract: `YYYY`, `YYYY-MM` or
/// `YYYY-MM-DD`.
pub async fn fetch_quote_series(
    provider: &dyn PriceProvider,
    symbol: &str,
    start_date: &str,
) -> Result<QuoteSeriesResponse, AppError> {
    let raw_start = start_date.trim();
    if raw_start.is_empty() {
        return Err(AppError::InvalidInput(
            "startDate parameter is required (YYYY-MM-DD format)".to_string(),
        ));
    }
    let start = windowing::normalize_event_date(raw_start)
        .map_or_else(|| windowing::parse_start_date(raw_start), Ok)?;

    let series = provider.fetch_daily_series(symbol).await.map_err(|e| {
        match &e {
            PriceProviderError::RateLimited(_) => warn!("Rate limited when fetching {} series", symbol),
            _ => error!("Failed to fetch {} series: {}", symbol, e),
        }
        AppError::from(e)
    })?;

    let data = windowing::build_window_set(&series, start)?;
    let metadata = data.counts();
    info!(
        "Window points for {} from {}: 1w={} 1m={} 3m={} 6m={}",
        symbol,
        start,
        metadata.one_week_count,
        metadata.one_month_count,
        metadata.three_months_count,
        metadata.six_months_count
    );

    Ok(QuoteSeriesResponse {
        symbol: symbol.to_string(),
        start_date: start,
        performance: windowing::summarize(&data),
        data,
        metadata,
    })
}
