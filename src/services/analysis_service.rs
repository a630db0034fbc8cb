use tracing::{info, warn};

use crate::errors::AppError;
use crate::external::price_provider::PriceProvider;
use crate::models::EventAnalysis;
use crate::services::event_service;
use crate::services::llm_service::LlmProvider;
use crate::services::news_service::{self, NewsProvider};
use crate::services::quote_service;
use crate::services::windowing::normalize_event_date;

/// Event lookup, then news for the event name and the quote windows for its
/// date. Only the event lookup can fail the whole analysis.
pub async fn analyze_event(
    llm: &dyn LlmProvider,
    news: &dyn NewsProvider,
    prices: &dyn PriceProvider,
    symbol: &str,
    query: &str,
) -> Result<EventAnalysis, AppError> {
    let event = event_service::fetch_historical_event(llm, query).await?;
    info!("Event resolved to '{}' on '{}'", event.event, event.date);

    let news_fut = news_service::fetch_news_articles(news, &event.event);
    let chart_fut = async {
        match normalize_event_date(&event.date) {
            Some(date) => {
                let start = date.format("%Y-%m-%d").to_string();
                quote_service::fetch_quote_series(prices, symbol, &start).await.map(Some)
            }
            None => {
                warn!("Event date '{}' has no usable calendar date, skipping chart", event.date);
                Ok(None)
            }
        }
    };
    let (news_result, chart_result) = tokio::join!(news_fut, chart_fut);

    let (articles, news_error) = match news_result {
        Ok(result) => (result.articles, None),
        Err(AppError::NoArticlesFound) => (Vec::new(), None),
        Err(e) => {
            warn!("News lookup for '{}' failed: {}", event.event, e);
            (Vec::new(), Some(e.public_message()))
        }
    };

    let (chart, chart_error) = match chart_result {
        Ok(Some(chart)) => (Some(chart), None),
        Ok(None) => (
            None,
            Some(format!("Event date '{}' is not a calendar date", event.date)),
        ),
        Err(e) => {
            warn!("Chart lookup for '{}' failed: {}", event.date, e);
            (None, Some(e.public_message()))
        }
    };

    Ok(EventAnalysis {
        event,
        articles,
        news_error,
        chart,
        chart_error,
    })
}
