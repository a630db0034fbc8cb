use async_trait::async_trait;
use thiserror::Error;

use crate::errors::AppError;
use crate::models::RawDailySeries;

#[derive(Debug, Error)]
pub enum PriceProviderError {
    #[error("api key not configured")]
    MissingApiKey,

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("rate limited: {0}")]
    RateLimited(String),
}

impl From<PriceProviderError> for AppError {
    fn from(value: PriceProviderError) -> Self {
        match value {
            PriceProviderError::MissingApiKey => {
                AppError::MisconfiguredCredentials("Alpha Vantage API key")
            }
            PriceProviderError::Network(msg) => AppError::UpstreamUnavailable(msg),
            PriceProviderError::Parse(msg) => AppError::UpstreamParse(msg),
            PriceProviderError::InvalidSymbol(msg) => AppError::InvalidSymbol(msg),
            PriceProviderError::RateLimited(msg) => AppError::RateLimited(msg),
        }
    }
}

/// Source of raw daily close series.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Full daily history for `symbol`, keyed by `YYYY-MM-DD`.
    async fn fetch_daily_series(&self, symbol: &str) -> Result<RawDailySeries, PriceProviderError>;
}
