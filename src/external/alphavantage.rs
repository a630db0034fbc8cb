use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::config::mask_key;
use crate::external::price_provider::{PriceProvider, PriceProviderError};
use crate::models::RawDailySeries;

pub struct AlphaVantageProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl AlphaVantageProvider {
    pub fn new(client: reqwest::Client, api_key: Option<String>, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AvDailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<RawDailySeries>,

    // When rate-limited Alpha Vantage returns:
    // { "Note": "Thank you for using Alpha Vantage! ... 5 calls per minute ..." }
    #[serde(rename = "Note")]
    note: Option<String>,

    // Newer throttle/premium notices use this key instead of "Note".
    #[serde(rename = "Information")]
    information: Option<String>,

    // When invalid:
    // { "Error Message": "Invalid API call. ..." }
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

/// Checks the provider's error keys before accepting the payload as a series.
pub fn into_series(body: AvDailyResponse) -> Result<RawDailySeries, PriceProviderError> {
    if let Some(msg) = body.error_message {
        error!("Alpha Vantage error: {}", msg);
        return Err(PriceProviderError::InvalidSymbol(msg));
    }

    if let Some(msg) = body.note.or(body.information) {
        warn!("Alpha Vantage rate limit: {}", msg);
        return Err(PriceProviderError::RateLimited(msg));
    }

    body.time_series
        .ok_or_else(|| PriceProviderError::Parse("missing time series".into()))
}

#[async_trait]
impl PriceProvider for AlphaVantageProvider {
    async fn fetch_daily_series(&self, symbol: &str) -> Result<RawDailySeries, PriceProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(PriceProviderError::MissingApiKey)?;

        info!("Requesting {} daily series from Alpha Vantage (key {})", symbol, mask_key(api_key));

        let resp = self
            .client
            .get(format!("{}/query", self.base_url))
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "full"),
                ("apikey", api_key),
            ])
            .send()
            .await
            .map_err(|e| PriceProviderError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PriceProviderError::Network(format!("HTTP {}: {}", status, body)));
        }

        let body = resp
            .json::<AvDailyResponse>()
            .await
            .map_err(|e| PriceProviderError::Parse(e.to_string()))?;

        let series = into_series(body)?;
        if let (Some((first, _)), Some((last, _))) = (series.first_key_value(), series.last_key_value()) {
            info!("Alpha Vantage returned {} points from {} to {}", series.len(), first, last);
        }
        Ok(series)
    }
}
