use serde::{Deserialize, Serialize};

use crate::models::{EventRecord, NewsArticle, QuoteSeriesResponse};

/// Event lookup followed by its news and chart, as the search page shows them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAnalysis {
    pub event: EventRecord,
    pub articles: Vec<NewsArticle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news_error: Option<String>,
    pub chart: Option<QuoteSeriesResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_error: Option<String>,
}
