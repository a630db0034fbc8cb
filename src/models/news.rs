use serde::{Deserialize, Serialize};

/// A news article with every display field filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub source: String,
    pub published_at: String,
    pub url_to_image: Option<String>,
}

/// Body of `GET /api/news-articles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSearchResult {
    pub query: String,
    pub total_results: u64,
    pub articles: Vec<NewsArticle>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsQueryParams {
    pub query: Option<String>,
}
