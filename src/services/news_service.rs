use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::config::ProviderConfig;
use crate::errors::AppError;
use crate::models::{NewsArticle, NewsSearchResult};

/// Trait for news providers
#[async_trait]
pub trait NewsProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<NewsSearchResult, AppError>;
}

/// NewsAPI.org `everything` endpoint
pub struct NewsApiProvider {
    api_key: Option<String>,
    base_url: String,
    page_size: u32,
    client: Client,
}

impl NewsApiProvider {
    pub fn new(client: Client, config: &ProviderConfig) -> Self {
        Self {
            api_key: config.news_api_key.clone(),
            base_url: config.news_api_base_url.trim_end_matches('/').to_string(),
            page_size: config.news_page_size,
            client,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsApiResponse {
    status: Option<String>,
    message: Option<String>,
    total_results: Option<u64>,
    articles: Option<Vec<NewsApiArticle>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    source: Option<NewsApiSource>,
    published_at: Option<String>,
    url_to_image: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSource {
    name: Option<String>,
}

/// Maps a NewsAPI payload to articles, filling every missing display field.
pub fn normalize_response(
    query: &str,
    body: NewsApiResponse,
    now: DateTime<Utc>,
) -> Result<NewsSearchResult, AppError> {
    if body.status.as_deref() == Some("error") {
        let message = body
            .message
            .unwrap_or_else(|| "News API returned an error".to_string());
        error!("News API error: {}", message);
        return Err(AppError::UpstreamUnavailable(message));
    }

    let raw = body.articles.unwrap_or_default();
    if raw.is_empty() {
        return Err(AppError::NoArticlesFound);
    }

    let fallback_time = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let articles: Vec<NewsArticle> = raw
        .into_iter()
        .map(|a| NewsArticle {
            title: non_blank(a.title).unwrap_or_else(|| "No title available".to_string()),
            description: non_blank(a.description)
                .unwrap_or_else(|| "No description available".to_string()),
            url: a.url.unwrap_or_default(),
            source: non_blank(a.source.and_then(|s| s.name))
                .unwrap_or_else(|| "Unknown source".to_string()),
            published_at: non_blank(a.published_at).unwrap_or_else(|| fallback_time.clone()),
            url_to_image: non_blank(a.url_to_image),
        })
        .collect();

    Ok(NewsSearchResult {
        query: query.to_string(),
        total_results: body.total_results.unwrap_or(articles.len() as u64),
        articles,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    async fn search(&self, query: &str) -> Result<NewsSearchResult, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AppError::MisconfiguredCredentials("News API key"))?;

        info!("Fetching news from NewsAPI for query: {}", query);

        let page_size = self.page_size.to_string();
        let response = self
            .client
            .get(format!("{}/everything", self.base_url))
            .header("X-Api-Key", api_key)
            .header(reqwest::header::USER_AGENT, "stock-event-analyzer/1.0")
            .query(&[
                ("q", query),
                ("sortBy", "relevancy"),
                ("language", "en"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("News API request failed: {}", e);
                AppError::UpstreamUnavailable(format!("News API error: {}", e))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            AppError::UpstreamUnavailable(format!("News API body unreadable: {}", e))
        })?;

        let body: NewsApiResponse = serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse News API response ({}): {}", status, text);
            AppError::UpstreamParse(format!("news response: {}", e))
        })?;

        if !status.is_success() && body.status.as_deref() != Some("error") {
            warn!("News API returned HTTP {} without an error status", status);
            return Err(AppError::UpstreamUnavailable(format!("News API returned HTTP {}", status)));
        }

        let result = normalize_response(query, body, Utc::now())?;
        info!("Fetched {} news articles from NewsAPI", result.articles.len());
        Ok(result)
    }
}

/// Searches news for a query after validating it.
pub async fn fetch_news_articles(
    provider: &dyn NewsProvider,
    query: &str,
) -> Result<NewsSearchResult, AppError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput("Query parameter is required".to_string()));
    }
    provider.search(query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn body(value: serde_json::Value) -> NewsApiResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_zero_articles_is_no_articles_found() {
        let result = normalize_response(
            "q",
            body(json!({ "status": "ok", "totalResults": 0, "articles": [] })),
            now(),
        );
        assert!(matches!(result, Err(AppError::NoArticlesFound)));
    }

    #[test]
    fn test_provider_error_status() {
        let result = normalize_response(
            "q",
            body(json!({ "status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid" })),
            now(),
        );
        match result {
            Err(AppError::UpstreamUnavailable(msg)) => assert_eq!(msg, "Your API key is invalid"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_get_placeholders() {
        let result = normalize_response(
            "black monday",
            body(json!({
                "status": "ok",
                "totalResults": 12,
                "articles": [{ "title": null, "url": "https://example.com/a", "source": { "id": null, "name": null } }]
            })),
            now(),
        )
        .unwrap();

        assert_eq!(result.total_results, 12);
        let article = &result.articles[0];
        assert_eq!(article.title, "No title available");
        assert_eq!(article.description, "No description available");
        assert_eq!(article.source, "Unknown source");
        assert_eq!(article.published_at, "2024-05-01T12:00:00.000Z");
        assert_eq!(article.url_to_image, None);
    }

    #[test]
    fn test_complete_article_passes_through() {
        let result = normalize_response(
            "q",
            body(json!({
                "status": "ok",
                "articles": [{
                    "title": "Markets tumble",
                    "description": "Stocks fell sharply",
                    "url": "https://example.com/b",
                    "source": { "name": "Reuters" },
                    "publishedAt": "2024-04-30T09:15:00Z",
                    "urlToImage": "https://example.com/b.jpg"
                }]
            })),
            now(),
        )
        .unwrap();

        assert_eq!(result.total_results, 1);
        assert_eq!(result.articles[0].source, "Reuters");
        assert_eq!(result.articles[0].url_to_image.as_deref(), Some("https://example.com/b.jpg"));
    }
}
