use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0} is not configured")]
    MisconfiguredCredentials(&'static str),
    #[error("Upstream provider unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("Malformed upstream response: {0}")]
    UpstreamParse(String),
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),
    #[error("Rate limited by external provider: {0}")]
    RateLimited(String),
    #[error("No articles found")]
    NoArticlesFound,
    #[error("An account with that username or email already exists")]
    DuplicateAccount,
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(sqlx::Error),
    #[error("Invalid credentials")]
    AuthenticationFailed,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::MisconfiguredCredentials(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::UpstreamParse(_) => StatusCode::BAD_GATEWAY,
            AppError::InvalidSymbol(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::NoArticlesFound => StatusCode::NOT_FOUND,
            AppError::DuplicateAccount => StatusCode::CONFLICT,
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to API clients. Provider and storage details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::MisconfiguredCredentials(name) => format!("{} not configured", name),
            AppError::UpstreamUnavailable(_) => "Failed to reach upstream provider".to_string(),
            AppError::UpstreamParse(_) => "Failed to parse upstream provider data".to_string(),
            AppError::InvalidSymbol(_) => "Invalid symbol or API error".to_string(),
            AppError::RateLimited(_) => {
                "API call frequency limit reached. Please try again later.".to_string()
            }
            AppError::StorageUnavailable(_) => "Storage unavailable".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", status, self);
        } else {
            tracing::warn!("Request rejected ({}): {}", status, self);
        }
        let body = Json(json!({ "error": self.public_message() }));
        match self {
            AppError::RateLimited(_) => {
                let mut headers = HeaderMap::new();
                headers.insert("Retry-After", HeaderValue::from_static("60"));
                (status, headers, body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key not configured")]
    MissingApiKey,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Request timed out")]
    Timeout,
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Empty completion")]
    EmptyResponse,
}

impl From<LlmError> for AppError {
    fn from(value: LlmError) -> Self {
        match value {
            LlmError::MissingApiKey => AppError::MisconfiguredCredentials("OpenAI API key"),
            other => AppError::UpstreamUnavailable(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(value: sqlx::Error) -> Self {
        match &value {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::DuplicateAccount
            }
            _ => AppError::StorageUnavailable(value),
        }
    }
}
