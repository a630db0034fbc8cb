use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::logging::LoggingConfig;

pub const DEFAULT_QUOTE_SYMBOL: &str = "SPY";
pub const DEFAULT_NEWS_PAGE_SIZE: u32 = 3;

/// Server-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub cors_origins: Vec<String>,
    pub providers: ProviderConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
}

/// Credentials and endpoints of the three upstream providers.
///
/// Keys are optional on purpose: a missing key only fails the requests that
/// need it.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub alpha_vantage_api_key: Option<String>,
    pub alpha_vantage_base_url: String,
    pub quote_symbol: String,
    pub news_api_key: Option<String>,
    pub news_api_base_url: String,
    pub news_page_size: u32,
    pub timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_model: "gpt-3.5-turbo".to_string(),
            openai_base_url: "https://api.openai.com/v1".to_string(),
            alpha_vantage_api_key: None,
            alpha_vantage_base_url: "https://www.alphavantage.co".to_string(),
            quote_symbol: DEFAULT_QUOTE_SYMBOL.to_string(),
            news_api_key: None,
            news_api_base_url: "https://newsapi.org/v2".to_string(),
            news_page_size: DEFAULT_NEWS_PAGE_SIZE,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_hours: 24,
        }
    }
}

impl AppConfig {
    /// Reads the remaining settings. Invalid values fall back to defaults with a
    /// warning, so the subscriber for `logging` must already be installed.
    pub fn from_env(logging: LoggingConfig) -> Self {
        let defaults = ProviderConfig::default();

        let providers = ProviderConfig {
            openai_api_key: non_empty_var("OPENAI_API_KEY"),
            openai_model: non_empty_var("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            openai_base_url: non_empty_var("OPENAI_BASE_URL").unwrap_or(defaults.openai_base_url),
            alpha_vantage_api_key: non_empty_var("ALPHA_VANTAGE_API_KEY"),
            alpha_vantage_base_url: non_empty_var("ALPHA_VANTAGE_BASE_URL")
                .unwrap_or(defaults.alpha_vantage_base_url),
            quote_symbol: non_empty_var("QUOTE_SYMBOL").unwrap_or(defaults.quote_symbol),
            news_api_key: non_empty_var("NEWS_API_KEY"),
            news_api_base_url: non_empty_var("NEWS_API_BASE_URL")
                .unwrap_or(defaults.news_api_base_url),
            news_page_size: parsed_var("NEWS_PAGE_SIZE", defaults.news_page_size),
            timeout: Duration::from_secs(parsed_var("PROVIDER_TIMEOUT_SECS", 30u64)),
        };

        let auth = AuthConfig {
            jwt_secret: non_empty_var("JWT_SECRET"),
            token_ttl_hours: parsed_var("TOKEN_TTL_HOURS", AuthConfig::default().token_ttl_hours),
        };

        Self {
            host: non_empty_var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parsed_var("PORT", 4000u16),
            database_url: non_empty_var("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://stock_event_analyzer.db?mode=rwc".to_string()),
            cors_origins: split_list(
                &non_empty_var("CORS_ORIGINS")
                    .unwrap_or_else(|| "http://localhost:3000".to_string()),
            ),
            providers,
            auth,
            logging,
        }
    }
}

/// Masks an API key down to its first and last four characters for logging.
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T: FromStr + Copy + std::fmt::Display>(name: &str, default: T) -> T {
    match non_empty_var(name) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid value '{}' for {}, using default {}", raw, name, default);
            default
        }),
        None => default,
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
