use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use stock_event_analyzer::app;
use stock_event_analyzer::config::{mask_key, AppConfig};
use stock_event_analyzer::db;
use stock_event_analyzer::external::alphavantage::AlphaVantageProvider;
use stock_event_analyzer::logging::{init_logging, LoggingConfig};
use stock_event_analyzer::services::llm_service::OpenAiProvider;
use stock_event_analyzer::services::news_service::NewsApiProvider;
use stock_event_analyzer::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    let logging = LoggingConfig::from_env();
    init_logging(&logging)?;

    let config = AppConfig::from_env(logging);

    let providers = &config.providers;
    for (name, key) in [
        ("OPENAI_API_KEY", &providers.openai_api_key),
        ("ALPHA_VANTAGE_API_KEY", &providers.alpha_vantage_api_key),
        ("NEWS_API_KEY", &providers.news_api_key),
    ] {
        match key {
            Some(key) => tracing::info!("{} loaded ({})", name, mask_key(key)),
            None => tracing::warn!("{} not set; requests needing it will fail", name),
        }
    }
    if config.auth.jwt_secret.is_none() {
        tracing::warn!("JWT_SECRET not set; register and login will fail");
    }

    let pool = db::connect(&config.database_url, 5)
        .await
        .with_context(|| format!("failed to open credential database {}", config.database_url))?;

    let client = reqwest::Client::builder()
        .timeout(providers.timeout)
        .build()
        .context("failed to build HTTP client")?;

    let state = AppState {
        pool,
        llm_provider: Arc::new(OpenAiProvider::new(client.clone(), providers)),
        price_provider: Arc::new(AlphaVantageProvider::new(
            client.clone(),
            providers.alpha_vantage_api_key.clone(),
            providers.alpha_vantage_base_url.clone(),
        )),
        news_provider: Arc::new(NewsApiProvider::new(client, providers)),
        quote_symbol: providers.quote_symbol.clone(),
        auth: Arc::new(config.auth.clone()),
    };
    let app = app::create_app(state, &config.cors_origins);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Stock Event Analyzer backend running at http://{}/", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
