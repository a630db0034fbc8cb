use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::routes::{auth, events, health, market, news};
use crate::state::AppState;

pub fn create_app(state: AppState, cors_origins: &[String]) -> Router {
    Router::<AppState>::new()
        .route("/", get(root))
        .nest("/health", health::router())
        .nest("/api", api_router())
        .nest("/api/auth", auth::router())
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .merge(events::router())
        .merge(market::router())
        .merge(news::router())
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Stock Event Analyzer API is running!" }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(parsed)
}
