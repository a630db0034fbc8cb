use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use crate::errors::AppError;
use crate::models::{AuthResponse, CurrentUserResponse, LoginRequest, RegisterRequest};
use crate::services::auth_service;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let Json(input) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    info!("POST /api/auth/register - username: {}", input.username);
    let response = auth_service::register(&state.pool, &state.auth, input).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AppError> {
    let Json(input) = payload.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    info!("POST /api/auth/login - username: {}", input.username);
    let response = auth_service::login(&state.pool, &state.auth, input).await?;
    Ok(Json(response))
}

/// GET /api/auth/me with `Authorization: Bearer <token>`
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<CurrentUserResponse>, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::AuthenticationFailed)?;

    let user = auth_service::resolve_token(&state.pool, &state.auth, token).await?;
    Ok(Json(CurrentUserResponse { user }))
}
