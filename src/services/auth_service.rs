use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::db::user_queries;
use crate::errors::AppError;
use crate::models::{Account, AuthResponse, LoginRequest, RegisterRequest, UserRecord};

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Derives a salted argon2id PHC string from a plaintext password.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|e| AppError::Internal(format!("salt generation failed: {}", e)))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))
}

/// Checks a candidate password against a stored hash.
///
/// A wrong password is `Ok(false)`; only an unreadable hash is an error.
pub fn verify_password(candidate: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(format!("malformed password hash: {}", e)))?;
    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(format!("password verification failed: {}", e))),
    }
}

/// Creates an account. Username and email uniqueness is enforced by the table.
pub async fn create_account(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<Account, AppError> {
    let username = username.trim();
    let email = email.trim();
    if username.is_empty() {
        return Err(AppError::InvalidInput("Username is required".to_string()));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::InvalidInput("A valid email is required".to_string()));
    }
    if password.is_empty() {
        return Err(AppError::InvalidInput("Password is required".to_string()));
    }

    let plaintext = password.to_string();
    let hash = tokio::task::spawn_blocking(move || hash_password(&plaintext))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let record = user_queries::insert(pool, username, email, &hash)
        .await
        .map_err(|e| {
            let err = AppError::from(e);
            if matches!(err, AppError::DuplicateAccount) {
                warn!("Registration rejected, username '{}' or email already taken", username);
            }
            err
        })?;

    info!("Created account {} ({})", record.id, record.username);
    Ok(Account::from(record))
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<UserRecord>, AppError> {
    Ok(user_queries::find_by_username(pool, username).await?)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserRecord>, AppError> {
    Ok(user_queries::find_by_email(pool, email).await?)
}

pub async fn register(
    pool: &SqlitePool,
    auth: &AuthConfig,
    input: RegisterRequest,
) -> Result<AuthResponse, AppError> {
    // Fail before writing anything if tokens cannot be issued.
    signing_secret(auth)?;
    let user = create_account(pool, &input.username, &input.email, &input.password).await?;
    let token = issue_token(auth, &user)?;
    Ok(AuthResponse { user, token })
}

/// Authenticates by username, or by email when no username matches.
pub async fn login(
    pool: &SqlitePool,
    auth: &AuthConfig,
    input: LoginRequest,
) -> Result<AuthResponse, AppError> {
    let identifier = input.username.trim();
    if identifier.is_empty() || input.password.is_empty() {
        return Err(AppError::InvalidInput("Username and password are required".to_string()));
    }
    signing_secret(auth)?;

    let record = match find_by_username(pool, identifier).await? {
        Some(record) => Some(record),
        None => find_by_email(pool, identifier).await?,
    };
    let Some(record) = record else {
        warn!("Login failed for unknown user '{}'", identifier);
        return Err(AppError::AuthenticationFailed);
    };

    let stored = record.password_hash.clone();
    let candidate = input.password;
    let matches = tokio::task::spawn_blocking(move || verify_password(&candidate, &stored))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    if !matches {
        warn!("Login failed for '{}': wrong password", identifier);
        return Err(AppError::AuthenticationFailed);
    }

    let user = Account::from(record);
    let token = issue_token(auth, &user)?;
    info!("User {} logged in", user.username);
    Ok(AuthResponse { user, token })
}

pub fn issue_token(auth: &AuthConfig, user: &Account) -> Result<String, AppError> {
    let secret = signing_secret(auth)?;
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(auth.token_ttl_hours)).timestamp(),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| AppError::Internal(format!("token encoding failed: {}", e)))
}

/// Resolves a bearer token to the account it was issued for.
pub async fn resolve_token(
    pool: &SqlitePool,
    auth: &AuthConfig,
    token: &str,
) -> Result<Account, AppError> {
    let secret = signing_secret(auth)?;
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!("Rejected session token: {}", e);
        AppError::AuthenticationFailed
    })?;

    let id = Uuid::parse_str(&data.claims.sub).map_err(|_| AppError::AuthenticationFailed)?;
    user_queries::find_by_id(pool, id)
        .await?
        .map(Account::from)
        .ok_or(AppError::AuthenticationFailed)
}

fn signing_secret(auth: &AuthConfig) -> Result<&str, AppError> {
    auth.jwt_secret
        .as_deref()
        .ok_or(AppError::MisconfiguredCredentials("JWT secret"))
}
