//! Core API handlers: health, shorten, URL listing and login.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::AuthService;
use crate::insights::InsightsService;
use crate::models::{ShortenRequest, UrlEntry};
use crate::storage::{Storage, StorageError};

pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub auth: Arc<AuthService>,
    pub insights: Option<Arc<InsightsService>>,
    /// Base URL the redirect server is reachable at, used to build the
    /// short URLs returned to clients.
    pub public_base_url: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub(crate) type HandlerError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

const SHORT_CODE_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const SHORT_CODE_LEN: usize = 6;

/// Generation attempts before giving up when codes keep colliding.
const MAX_GENERATION_ATTEMPTS: usize = 10;

/// Uniform delay applied to failed login attempts.
const FAILED_LOGIN_DELAY: Duration = Duration::from_millis(500);

/// Generate a random 6-character alphanumeric short code
fn generate_short_code() -> String {
    let mut rng = rand::rng();
    (0..SHORT_CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..SHORT_CODE_ALPHABET.len());
            SHORT_CODE_ALPHABET[idx] as char
        })
        .collect()
}

fn join_short_url(base: &str, code: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), code)
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
    })
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
}

/// Create a shortened URL under a freshly generated code
pub async fn shorten_url(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), HandlerError> {
    let url = request.url.trim();
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "url must start with http:// or https://",
        ));
    }

    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let code = generate_short_code();
        match state.storage.create_with_code(&code, url).await {
            Ok(entry) => {
                return Ok((
                    StatusCode::CREATED,
                    Json(ShortenResponse {
                        short_url: join_short_url(&state.public_base_url, &entry.short_code),
                        short_code: entry.short_code,
                        original_url: entry.original_url,
                        created_at: entry.created_at,
                    }),
                ));
            }
            // Collided with an existing code, roll a new one.
            Err(StorageError::Conflict) => continue,
            Err(StorageError::Other(err)) => {
                tracing::error!("failed to create short URL: {err:#}");
                return Err(error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "failed to create short URL",
                ));
            }
        }
    }

    tracing::error!("gave up allocating a short code after {MAX_GENERATION_ATTEMPTS} collisions");
    Err(error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "failed to allocate a unique short code",
    ))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlSummary {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub clicks: u64,
}

impl From<UrlEntry> for UrlSummary {
    fn from(entry: UrlEntry) -> Self {
        Self {
            id: entry.id,
            clicks: entry.clicks(),
            short_code: entry.short_code,
            original_url: entry.original_url,
            created_at: entry.created_at,
        }
    }
}

/// List every tracked URL with its click total
pub async fn list_urls(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UrlSummary>>, HandlerError> {
    let entries = state.storage.list().await.map_err(|err| {
        tracing::error!("failed to list URLs: {err:#}");
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to list URLs")
    })?;
    Ok(Json(entries.into_iter().map(UrlSummary::from).collect()))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Exchange admin credentials for a session token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HandlerError> {
    let outcome = state
        .auth
        .login(&request.email, &request.password)
        .map_err(|err| {
            tracing::error!("login failed: {err:#}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "login failed")
        })?;

    match outcome {
        Some((token, expires_at)) => Ok(Json(LoginResponse { token, expires_at })),
        None => {
            tokio::time::sleep(FAILED_LOGIN_DELAY).await;
            Err(error_response(
                StatusCode::UNAUTHORIZED,
                "invalid credentials",
            ))
        }
    }
}
