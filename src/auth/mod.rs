//! Admin authentication.
//!
//! A single configured admin credential is exchanged for a signed
//! stateless session token; protected API routes pass through
//! [`auth_middleware`], which accepts any request carrying a valid
//! bearer token.

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use std::sync::Arc;

use crate::config::AuthConfig;

pub mod token;

pub use token::{SessionClaims, TokenSigner};

pub struct AuthService {
    admin_email: String,
    admin_password: String,
    session_ttl: Duration,
    signer: TokenSigner,
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            admin_email: config.admin_email.clone(),
            admin_password: config.admin_password.clone(),
            session_ttl: Duration::hours(config.session_ttl_hours),
            signer: TokenSigner::new(config.session_secret.as_deref()),
        }
    }

    /// Check credentials and issue a session token on success.
    pub fn login(&self, email: &str, password: &str) -> anyhow::Result<Option<(String, DateTime<Utc>)>> {
        if email != self.admin_email || password != self.admin_password {
            return Ok(None);
        }
        let (token, expires_at) = self.signer.issue(email, self.session_ttl, Utc::now())?;
        Ok(Some((token, expires_at)))
    }

    /// Validate a bearer token against the signing key and expiry.
    pub fn validate_token(&self, token: &str) -> Option<SessionClaims> {
        self.signer.verify(token, Utc::now())
    }
}

pub async fn auth_middleware(
    auth_service: Arc<AuthService>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .unwrap_or("");

    if auth_service.validate_token(token).is_some() {
        next.run(request).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "authentication required" })),
        )
            .into_response()
    }
}
