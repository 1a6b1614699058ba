use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Redirect},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::models::ClickEvent;
use crate::storage::Storage;

pub struct RedirectState {
    pub storage: Arc<dyn Storage>,
}

/// Recorded when the browser sends no User-Agent header.
const UNKNOWN_USER_AGENT: &str = "unknown";

/// Redirect to the original URL, recording one click event
pub async fn redirect_url(
    State(state): State<Arc<RedirectState>>,
    Path(code): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let entry = match state.storage.get(&code).await {
        Ok(Some(entry)) => entry,
        Ok(None) => return (StatusCode::NOT_FOUND, "URL not found").into_response(),
        Err(err) => {
            tracing::error!(short_code = %code, "failed to look up URL: {err:#}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    };

    let event = ClickEvent {
        timestamp: Utc::now(),
        referrer: header_value(&headers, header::REFERER).unwrap_or_default(),
        user_agent: header_value(&headers, header::USER_AGENT)
            .unwrap_or_else(|| UNKNOWN_USER_AGENT.to_string()),
    };
    // The redirect must go out even when recording fails.
    if let Err(err) = state.storage.append_event(&code, event).await {
        tracing::warn!(short_code = %code, "failed to record click: {err:#}");
    }

    // Temporary, not permanent: a 308 would let browsers cache the hop
    // and skip click recording on repeat visits.
    Redirect::temporary(&entry.original_url).into_response()
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    #[derive(Serialize)]
    struct HealthResponse {
        status: String,
    }

    Json(HealthResponse {
        status: "OK".to_string(),
    })
}
