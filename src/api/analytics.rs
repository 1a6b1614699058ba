//! Analytics API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::analytics::{self, SiteStats, UrlStats};

use super::handlers::{error_response, AppState, HandlerError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlStatsResponse {
    pub short_code: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub stats: UrlStats,
}

/// Site-wide analytics rollup
pub async fn get_site_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<SiteStats>, HandlerError> {
    let entries = state.storage.list().await.map_err(|err| {
        tracing::error!("failed to load entries for site stats: {err:#}");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to compute site stats",
        )
    })?;
    Ok(Json(analytics::compute_site_stats(&entries)))
}

/// Analytics report for a single short code
pub async fn get_url_stats(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<UrlStatsResponse>, HandlerError> {
    let entry = state.storage.get(&code).await.map_err(|err| {
        tracing::error!(short_code = %code, "failed to load entry: {err:#}");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "failed to compute URL stats",
        )
    })?;

    let Some(entry) = entry else {
        return Err(error_response(StatusCode::NOT_FOUND, "URL not found"));
    };

    let stats = analytics::compute_url_stats(&entry, Utc::now());
    Ok(Json(UrlStatsResponse {
        short_code: entry.short_code,
        original_url: entry.original_url,
        created_at: entry.created_at,
        stats,
    }))
}
