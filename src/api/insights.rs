//! AI insights endpoint.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::insights::InsightsError;

use super::handlers::{error_response, AppState, HandlerError};

#[derive(Debug, Deserialize)]
pub struct InsightsRequest {
    /// Requested analysis type; unknown values fall back to the full
    /// site analysis.
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Generate AI insights for the requested analysis type
pub async fn generate_insights(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InsightsRequest>,
) -> Result<Json<serde_json::Value>, HandlerError> {
    let Some(insights) = state.insights.as_ref() else {
        return Err(error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "insights API is not configured",
        ));
    };

    match insights.generate(&request.kind).await {
        Ok(payload) => Ok(Json(payload)),
        Err(InsightsError::UpstreamStatus(status)) => {
            tracing::error!("insights upstream returned status {status}");
            Err(error_response(
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                "failed to generate AI insights",
            ))
        }
        Err(InsightsError::Upstream(err)) => {
            tracing::error!("insights upstream request failed: {err}");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to generate AI insights",
            ))
        }
    }
}
