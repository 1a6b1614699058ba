use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded click on a short link.
///
/// Events are append-only: the redirect server pushes one per hit and
/// nothing mutates or removes them afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub timestamp: DateTime<Utc>,
    /// Raw Referer header value, empty when the browser sent none.
    pub referrer: String,
    /// Raw User-Agent header, `"unknown"` when absent.
    pub user_agent: String,
}

/// A shortened URL together with its full click history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlEntry {
    /// Monotonically increasing insertion id, used for stable ordering.
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub events: Vec<ClickEvent>,
}

impl UrlEntry {
    /// Total number of recorded clicks.
    pub fn clicks(&self) -> u64 {
        self.events.len() as u64
    }
}

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}
