//! AI insights proxy.
//!
//! Forwards analysis requests to an external insights API (a serverless
//! endpoint wrapping a text model), caches the upstream document briefly
//! and reshapes it per requested analysis type before it reaches the
//! dashboard. The upstream model writes Korean section headers; the
//! keyword tables below match on those markers.

use anyhow::{Context, Result};
use moka::future::Cache;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::InsightsConfig;

pub mod markdown;

use markdown::{clean_markdown, parse_sections, renumber_sections, Section};

const TRAFFIC_KEYWORDS: &[&str] = &["트래픽", "패턴"];
const REFERRER_KEYWORDS: &[&str] = &["채널", "유입", "경로"];
const TARGET_KEYWORDS: &[&str] = &["마케팅", "타겟", "전환", "액션", "실행"];

/// Distinct documents the upstream can produce. Cached per kind, since
/// several requested types map onto the same upstream analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisKind {
    Traffic,
    Conversion,
    Full,
}

impl AnalysisKind {
    /// Map a requested analysis type onto the upstream vocabulary.
    /// Unknown types fall back to the full analysis.
    pub fn from_request(requested: &str) -> Self {
        match requested {
            "url" | "traffic" => Self::Traffic,
            "marketing" | "conversion" => Self::Conversion,
            _ => Self::Full,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traffic => "traffic",
            Self::Conversion => "conversion",
            Self::Full => "full",
        }
    }
}

/// Raw upstream response body.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamInsights {
    #[serde(default)]
    pub analysis_type: String,
    #[serde(default)]
    pub data_summary: serde_json::Value,
    #[serde(default)]
    pub ai_insights: String,
    #[serde(default)]
    pub generated_at: String,
}

#[derive(Debug, Error)]
pub enum InsightsError {
    #[error("insights upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
    #[error("insights upstream returned status {0}")]
    UpstreamStatus(u16),
}

pub struct InsightsService {
    http: reqwest::Client,
    base_url: String,
    cache: Cache<AnalysisKind, Arc<UpstreamInsights>>,
}

impl InsightsService {
    /// Cached upstream documents, one slot per [`AnalysisKind`].
    const CACHE_CAPACITY: u64 = 8;

    /// Build the service, or `None` when no upstream URL is configured.
    pub fn from_config(config: &InsightsConfig) -> Result<Option<Self>> {
        let Some(base_url) = config.api_url.clone() else {
            return Ok(None);
        };

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build insights HTTP client")?;
        let cache = Cache::builder()
            .max_capacity(Self::CACHE_CAPACITY)
            .time_to_live(Duration::from_secs(config.cache_ttl_secs))
            .build();

        Ok(Some(Self {
            http,
            base_url,
            cache,
        }))
    }

    /// Produce the reshaped insights payload for a requested type.
    ///
    /// The upstream document is fetched at most once per cache window for
    /// each [`AnalysisKind`]; reshaping runs per request since it depends
    /// on the exact requested type string.
    pub async fn generate(&self, requested: &str) -> Result<serde_json::Value, InsightsError> {
        let kind = AnalysisKind::from_request(requested);
        let upstream = match self.cache.get(&kind).await {
            Some(hit) => hit,
            None => {
                let fresh = Arc::new(self.fetch(kind).await?);
                self.cache.insert(kind, Arc::clone(&fresh)).await;
                fresh
            }
        };
        Ok(reshape_response(requested, &upstream))
    }

    async fn fetch(&self, kind: AnalysisKind) -> Result<UpstreamInsights, InsightsError> {
        let response = self
            .http
            .post(&self.base_url)
            .json(&json!({ "type": kind.as_str() }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(InsightsError::UpstreamStatus(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }
}

/// Reshape the raw upstream document into the per-type payload the
/// dashboard expects. Unknown types pass the document through unshaped.
fn reshape_response(requested: &str, upstream: &UpstreamInsights) -> serde_json::Value {
    let sections = parse_sections(&upstream.ai_insights);

    match requested {
        "url" | "traffic" => {
            let traffic_pattern = find_section(&sections, TRAFFIC_KEYWORDS)
                .map(|s| s.content.as_str())
                .filter(|c| !c.is_empty())
                .or_else(|| {
                    sections
                        .first()
                        .map(|s| s.content.as_str())
                        .filter(|c| !c.is_empty())
                })
                .unwrap_or(&upstream.ai_insights);
            let referrer_analysis = find_section(&sections, REFERRER_KEYWORDS)
                .map(|s| s.content.as_str())
                .filter(|c| !c.is_empty())
                .or_else(|| {
                    sections
                        .get(2)
                        .map(|s| s.content.as_str())
                        .filter(|c| !c.is_empty())
                })
                .unwrap_or("");

            json!({
                "trafficPattern": clean_markdown(traffic_pattern),
                "referrerAnalysis": clean_markdown(referrer_analysis),
                "dataSummary": upstream.data_summary,
                "generatedAt": upstream.generated_at,
            })
        }
        "marketing" | "conversion" => {
            let marketing: Vec<&Section> = sections
                .iter()
                .filter(|s| TARGET_KEYWORDS.iter().any(|k| s.title.contains(k)))
                .collect();
            let target_analysis = if marketing.is_empty() {
                clean_markdown(&upstream.ai_insights)
            } else {
                renumber_sections(marketing.iter().copied())
            };

            json!({
                "targetAnalysis": target_analysis,
                "dataSummary": upstream.data_summary,
                "generatedAt": upstream.generated_at,
            })
        }
        "site" | "full" => {
            let trend_analysis = if sections.is_empty() {
                clean_markdown(&upstream.ai_insights)
            } else {
                renumber_sections(&sections)
            };

            json!({
                "trendAnalysis": trend_analysis,
                "dataSummary": upstream.data_summary,
                "generatedAt": upstream.generated_at,
            })
        }
        _ => json!({
            "insights": upstream.ai_insights,
            "dataSummary": upstream.data_summary,
            "generatedAt": upstream.generated_at,
            "analysisType": upstream.analysis_type,
        }),
    }
}

fn find_section<'a>(sections: &'a [Section], keywords: &[&str]) -> Option<&'a Section> {
    sections
        .iter()
        .find(|s| keywords.iter().any(|k| s.title.contains(k)))
}
