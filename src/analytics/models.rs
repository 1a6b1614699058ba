//! Data models for analytics reports.
//!
//! Field names serialize to the exact JSON shape the dashboard consumes,
//! so renames here are breaking changes for the frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Clicks that fell into one calendar hour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourlyBucket {
    /// Hour label in 24-hour clock form, e.g. `"09:00"` or `"17:00"`.
    pub hour: String,
    pub clicks: u64,
}

/// Clicks that fell into one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyBucket {
    /// Day label as `month/day` without leading zeros, e.g. `"3/7"`.
    pub date: String,
    pub clicks: u64,
}

/// One slice of a categorical breakdown (devices, referrers).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BreakdownEntry {
    pub name: String,
    pub value: u64,
}

/// Full per-URL analytics report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UrlStats {
    pub total_clicks: u64,
    pub today_clicks: u64,
    pub yesterday_clicks: u64,
    /// 24 calendar hours ending with the current hour, oldest first.
    pub clicks_by_hour: Vec<HourlyBucket>,
    /// 7 calendar days ending with today, oldest first.
    pub daily_clicks: Vec<DailyBucket>,
    /// Device families by click count, descending. Zero-count families
    /// are omitted.
    pub device_stats: Vec<BreakdownEntry>,
    /// Top referrer hosts by click count, descending. At most six.
    pub referrer_stats: Vec<BreakdownEntry>,
}

/// One row of the site-wide popularity ranking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PopularUrl {
    pub short_code: String,
    pub original_url: String,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
}

/// Site-wide analytics report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteStats {
    pub total_clicks: u64,
    pub total_urls: u64,
    /// Up to ten URLs by click count, descending. Ties keep insertion order.
    pub popular_urls: Vec<PopularUrl>,
}
