//! Click analytics.
//!
//! Pure, deterministic aggregation over the append-only click history of
//! each short URL. Nothing here touches storage or the network; handlers
//! load entries, pick a reference instant and call into [`aggregator`].

pub mod aggregator;
pub mod classify;
pub mod models;

pub use aggregator::{compute_site_stats, compute_url_stats};
pub use classify::{classify_device, referrer_host};
pub use models::{BreakdownEntry, DailyBucket, HourlyBucket, PopularUrl, SiteStats, UrlStats};
