//! Click aggregation engine.
//!
//! Turns the append-only event list of a URL into the bucketed report the
//! dashboard renders: today/yesterday counts, 24 hourly and 7 daily
//! calendar-aligned buckets, and device/referrer breakdowns. Every
//! function here is a pure transformation: the reference instant is an
//! explicit argument, so identical inputs always produce identical
//! reports and tests never race the wall clock.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::models::UrlEntry;

use super::classify::{classify_device, referrer_host};
use super::models::{BreakdownEntry, DailyBucket, HourlyBucket, PopularUrl, SiteStats, UrlStats};

const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;

/// Trailing calendar hours covered by the hourly rollup.
const HOURLY_BUCKETS: usize = 24;

/// Trailing calendar days covered by the daily rollup.
const DAILY_BUCKETS: usize = 7;

/// The referrer breakdown is truncated to this many hosts.
const REFERRER_TOP_N: usize = 6;

/// The site report ranks at most this many URLs.
const POPULAR_TOP_N: usize = 10;

/// Compute the full analytics report for one URL.
///
/// All bucketing is calendar-aligned in UTC: "today" runs from the most
/// recent midnight with no upper bound (future-dated events land in it),
/// "yesterday" is the full calendar day before that, and the hourly and
/// daily series cover the 24 hours and 7 days ending with the hour and
/// day containing `now`, oldest first.
pub fn compute_url_stats(entry: &UrlEntry, now: DateTime<Utc>) -> UrlStats {
    let today = now.timestamp().div_euclid(SECS_PER_DAY);
    let current_hour = now.timestamp().div_euclid(SECS_PER_HOUR);

    let mut today_clicks = 0u64;
    let mut yesterday_clicks = 0u64;
    let mut hourly = [0u64; HOURLY_BUCKETS];
    let mut daily = [0u64; DAILY_BUCKETS];
    let mut device_names = Vec::with_capacity(entry.events.len());
    let mut referrer_hosts = Vec::with_capacity(entry.events.len());

    for event in &entry.events {
        let secs = event.timestamp.timestamp();
        let day = secs.div_euclid(SECS_PER_DAY);
        let hour = secs.div_euclid(SECS_PER_HOUR);

        if day >= today {
            today_clicks += 1;
        } else if day == today - 1 {
            yesterday_clicks += 1;
        }

        // Offset 0 is the bucket containing `now`; buckets are emitted
        // oldest first, so offset k lands at index len - 1 - k.
        let hour_offset = current_hour - hour;
        if (0..HOURLY_BUCKETS as i64).contains(&hour_offset) {
            hourly[HOURLY_BUCKETS - 1 - hour_offset as usize] += 1;
        }

        let day_offset = today - day;
        if (0..DAILY_BUCKETS as i64).contains(&day_offset) {
            daily[DAILY_BUCKETS - 1 - day_offset as usize] += 1;
        }

        device_names.push(classify_device(&event.user_agent));
        referrer_hosts.push(referrer_host(&event.referrer));
    }

    let clicks_by_hour = hourly
        .iter()
        .enumerate()
        .map(|(i, &clicks)| {
            let slot = now - Duration::hours((HOURLY_BUCKETS - 1 - i) as i64);
            HourlyBucket {
                hour: format!("{:02}:00", slot.hour()),
                clicks,
            }
        })
        .collect();

    let daily_clicks = daily
        .iter()
        .enumerate()
        .map(|(i, &clicks)| {
            let slot = now - Duration::days((DAILY_BUCKETS - 1 - i) as i64);
            DailyBucket {
                date: format!("{}/{}", slot.month(), slot.day()),
                clicks,
            }
        })
        .collect();

    let mut referrer_stats = rank_by_count(&referrer_hosts);
    referrer_stats.truncate(REFERRER_TOP_N);

    UrlStats {
        total_clicks: entry.events.len() as u64,
        today_clicks,
        yesterday_clicks,
        clicks_by_hour,
        daily_clicks,
        device_stats: rank_by_count(&device_names),
        referrer_stats,
    }
}

/// Compute the site-wide rollup across every tracked URL.
///
/// `entries` must be in insertion order; the popularity sort is stable,
/// so equally-clicked URLs keep that order.
pub fn compute_site_stats(entries: &[UrlEntry]) -> SiteStats {
    let total_clicks = entries.iter().map(UrlEntry::clicks).sum();

    let mut popular_urls: Vec<PopularUrl> = entries
        .iter()
        .map(|entry| PopularUrl {
            short_code: entry.short_code.clone(),
            original_url: entry.original_url.clone(),
            clicks: entry.clicks(),
            created_at: entry.created_at,
        })
        .collect();
    popular_urls.sort_by(|a, b| b.clicks.cmp(&a.clicks));
    popular_urls.truncate(POPULAR_TOP_N);

    SiteStats {
        total_clicks,
        total_urls: entries.len() as u64,
        popular_urls,
    }
}

/// Count occurrences of each name and rank them descending by count.
///
/// Ties keep first-appearance order: the sort is stable and seeded by
/// encounter order, so repeated reports over the same events never flap.
fn rank_by_count(names: &[&str]) -> Vec<BreakdownEntry> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, u64> = HashMap::new();

    for &name in names {
        match counts.entry(name) {
            Entry::Occupied(mut occupied) => *occupied.get_mut() += 1,
            Entry::Vacant(vacant) => {
                vacant.insert(1);
                order.push(name);
            }
        }
    }

    let mut ranked: Vec<BreakdownEntry> = order
        .into_iter()
        .map(|name| BreakdownEntry {
            name: name.to_string(),
            value: counts.get(name).copied().unwrap_or(0),
        })
        .collect();
    ranked.sort_by(|a, b| b.value.cmp(&a.value));
    ranked
}
