//! Demo data seeding.
//!
//! Fills the store with a handful of well-known documentation links and a
//! month of synthetic click history, so the dashboard has something to
//! show on a fresh start. Generation is driven by a caller-provided seed
//! and reference instant, which keeps the demo CLI reproducible.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{ClickEvent, UrlEntry};
use crate::storage::MemoryStore;

/// Demo URLs with fixed short codes, so the dashboard and CLI can
/// reference them directly.
pub const DEMO_URLS: &[(&str, &str)] = &[
    ("vrc101", "https://vercel.com/docs/getting-started"),
    ("nxt202", "https://nextjs.org/docs/app/building-your-application"),
    ("rct303", "https://react.dev/learn/thinking-in-react"),
    ("twn404", "https://tailwindcss.com/docs/installation"),
    ("shd505", "https://github.com/shadcn-ui/ui"),
];

const REFERRERS: &[&str] = &[
    "google.com",
    "twitter.com",
    "linkedin.com",
    "facebook.com",
    "direct",
    "reddit.com",
    "youtube.com",
];

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64)",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0)",
    "Mozilla/5.0 (Linux; Android 13)",
];

/// Synthetic history reaches back this many days from `now`.
const HISTORY_DAYS: i64 = 30;

/// Click count range per demo URL, upper bound exclusive.
const MIN_CLICKS: u32 = 100;
const MAX_CLICKS: u32 = 600;

/// Populate the store with demo URLs and synthetic click histories.
///
/// Returns the number of URLs created. `max_urls` caps how many of
/// [`DEMO_URLS`] are seeded; `None` seeds all of them.
pub fn seed_demo_data(
    store: &MemoryStore,
    now: DateTime<Utc>,
    seed: u64,
    max_urls: Option<usize>,
) -> Result<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let url_count = max_urls.unwrap_or(DEMO_URLS.len()).min(DEMO_URLS.len());

    for (short_code, original_url) in &DEMO_URLS[..url_count] {
        let created_at = now - random_age(&mut rng);

        let clicks = rng.random_range(MIN_CLICKS..MAX_CLICKS);
        let mut events: Vec<ClickEvent> = (0..clicks)
            .map(|_| ClickEvent {
                timestamp: now - random_age(&mut rng),
                referrer: REFERRERS[rng.random_range(0..REFERRERS.len())].to_string(),
                user_agent: USER_AGENTS[rng.random_range(0..USER_AGENTS.len())].to_string(),
            })
            .collect();
        // Histories are append-only in normal operation, so seeded events
        // arrive sorted as well.
        events.sort_by_key(|event| event.timestamp);

        store.insert_entry(UrlEntry {
            id: 0,
            original_url: original_url.to_string(),
            short_code: short_code.to_string(),
            created_at,
            events,
        })?;
    }

    Ok(url_count)
}

/// Uniformly random age within the demo history window.
fn random_age(rng: &mut StdRng) -> Duration {
    Duration::seconds(rng.random_range(0..HISTORY_DAYS * 86_400))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    fn now() -> DateTime<Utc> {
        "2024-03-08T14:30:00Z".parse().expect("valid timestamp")
    }

    #[tokio::test]
    async fn test_seeds_all_demo_urls() {
        let store = MemoryStore::new();
        let seeded = seed_demo_data(&store, now(), 42, None).expect("seeding should succeed");
        assert_eq!(seeded, DEMO_URLS.len());

        let entries = store.list().await.expect("list should succeed");
        assert_eq!(entries.len(), DEMO_URLS.len());
        for ((code, url), entry) in DEMO_URLS.iter().zip(&entries) {
            assert_eq!(entry.short_code, *code);
            assert_eq!(entry.original_url, *url);
        }
    }

    #[tokio::test]
    async fn test_click_counts_within_range() {
        let store = MemoryStore::new();
        seed_demo_data(&store, now(), 42, None).expect("seeding should succeed");

        for entry in store.list().await.expect("list should succeed") {
            let clicks = entry.clicks();
            assert!(
                (MIN_CLICKS as u64..MAX_CLICKS as u64).contains(&clicks),
                "{} has {clicks} clicks",
                entry.short_code
            );
        }
    }

    #[tokio::test]
    async fn test_events_are_sorted_and_within_history() {
        let store = MemoryStore::new();
        seed_demo_data(&store, now(), 42, None).expect("seeding should succeed");

        let oldest_allowed = now() - Duration::days(HISTORY_DAYS);
        for entry in store.list().await.expect("list should succeed") {
            let mut previous = oldest_allowed;
            for event in &entry.events {
                assert!(event.timestamp >= previous, "events must be sorted");
                assert!(event.timestamp <= now());
                previous = event.timestamp;
            }
        }
    }

    #[tokio::test]
    async fn test_same_seed_is_reproducible() {
        let first = MemoryStore::new();
        let second = MemoryStore::new();
        seed_demo_data(&first, now(), 7, None).expect("seeding should succeed");
        seed_demo_data(&second, now(), 7, None).expect("seeding should succeed");

        let first_entries = first.list().await.expect("list should succeed");
        let second_entries = second.list().await.expect("list should succeed");
        for (a, b) in first_entries.iter().zip(&second_entries) {
            assert_eq!(a.created_at, b.created_at);
            assert_eq!(a.events, b.events);
        }
    }

    #[tokio::test]
    async fn test_max_urls_caps_seeding() {
        let store = MemoryStore::new();
        let seeded = seed_demo_data(&store, now(), 42, Some(2)).expect("seeding should succeed");
        assert_eq!(seeded, 2);
        assert_eq!(store.list().await.expect("list should succeed").len(), 2);

        // Larger than the catalog just seeds everything.
        let store = MemoryStore::new();
        let seeded = seed_demo_data(&store, now(), 42, Some(50)).expect("seeding should succeed");
        assert_eq!(seeded, DEMO_URLS.len());
    }
}
