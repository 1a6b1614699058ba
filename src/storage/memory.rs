//! In-memory URL store.
//!
//! The whole data set lives in one concurrent map keyed by short code,
//! with each entry carrying its full event history inline. Reads hand
//! out clones, so an aggregation pass works on a consistent snapshot
//! while redirects keep appending.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use super::trait_def::{Storage, StorageError, StorageResult};
use crate::models::{ClickEvent, UrlEntry};

pub struct MemoryStore {
    entries: DashMap<String, UrlEntry>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    /// Insert a fully-formed entry, assigning the next insertion id.
    ///
    /// The demo seeder uses this to backdate `created_at` and preload
    /// events; API creation goes through [`Storage::create_with_code`].
    pub fn insert_entry(&self, mut entry: UrlEntry) -> StorageResult<UrlEntry> {
        match self.entries.entry(entry.short_code.clone()) {
            Entry::Occupied(_) => Err(StorageError::Conflict),
            Entry::Vacant(vacant) => {
                entry.id = self.next_id.fetch_add(1, Ordering::SeqCst);
                let stored = entry.clone();
                vacant.insert(entry);
                Ok(stored)
            }
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn create_with_code(
        &self,
        short_code: &str,
        original_url: &str,
    ) -> StorageResult<UrlEntry> {
        self.insert_entry(UrlEntry {
            // Replaced with the real insertion id inside insert_entry.
            id: 0,
            original_url: original_url.to_string(),
            short_code: short_code.to_string(),
            created_at: Utc::now(),
            events: Vec::new(),
        })
    }

    async fn get(&self, short_code: &str) -> Result<Option<UrlEntry>> {
        Ok(self
            .entries
            .get(short_code)
            .map(|entry| entry.value().clone()))
    }

    async fn append_event(&self, short_code: &str, event: ClickEvent) -> Result<bool> {
        match self.entries.get_mut(short_code) {
            Some(mut entry) => {
                entry.events.push(event);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self) -> Result<Vec<UrlEntry>> {
        let mut entries: Vec<UrlEntry> = self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        // DashMap iteration order is arbitrary; insertion ids restore it.
        entries.sort_by_key(|entry| entry.id);
        Ok(entries)
    }
}
