//! Per-key cache of contract reads.
//!
//! Every read the views depend on is identified by a [`ReadKey`]. An entry
//! remembers the last value, whether a fetch is in flight, and the generation
//! of the fetch it expects. Invalidating a key bumps its generation, so a
//! refetch happens exactly once per invalidation and a late answer from an
//! older fetch can never overwrite a newer one.
//!
//! ```text
//!   request(key) ──► Loading(g1) ──resolve(g1)──► Ready
//!                         │
//!            invalidate ──┘──► Loading(g2) ──resolve(g1)──► ignored
//! ```

use std::collections::HashMap;

use crate::domain::{ReadKey, ReadValue};

// ============================================================================
// Entries
// ============================================================================

/// Fetch status of one read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadStatus {
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Ready,
    /// The last fetch failed.
    Failed(String),
}

#[derive(Debug, Clone)]
struct ReadEntry {
    /// Last successfully fetched value. Kept while a refetch is in flight.
    value: Option<ReadValue>,
    status: ReadStatus,
    generation: u64,
}

/// A fetch the caller must start: the key and the generation to resolve with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub key: ReadKey,
    pub generation: u64,
}

// ============================================================================
// Read Cache
// ============================================================================

/// Cache of contract reads, keyed by contract, function and arguments.
#[derive(Debug, Default)]
pub struct ReadCache {
    entries: HashMap<ReadKey, ReadEntry>,
    next_generation: u64,
}

impl ReadCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest known value of `key`, even if a refetch is in flight.
    #[must_use]
    pub fn value(&self, key: &ReadKey) -> Option<&ReadValue> {
        self.entries.get(key).and_then(|entry| entry.value.as_ref())
    }

    /// Value of `key` only if it is fully resolved (no refetch in flight).
    ///
    /// Write actions gate on this so they never prepare against data that is
    /// known to be stale.
    #[must_use]
    pub fn resolved(&self, key: &ReadKey) -> Option<&ReadValue> {
        self.entries
            .get(key)
            .filter(|entry| entry.status == ReadStatus::Ready)
            .and_then(|entry| entry.value.as_ref())
    }

    #[must_use]
    pub fn status(&self, key: &ReadKey) -> Option<&ReadStatus> {
        self.entries.get(key).map(|entry| &entry.status)
    }

    /// `true` while a fetch of `key` is in flight.
    #[must_use]
    pub fn is_loading(&self, key: &ReadKey) -> bool {
        matches!(self.status(key), Some(ReadStatus::Loading))
    }

    /// Error of the last fetch of `key`, if it failed.
    #[must_use]
    pub fn error(&self, key: &ReadKey) -> Option<&str> {
        match self.status(key) {
            Some(ReadStatus::Failed(message)) => Some(message),
            _ => None,
        }
    }

    /// Starts tracking `key` if it has never been requested.
    ///
    /// Returns a ticket when the caller must fetch it. Keys that are already
    /// loading, resolved or failed return `None`.
    pub fn request(&mut self, key: ReadKey) -> Option<FetchTicket> {
        if self.entries.contains_key(&key) {
            return None;
        }
        let generation = self.bump();
        self.entries.insert(
            key,
            ReadEntry {
                value: None,
                status: ReadStatus::Loading,
                generation,
            },
        );
        Some(FetchTicket { key, generation })
    }

    /// Marks `keys` stale. Every key yields exactly one new fetch ticket,
    /// even if an older fetch is still in flight.
    pub fn invalidate(&mut self, keys: impl IntoIterator<Item = ReadKey>) -> Vec<FetchTicket> {
        let mut tickets = Vec::new();
        for key in keys {
            if tickets.iter().any(|t: &FetchTicket| t.key == key) {
                continue;
            }
            let generation = self.bump();
            let entry = self.entries.entry(key).or_insert(ReadEntry {
                value: None,
                status: ReadStatus::Loading,
                generation,
            });
            entry.status = ReadStatus::Loading;
            entry.generation = generation;
            tickets.push(FetchTicket { key, generation });
        }
        tickets
    }

    /// Invalidates every tracked key.
    pub fn invalidate_all(&mut self) -> Vec<FetchTicket> {
        let keys: Vec<ReadKey> = self.entries.keys().copied().collect();
        self.invalidate(keys)
    }

    /// Stores a fetch result. Returns `false` if the ticket is stale.
    pub fn resolve(&mut self, ticket: FetchTicket, result: Result<ReadValue, String>) -> bool {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            return false;
        };
        if entry.generation != ticket.generation {
            tracing::debug!(key = ?ticket.key, "discarding stale read result");
            return false;
        }
        match result {
            Ok(value) => {
                entry.value = Some(value);
                entry.status = ReadStatus::Ready;
            }
            Err(message) => {
                tracing::warn!(key = ?ticket.key, error = %message, "read failed");
                entry.status = ReadStatus::Failed(message);
            }
        }
        true
    }

    fn bump(&mut self) -> u64 {
        self.next_generation = self.next_generation.wrapping_add(1);
        self.next_generation
    }

    /// Inserts a resolved value directly.
    #[cfg(test)]
    pub fn seed(&mut self, key: ReadKey, value: ReadValue) {
        let generation = self.bump();
        self.entries.insert(
            key,
            ReadEntry {
                value: Some(value),
                status: ReadStatus::Ready,
                generation,
            },
        );
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TokenId;
    use alloy_primitives::U256;

    fn supply(n: u64) -> ReadValue {
        ReadValue::Uint(U256::from(n))
    }

    #[test]
    fn test_request_is_deduplicated() {
        let mut cache = ReadCache::new();
        let ticket = cache.request(ReadKey::TotalSupply);
        assert!(ticket.is_some());
        assert!(cache.request(ReadKey::TotalSupply).is_none());
        assert!(cache.is_loading(&ReadKey::TotalSupply));
        assert!(cache.value(&ReadKey::TotalSupply).is_none());
    }

    #[test]
    fn test_resolve_stores_value() {
        let mut cache = ReadCache::new();
        let ticket = cache.request(ReadKey::TotalSupply).unwrap();
        assert!(cache.resolve(ticket, Ok(supply(3))));
        assert_eq!(cache.resolved(&ReadKey::TotalSupply), Some(&supply(3)));
        assert!(!cache.is_loading(&ReadKey::TotalSupply));
    }

    #[test]
    fn test_invalidate_keeps_value_but_unresolves() {
        let mut cache = ReadCache::new();
        cache.seed(ReadKey::TotalSupply, supply(3));

        let tickets = cache.invalidate([ReadKey::TotalSupply, ReadKey::TotalSupply]);
        assert_eq!(tickets.len(), 1);
        assert_eq!(cache.value(&ReadKey::TotalSupply), Some(&supply(3)));
        assert!(cache.resolved(&ReadKey::TotalSupply).is_none());
    }

    #[test]
    fn test_stale_generation_is_ignored() {
        let mut cache = ReadCache::new();
        let first = cache.request(ReadKey::TotalSupply).unwrap();
        let second = cache.invalidate([ReadKey::TotalSupply])[0];

        assert!(!cache.resolve(first, Ok(supply(1))));
        assert!(cache.is_loading(&ReadKey::TotalSupply));
        assert!(cache.resolve(second, Ok(supply(2))));
        assert_eq!(cache.resolved(&ReadKey::TotalSupply), Some(&supply(2)));
    }

    #[test]
    fn test_failed_read_records_error() {
        let mut cache = ReadCache::new();
        let key = ReadKey::Rewards(TokenId::new(0));
        let ticket = cache.request(key).unwrap();
        cache.resolve(ticket, Err("execution reverted".into()));
        assert_eq!(cache.error(&key), Some("execution reverted"));
        assert!(cache.request(key).is_none());
    }

    #[test]
    fn test_invalidate_all_covers_tracked_keys() {
        let mut cache = ReadCache::new();
        cache.seed(ReadKey::TotalSupply, supply(1));
        cache.seed(ReadKey::Approved(TokenId::new(0)), ReadValue::Address(Default::default()));
        assert_eq!(cache.invalidate_all().len(), 2);
    }
}
