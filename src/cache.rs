//! Bounded, TTL-expiring response cache for GET requests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::response::Response;

#[derive(Debug, Clone)]
struct CacheEntry {
    fingerprint: u64,
    expires_at: SystemTime,
    response: Arc<Response>,
}

/// Fingerprinted response store, most recent insert at the front.
///
/// Invariant: `len() <= max_entries()`. Entries leave when they expire, when
/// space is needed, or when the cache is dropped with its gateway. The cache
/// co-owns each stored response through its `Arc`; callers holding a cache
/// hit keep the response alive after eviction.
///
/// Not internally synchronized — concurrent use requires external
/// serialization, which `&mut self` enforces at compile time.
#[derive(Debug, Clone, Default)]
pub struct ResponseCache {
    max_entries: usize,
    entries: VecDeque<CacheEntry>,
}

impl ResponseCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            entries: VecDeque::new(),
        }
    }

    /// djb2 string hash over a resolved request URL.
    pub fn fingerprint_url(url: &str) -> u64 {
        url.bytes()
            .fold(5381u64, |hash, byte| hash.wrapping_mul(33).wrapping_add(u64::from(byte)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Release every entry's response handle.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Walk entries newest to oldest, pruning expired entries as they are
    /// encountered. A fingerprint match in a live entry returns a shared
    /// handle, short-circuiting the transport entirely.
    pub fn lookup(&mut self, fingerprint: u64) -> Option<Arc<Response>> {
        let now = SystemTime::now();
        let mut index = 0;
        while index < self.entries.len() {
            if self.entries[index].expires_at < now {
                self.entries.remove(index);
                continue;
            }
            if self.entries[index].fingerprint == fingerprint {
                return Some(Arc::clone(&self.entries[index].response));
            }
            index += 1;
        }
        None
    }

    /// Insert at the front with `expires_at = now + ttl`, evicting exactly
    /// one entry when at capacity. A zero-capacity cache silently skips the
    /// insert.
    pub fn insert(&mut self, fingerprint: u64, ttl: Duration, response: Arc<Response>) {
        if self.entries.len() >= self.max_entries {
            self.evict_one();
        }
        if self.entries.len() >= self.max_entries {
            return;
        }
        self.entries.push_front(CacheEntry {
            fingerprint,
            expires_at: SystemTime::now() + ttl,
            response,
        });
    }

    /// One eviction per over-capacity insert: the first expired entry found
    /// scanning newest to oldest, else the least recent insert (the tail).
    fn evict_one(&mut self) {
        let now = SystemTime::now();
        match self.entries.iter().position(|entry| entry.expires_at < now) {
            Some(index) => {
                self.entries.remove(index);
            }
            None => {
                self.entries.pop_back();
            }
        }
    }
}
