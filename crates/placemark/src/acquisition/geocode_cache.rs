//! Memo of reverse-geocode results keyed by rounded coordinates.

use crate::place::LatLon;
use lru::LruCache;
use std::num::NonZeroUsize;

/// How the cache bounds its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionPolicy {
    /// Never evict. Grows for the life of the run.
    Unbounded,
    /// Keep at most this many entries, dropping the least recently used.
    Lru(NonZeroUsize),
}

impl EvictionPolicy {
    /// `0` means unbounded.
    pub fn from_capacity(capacity: usize) -> Self {
        match NonZeroUsize::new(capacity) {
            Some(cap) => EvictionPolicy::Lru(cap),
            None => EvictionPolicy::Unbounded,
        }
    }
}

/// Owned geocode cache. Entries are written once and never updated.
pub struct GeocodeCache {
    entries: LruCache<String, String>,
    hits: u64,
    misses: u64,
}

impl GeocodeCache {
    pub fn new(policy: EvictionPolicy) -> Self {
        let entries = match policy {
            EvictionPolicy::Unbounded => LruCache::unbounded(),
            EvictionPolicy::Lru(cap) => LruCache::new(cap),
        };
        Self {
            entries,
            hits: 0,
            misses: 0,
        }
    }

    /// Look up the address for `point`, counting the hit or miss.
    pub fn get(&mut self, point: &LatLon) -> Option<String> {
        match self.entries.get(&point.cache_key()) {
            Some(address) => {
                self.hits += 1;
                Some(address.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store an address. An existing entry for the same key is kept.
    pub fn insert(&mut self, point: &LatLon, address: String) {
        let key = point.cache_key();
        if !self.entries.contains(&key) {
            self.entries.put(key, address);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
