//! In-memory TTL caches for upstream recipe data.
//!
//! Freshness is judged lazily on read; nothing is ever expired in the
//! background. Stale entries stay readable so callers can fall back to them.

use crate::recipes::models::Recipe;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// A cached payload and the moment it was stored.
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub payload: Arc<T>,
    pub stored_at: Instant,
}

impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            payload: self.payload.clone(),
            stored_at: self.stored_at,
        }
    }
}

impl<T> CacheEntry<T> {
    fn new(payload: T) -> Self {
        Self {
            payload: Arc::new(payload),
            stored_at: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.stored_at.elapsed()
    }

    /// `true` while the entry is younger than `ttl`.
    pub fn is_fresh(&self, ttl: Duration) -> bool {
        self.age() < ttl
    }
}

/// Recipe id → normalized recipe.
///
/// Unbounded unless a capacity is given, in which case inserting a new key
/// into a full cache evicts the entry with the oldest `stored_at`.
pub struct RecipeCache {
    entries: DashMap<String, CacheEntry<Recipe>>,
    capacity: Option<usize>,
}

impl RecipeCache {
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.filter(|&c| c > 0),
        }
    }

    /// The entry for `key`, fresh or not.
    pub fn get(&self, key: &str) -> Option<CacheEntry<Recipe>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Store `recipe` under `key`, replacing any existing entry.
    pub fn set(&self, key: String, recipe: Recipe) -> Arc<Recipe> {
        if !self.entries.contains_key(&key) {
            self.make_room();
        }
        let entry = CacheEntry::new(recipe);
        let payload = entry.payload.clone();
        self.entries.insert(key, entry);
        payload
    }

    /// Store `recipe` only if nothing is cached under `key` yet.
    /// Returns whether the recipe was inserted.
    pub fn set_if_absent(&self, key: String, recipe: Recipe) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.make_room();
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(CacheEntry::new(recipe));
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Must not be called while holding a guard into `entries`.
    fn make_room(&self) {
        let Some(capacity) = self.capacity else {
            return;
        };
        while self.entries.len() >= capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.value().stored_at)
                .map(|entry| entry.key().clone());
            let Some(key) = oldest else {
                return;
            };
            self.entries.remove(&key);
            debug!(recipe_id = %key, "evicted oldest cached recipe");
        }
    }
}

/// A single cached value, e.g. the current popular-recipes batch.
pub struct CacheSlot<T> {
    entry: RwLock<Option<CacheEntry<T>>>,
}

impl<T> Default for CacheSlot<T> {
    fn default() -> Self {
        Self {
            entry: RwLock::new(None),
        }
    }
}

impl<T> CacheSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored entry, fresh or not.
    pub async fn get(&self) -> Option<CacheEntry<T>> {
        self.entry.read().await.clone()
    }

    /// Replace the slot's content, returning the stored payload.
    pub async fn set(&self, payload: T) -> Arc<T> {
        let entry = CacheEntry::new(payload);
        let stored = entry.payload.clone();
        *self.entry.write().await = Some(entry);
        stored
    }
}
