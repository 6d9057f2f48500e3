//! Query result cache
//!
//! Results of read operations are stored under a [`QueryKey`]: a namespace
//! (`"politicians"`, `"statistics"`) plus the exact parameters of the query.
//! Mutations invalidate whole namespaces so the next read refetches.
//!
//! Every invalidation also advances the namespace's generation. A read
//! captures the generation before going to the network and stores its
//! result with [`QueryCache::insert_if_current`], so a response that was in
//! flight while a mutation landed never repopulates the cache.

use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::CacheConfig;

pub const POLITICIANS: &str = "politicians";
pub const STATISTICS: &str = "statistics";

/// Identity of a cached query. Two keys are equal iff namespace and every
/// parameter match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    pub namespace: String,
    pub params: BTreeMap<String, String>,
}

impl QueryKey {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(name.into(), value.to_string());
        self
    }

    /// Add a parameter only when present.
    pub fn with_opt(self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.with(name, v),
            None => self,
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.namespace)?;
        if !self.params.is_empty() {
            let parts: Vec<String> = self
                .params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, "{{{}}}", parts.join(","))?;
        }
        Ok(())
    }
}

#[derive(Clone)]
struct CacheEntry {
    value: Value,
    created_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.created_at.elapsed() > self.ttl
    }
}

/// Invalidation counters. `epoch` grows on every invalidation; a namespace's
/// generation is the epoch of its latest invalidation or of the latest
/// `clear`, whichever is later.
#[derive(Default)]
struct Generations {
    epoch: u64,
    cleared: u64,
    namespaces: HashMap<String, u64>,
}

impl Generations {
    fn of(&self, namespace: &str) -> u64 {
        self.namespaces
            .get(namespace)
            .copied()
            .unwrap_or(0)
            .max(self.cleared)
    }

    fn bump(&mut self, namespace: &str) {
        self.epoch += 1;
        self.namespaces.insert(namespace.to_string(), self.epoch);
    }

    fn bump_all(&mut self) {
        self.epoch += 1;
        self.cleared = self.epoch;
    }
}

/// Thread-safe query cache shared by the service layer.
pub struct QueryCache {
    entries: RwLock<HashMap<QueryKey, CacheEntry>>,
    generations: Mutex<Generations>,
    default_ttl: Duration,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_config(&CacheConfig::default())
    }

    pub fn with_config(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            generations: Mutex::new(Generations::default()),
            default_ttl: Duration::from_secs(config.ttl_secs),
            max_entries: config.max_entries.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            default_ttl: ttl,
            ..Self::new()
        }
    }

    /// Cached value for `key` if present, fresh and decodable as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let entries = self.entries.read();

        let found = entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(|entry| serde_json::from_value(entry.value.clone()).ok());

        if found.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
            debug!("cache hit: {}", key);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!("cache miss: {}", key);
        }
        found
    }

    pub fn insert<T: Serialize>(&self, key: QueryKey, value: &T) {
        self.insert_with_ttl(key, value, self.default_ttl);
    }

    pub fn insert_with_ttl<T: Serialize>(&self, key: QueryKey, value: &T, ttl: Duration) {
        self.store(key, value, ttl, None);
    }

    /// Current generation of `namespace`. Capture it before fetching.
    pub fn generation(&self, namespace: &str) -> u64 {
        self.generations.lock().of(namespace)
    }

    /// Store `value` only if `namespace` was not invalidated since
    /// `generation` was captured. Returns whether it was stored.
    pub fn insert_if_current<T: Serialize>(
        &self,
        key: QueryKey,
        value: &T,
        generation: u64,
    ) -> bool {
        self.store(key, value, self.default_ttl, Some(generation))
    }

    fn store<T: Serialize>(
        &self,
        key: QueryKey,
        value: &T,
        ttl: Duration,
        generation: Option<u64>,
    ) -> bool {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                warn!("Not caching {}: {}", key, e);
                return false;
            }
        };

        let entry = CacheEntry {
            value,
            created_at: Instant::now(),
            ttl,
        };

        // Invalidation holds the entries lock while bumping, so the check
        // and the insert cannot straddle one.
        let mut entries = self.entries.write();
        if let Some(expected) = generation {
            let current = self.generations.lock().of(&key.namespace);
            if current != expected {
                debug!("not caching {}: invalidated while in flight", key);
                return false;
            }
        }
        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            self.evict(&mut entries);
        }
        entries.insert(key, entry);
        true
    }

    /// Drop expired entries, then the oldest tenth if still full.
    fn evict(&self, entries: &mut HashMap<QueryKey, CacheEntry>) {
        entries.retain(|_, entry| !entry.is_expired());

        if entries.len() >= self.max_entries {
            let mut items: Vec<_> = entries
                .iter()
                .map(|(k, v)| (k.clone(), v.created_at))
                .collect();
            items.sort_by(|a, b| a.1.cmp(&b.1));

            let to_remove = (self.max_entries / 10).max(1);
            for (key, _) in items.iter().take(to_remove) {
                entries.remove(key);
            }
        }
    }

    pub fn invalidate(&self, key: &QueryKey) {
        let mut entries = self.entries.write();
        entries.remove(key);
    }

    /// Invalidate every entry whose key lives under `namespace`.
    pub fn invalidate_namespace(&self, namespace: &str) -> usize {
        let mut entries = self.entries.write();
        self.generations.lock().bump(namespace);
        let before = entries.len();
        entries.retain(|key, _| key.namespace != namespace);
        let removed = before - entries.len();
        debug!("invalidated {} '{}' entries", removed, namespace);
        removed
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write();
        self.generations.lock().bump_all();
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            max_entries: self.max_entries,
            default_ttl_secs: self.default_ttl.as_secs(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub max_entries: usize,
    pub default_ttl_secs: u64,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
