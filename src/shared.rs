//! Thread-safe flyweight pool.
//!
//! Lookup-or-create happens through the map's entry API, so the whole
//! insert-if-absent sequence runs under one shard lock. Racing first
//! requests for a key still construct exactly one flyweight.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::config::PoolConfig;
use crate::error::Result;
use crate::flyweight::{Construct, Flyweight, FlyweightKey};
use crate::pool::PoolStats;

pub struct SharedFlyweightPool<F> {
    flyweights: DashMap<FlyweightKey, Arc<F>>,
    requests: AtomicUsize,
    created: AtomicUsize,
    config: PoolConfig,
}

impl<F: Flyweight> SharedFlyweightPool<F> {
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    pub fn with_config(config: PoolConfig) -> Self {
        SharedFlyweightPool {
            flyweights: DashMap::with_capacity(config.initial_capacity),
            requests: AtomicUsize::new(0),
            created: AtomicUsize::new(0),
            config,
        }
    }

    pub fn get(&self, key: &str) -> Arc<F> {
        self.requests.fetch_add(1, Ordering::Relaxed);

        // Read-locked fast path; the shard lock is released before `entry`.
        if let Some(existing) = self.flyweights.get(key) {
            trace!(key, "reusing flyweight");
            return Arc::clone(existing.value());
        }

        match self.flyweights.entry(FlyweightKey::new(key)) {
            // Another thread won the race between the fast path and here.
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                let flyweight = Arc::new(F::from_key(key, Construct::new()));
                entry.insert(Arc::clone(&flyweight));
                let created = self.created.fetch_add(1, Ordering::Relaxed) + 1;
                debug!(key, created, "created flyweight");
                flyweight
            }
        }
    }

    pub fn try_get(&self, key: &str) -> Result<Arc<F>> {
        if let Err(err) = self.config.key_policy.validate(key) {
            warn!(key, error = %err, "rejected flyweight key");
            return Err(err);
        }
        Ok(self.get(key))
    }

    pub fn count(&self) -> usize {
        self.created.load(Ordering::Relaxed)
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.flyweights.contains_key(key)
    }

    /// Snapshot of the pooled keys, in no particular order.
    pub fn keys(&self) -> Vec<FlyweightKey> {
        self.flyweights
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats::new(self.requests(), self.count())
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }
}

impl<F: Flyweight> Default for SharedFlyweightPool<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for SharedFlyweightPool<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedFlyweightPool")
            .field("count", &self.created.load(Ordering::Relaxed))
            .field("requests", &self.requests.load(Ordering::Relaxed))
            .field("config", &self.config)
            .finish()
    }
}
