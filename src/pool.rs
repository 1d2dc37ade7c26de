//! Single-threaded flyweight pool.
//!
//! Entries are created on first request and live as long as the pool.
//! There is no eviction: this is a permanent memoization table, not a
//! bounded cache, so memory grows with the number of distinct keys.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace, warn};

use crate::config::PoolConfig;
use crate::error::Result;
use crate::flyweight::{Construct, Flyweight, FlyweightKey};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Lookups served, including the ones that created an entry.
    pub requests: usize,
    /// Distinct flyweights constructed.
    pub created: usize,
    pub reused: usize,
}

impl PoolStats {
    pub(crate) fn new(requests: usize, created: usize) -> Self {
        PoolStats {
            requests,
            created,
            reused: requests.saturating_sub(created),
        }
    }
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} requests served by {} flyweights ({} reused)",
            self.requests, self.created, self.reused
        )
    }
}

pub struct FlyweightPool<F> {
    flyweights: FxHashMap<FlyweightKey, Arc<F>>,
    requests: usize,
    config: PoolConfig,
}

impl<F: Flyweight> FlyweightPool<F> {
    pub fn new() -> Self {
        Self::with_config(PoolConfig::default())
    }

    pub fn with_config(config: PoolConfig) -> Self {
        FlyweightPool {
            flyweights: FxHashMap::with_capacity_and_hasher(
                config.initial_capacity,
                Default::default(),
            ),
            requests: 0,
            config,
        }
    }

    /// Returns the flyweight for `key`, building it on first request.
    ///
    /// Every handle returned for the same key points at the same instance.
    pub fn get(&mut self, key: &str) -> Arc<F> {
        self.requests += 1;

        if let Some(flyweight) = self.flyweights.get(key) {
            trace!(key, "reusing flyweight");
            return Arc::clone(flyweight);
        }

        let flyweight = Arc::new(F::from_key(key, Construct::new()));
        self.flyweights
            .insert(FlyweightKey::new(key), Arc::clone(&flyweight));
        debug!(key, created = self.flyweights.len(), "created flyweight");
        flyweight
    }

    /// Checks `key` against the configured [`KeyPolicy`](crate::KeyPolicy)
    /// before delegating to [`get`](Self::get). A rejected key leaves the
    /// pool untouched.
    pub fn try_get(&mut self, key: &str) -> Result<Arc<F>> {
        if let Err(err) = self.config.key_policy.validate(key) {
            warn!(key, error = %err, "rejected flyweight key");
            return Err(err);
        }
        Ok(self.get(key))
    }

    /// Number of flyweights constructed. Nothing is ever removed, so this
    /// is also the number of distinct keys seen.
    pub fn count(&self) -> usize {
        self.flyweights.len()
    }

    pub fn requests(&self) -> usize {
        self.requests
    }

    pub fn contains(&self, key: &str) -> bool {
        self.flyweights.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.flyweights.keys().map(FlyweightKey::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.flyweights.is_empty()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats::new(self.requests, self.count())
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }
}

impl<F: Flyweight> Default for FlyweightPool<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> fmt::Debug for FlyweightPool<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlyweightPool")
            .field("count", &self.flyweights.len())
            .field("requests", &self.requests)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coffee::{CoffeeFlavor, OrderContext, SAMPLE_ORDERS};
    use crate::config::KeyPolicy;
    use crate::error::FlyweightError;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_coffee_orders() {
        let mut pool: FlyweightPool<CoffeeFlavor> = FlyweightPool::new();
        let mut flavors = Vec::new();
        let mut tables = Vec::new();

        for (flavor, table) in SAMPLE_ORDERS {
            flavors.push(pool.get(flavor));
            tables.push(OrderContext::new(table));
        }

        for (i, (flavor, table)) in flavors.iter().zip(&tables).enumerate() {
            let expected = format!(
                "Serving Coffee flavor {} to table number {}",
                SAMPLE_ORDERS[i].0, SAMPLE_ORDERS[i].1
            );
            assert_eq!(flavor.serve_coffee(table), expected);
        }

        // 3 flyweights for 15 orders
        assert_eq!(pool.count(), 3);
        assert_eq!(pool.requests(), 15);
    }

    #[test]
    fn test_same_key_same_instance() {
        let mut pool: FlyweightPool<CoffeeFlavor> = FlyweightPool::new();
        let first = pool.get("Cappuccino");
        let second = pool.get("Cappuccino");
        let other = pool.get("Frappe");

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[test]
    fn test_count_increments_once_per_key() {
        let mut pool: FlyweightPool<CoffeeFlavor> = FlyweightPool::new();
        assert_eq!(pool.count(), 0);
        assert!(pool.is_empty());

        pool.get("Frappe");
        assert_eq!(pool.count(), 1);
        pool.get("Frappe");
        assert_eq!(pool.count(), 1);
        pool.get("Xpresso");
        assert_eq!(pool.count(), 2);
    }

    #[test]
    fn test_empty_key_is_valid() {
        let mut pool: FlyweightPool<CoffeeFlavor> = FlyweightPool::new();
        let blank = pool.get("");
        assert_eq!(blank.flavor(), "");
        assert_eq!(pool.count(), 1);
        assert!(pool.contains(""));
    }

    #[test]
    fn test_describe_ignores_previous_contexts() {
        let mut pool: FlyweightPool<CoffeeFlavor> = FlyweightPool::new();
        let flavor = pool.get("Xpresso");

        let before = flavor.describe(&OrderContext::new(3));
        flavor.describe(&OrderContext::new(897));
        flavor.describe(&OrderContext::new(1));
        let after = flavor.describe(&OrderContext::new(3));

        assert_eq!(before, after);
    }

    #[test]
    fn test_contains_does_not_count_as_request() {
        let mut pool: FlyweightPool<CoffeeFlavor> = FlyweightPool::new();
        assert!(!pool.contains("Frappe"));
        pool.get("Frappe");
        assert!(pool.contains("Frappe"));
        assert_eq!(pool.requests(), 1);
    }

    #[test]
    fn test_keys() {
        let mut pool: FlyweightPool<CoffeeFlavor> = FlyweightPool::new();
        for (flavor, _) in SAMPLE_ORDERS {
            pool.get(flavor);
        }

        let keys: HashSet<&str> = pool.keys().collect();
        let expected: HashSet<&str> = ["Cappuccino", "Frappe", "Xpresso"].into_iter().collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_stats() {
        let mut pool: FlyweightPool<CoffeeFlavor> = FlyweightPool::new();
        for (flavor, _) in SAMPLE_ORDERS {
            pool.get(flavor);
        }

        let stats = pool.stats();
        assert_eq!(stats, PoolStats { requests: 15, created: 3, reused: 12 });
        assert_eq!(stats.to_string(), "15 requests served by 3 flyweights (12 reused)");
    }

    #[test]
    fn test_try_get_permissive() {
        let mut pool: FlyweightPool<CoffeeFlavor> = FlyweightPool::new();
        assert!(pool.try_get("").is_ok());
        assert!(pool.try_get("  ").is_ok());
        assert_eq!(pool.count(), 2);
    }

    #[test]
    fn test_try_get_reject_blank() {
        let config = PoolConfig::default().with_key_policy(KeyPolicy::RejectBlank);
        let mut pool: FlyweightPool<CoffeeFlavor> = FlyweightPool::with_config(config);

        assert!(matches!(pool.try_get(""), Err(FlyweightError::InvalidKey { .. })));
        assert!(matches!(pool.try_get("  "), Err(FlyweightError::InvalidKey { .. })));
        assert_eq!(pool.stats(), PoolStats::default());

        let frappe = pool.try_get("Frappe").unwrap();
        assert!(Arc::ptr_eq(&frappe, &pool.get("Frappe")));
        assert_eq!(pool.count(), 1);
    }

    #[test]
    fn test_config_is_kept() {
        let config = PoolConfig::default()
            .with_initial_capacity(4)
            .with_key_policy(KeyPolicy::RejectBlank);
        let pool: FlyweightPool<CoffeeFlavor> = FlyweightPool::with_config(config.clone());
        assert_eq!(pool.config(), &config);

        let default_pool: FlyweightPool<CoffeeFlavor> = FlyweightPool::default();
        assert_eq!(default_pool.config(), &PoolConfig::default());
    }

    #[test]
    fn test_stats_serialize() {
        let stats = PoolStats::new(15, 3);
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json, serde_json::json!({ "requests": 15, "created": 3, "reused": 12 }));
    }

    proptest! {
        #[test]
        fn prop_created_equals_distinct_keys(keys in prop::collection::vec("[a-d]{0,2}", 0..60)) {
            let mut pool: FlyweightPool<CoffeeFlavor> = FlyweightPool::new();
            let mut last_count = 0;

            for key in &keys {
                let seen = pool.contains(key);
                pool.get(key);

                let expected = if seen { last_count } else { last_count + 1 };
                prop_assert_eq!(pool.count(), expected);
                last_count = pool.count();
            }

            let distinct: HashSet<&String> = keys.iter().collect();
            prop_assert_eq!(pool.count(), distinct.len());

            let stats = pool.stats();
            prop_assert_eq!(stats.requests, keys.len());
            prop_assert_eq!(stats.requests, stats.created + stats.reused);
        }

        #[test]
        fn prop_repeated_get_is_stable(key in ".{0,12}", repeats in 1usize..10) {
            let mut pool: FlyweightPool<CoffeeFlavor> = FlyweightPool::new();
            let first = pool.get(&key);

            for _ in 0..repeats {
                prop_assert!(Arc::ptr_eq(&first, &pool.get(&key)));
            }
            prop_assert_eq!(pool.count(), 1);
            prop_assert_eq!(first.flavor(), key.as_str());
        }
    }
}
