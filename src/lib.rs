//! # Flyweight Pool
//!
//! Shares one immutable instance per key among many logical owners.
//!
//! - [`FlyweightPool`]: single-threaded, `&mut self` lookups
//! - [`SharedFlyweightPool`]: the same contract behind `&self`, safe to share
//!   between threads
//! - [`Flyweight`]: what a pooled type must provide
//! - [`CoffeeFlavor`] / [`OrderContext`]: the coffee-shop flyweight
//!
//! ```
//! use flyweight_pool::{CoffeeFlavor, FlyweightPool, OrderContext};
//!
//! let mut pool: FlyweightPool<CoffeeFlavor> = FlyweightPool::new();
//! let first = pool.get("Cappuccino");
//! let again = pool.get("Cappuccino");
//!
//! assert!(std::sync::Arc::ptr_eq(&first, &again));
//! assert_eq!(pool.count(), 1);
//! assert_eq!(
//!     first.serve_coffee(&OrderContext::new(2)),
//!     "Serving Coffee flavor Cappuccino to table number 2"
//! );
//! ```
//!
//! Pools never evict. Every distinct key stays resident until the pool is
//! dropped.

pub mod coffee;
pub mod config;
pub mod error;
pub mod flyweight;
pub mod logging;
pub mod pool;
pub mod shared;

pub use coffee::{CoffeeFlavor, OrderContext};
pub use config::{KeyPolicy, PoolConfig};
pub use error::{FlyweightError, Result};
pub use flyweight::{Construct, Flyweight, FlyweightKey};
pub use pool::{FlyweightPool, PoolStats};
pub use shared::SharedFlyweightPool;
