//! The flyweight interface and the key type that identifies shared state.
//!
//! A flyweight holds only intrinsic state, which must be derivable from its
//! key alone. Everything that varies per request arrives as a `Context`
//! argument and is never stored.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::config::KeyPolicy;
use crate::error::Result;

/// Permission to build a flyweight. Only the pools can mint one, so every
/// instance in existence came out of a pool lookup.
///
/// ```compile_fail
/// use flyweight_pool::{CoffeeFlavor, Construct, Flyweight};
///
/// let rogue = CoffeeFlavor::from_key("Frappe", Construct(()));
/// ```
#[derive(Debug)]
pub struct Construct(());

impl Construct {
    pub(crate) fn new() -> Self {
        Construct(())
    }
}

pub trait Flyweight {
    /// Extrinsic, per-call data supplied by the caller.
    type Context;

    /// Builds the intrinsic state for `key`. Called by the pools only.
    fn from_key(key: &str, token: Construct) -> Self;

    fn key(&self) -> &str;

    /// Combines intrinsic state with `context`. Must not mutate either.
    fn describe(&self, context: &Self::Context) -> String;
}

/// Immutable, cheaply clonable pool key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlyweightKey(Arc<str>);

impl FlyweightKey {
    /// Accepts any string, including the empty one.
    pub fn new(key: &str) -> Self {
        FlyweightKey(Arc::from(key))
    }

    /// Like [`FlyweightKey::new`], but rejects blank keys.
    pub fn strict(key: &str) -> Result<Self> {
        KeyPolicy::RejectBlank.validate(key)?;
        Ok(Self::new(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for FlyweightKey {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

// Lets the pools look entries up by `&str` without allocating a key.
impl Borrow<str> for FlyweightKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlyweightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
