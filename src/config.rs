use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{FlyweightError, Result};

/// What a pool does with keys handed to `try_get`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyPolicy {
    /// Every key is valid, including the empty string.
    #[default]
    Permissive,
    /// Empty and whitespace-only keys are refused.
    RejectBlank,
}

impl KeyPolicy {
    pub fn validate(&self, key: &str) -> Result<()> {
        match self {
            KeyPolicy::Permissive => Ok(()),
            KeyPolicy::RejectBlank if key.is_empty() => {
                Err(FlyweightError::invalid_key(key, "key is empty"))
            }
            KeyPolicy::RejectBlank if key.trim().is_empty() => {
                Err(FlyweightError::invalid_key(key, "key is only whitespace"))
            }
            KeyPolicy::RejectBlank => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Slots reserved up front. The pool still grows without bound.
    pub initial_capacity: usize,
    pub key_policy: KeyPolicy,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            initial_capacity: 16,
            key_policy: KeyPolicy::Permissive,
        }
    }
}

impl PoolConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| FlyweightError::config_read(path, err))?;
        Self::from_toml_str(&content)
    }

    pub fn with_key_policy(mut self, policy: KeyPolicy) -> Self {
        self.key_policy = policy;
        self
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
