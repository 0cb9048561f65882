//! Name directory for numbered components.
//!
//! Each prefix (`"R"`, `"U"`, ...) has its own counter starting at 1; the
//! registry key is the prefix followed by the number, e.g. `"R2"`. Numbers
//! are never handed out twice until [`ComponentRegistry::clear`] resets the
//! whole registry.

use crate::error::{CircuitError, CircuitResult};
use crate::ComponentId;
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    counters: HashMap<String, u32>,
    entries: HashMap<String, ComponentId>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next number for `prefix` and record `id` under the key.
    ///
    /// Fails with [`CircuitError::DuplicateKey`] if the key is already taken
    /// (prefixes ending in digits can collide, `"R1"`+`1` vs `"R"`+`11`); the
    /// counter is left untouched in that case.
    pub fn register(&mut self, prefix: &str, id: ComponentId) -> CircuitResult<u32> {
        let number = self.counters.get(prefix).copied().unwrap_or(0) + 1;
        let key = format!("{prefix}{number}");
        if self.entries.contains_key(&key) {
            return Err(CircuitError::DuplicateKey(key));
        }
        self.counters.insert(prefix.to_string(), number);
        trace!(key = %key, id = id.value(), "registered component");
        self.entries.insert(key, id);
        Ok(number)
    }

    pub fn lookup(&self, key: &str) -> CircuitResult<ComponentId> {
        self.entries
            .get(key)
            .copied()
            .ok_or_else(|| CircuitError::NotFound(format!("component {key}")))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Last number handed out for `prefix` (0 if none).
    pub fn count(&self, prefix: &str) -> u32 {
        self.counters.get(prefix).copied().unwrap_or(0)
    }

    /// Registered keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forget every key and reset all counters.
    pub fn clear(&mut self) {
        self.counters.clear();
        self.entries.clear();
    }
}
