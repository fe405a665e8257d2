//! Advisory deduplication of concurrent operations.
//!
//! A caller that fails to acquire a key abandons its own attempt; it never
//! waits for, nor receives the result of, the operation already running.

use std::sync::Arc;

use dashmap::DashSet;

/// Set of keys whose operation is currently executing.
///
/// Cloning is cheap; clones share the same set.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    keys: Arc<DashSet<String>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `key` in flight. Returns false, changing nothing, if it already is.
    pub fn try_acquire(&self, key: &str) -> bool {
        self.keys.insert(key.to_string())
    }

    /// Unconditionally clear the in-flight mark for `key`.
    pub fn release(&self, key: &str) {
        self.keys.remove(key);
    }

    /// Acquire `key` for the lifetime of the returned guard.
    ///
    /// The guard releases on drop, so the mark is cleared on success, error
    /// and panic paths alike.
    pub fn acquire(&self, key: impl Into<String>) -> Option<InFlightGuard> {
        let key = key.into();
        if !self.try_acquire(&key) {
            tracing::debug!(key = %key, "operation already in flight");
            return None;
        }
        Some(InFlightGuard { registry: self.clone(), key })
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Holds one in-flight mark; releases it when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    registry: InFlightRegistry,
    key: String,
}

impl InFlightGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.registry.release(&self.key);
    }
}
