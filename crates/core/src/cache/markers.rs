//! "Recently analyzed" markers.
//!
//! A marker lets page analysis skip the network for a scope even when no
//! page entry was persisted. Markers live in memory only and expire lazily
//! on read, like cache entries.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration, Utc};

use crate::scope::Scope;

#[derive(Debug, Default)]
pub struct AnalyzedMarkers {
    marks: Mutex<HashMap<Scope, DateTime<Utc>>>,
}

impl AnalyzedMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    fn marks(&self) -> MutexGuard<'_, HashMap<Scope, DateTime<Utc>>> {
        self.marks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set (or refresh) the marker for a scope.
    pub fn mark(&self, scope: &Scope, at: DateTime<Utc>) {
        self.marks().insert(scope.clone(), at);
    }

    /// Whether a live marker exists; an expired one is dropped.
    pub fn is_marked(&self, scope: &Scope, now: DateTime<Utc>, ttl: Duration) -> bool {
        let mut marks = self.marks();
        match marks.get(scope) {
            Some(at) if now - *at < ttl => true,
            Some(_) => {
                marks.remove(scope);
                false
            }
            None => false,
        }
    }

    /// Drop the marker for a scope. Returns whether one existed.
    pub fn clear(&self, scope: &Scope) -> bool {
        self.marks().remove(scope).is_some()
    }

    /// Drop every expired marker. Returns how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>, ttl: Duration) -> usize {
        let mut marks = self.marks();
        let before = marks.len();
        marks.retain(|_, at| now - *at < ttl);
        before - marks.len()
    }

    pub fn len(&self) -> usize {
        self.marks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks().is_empty()
    }
}
