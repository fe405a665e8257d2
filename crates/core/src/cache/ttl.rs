//! Kind-namespaced TTL cache over the persistent store.
//!
//! Entries expire on read: `get` returns an entry only while
//! `now - stored_at < ttl` and deletes it otherwise. Nothing sweeps the
//! store in the background; `purge_expired` is an explicit call.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::connection::CacheDb;
use super::entries::Lookup;
use super::markers::AnalyzedMarkers;
use crate::Error;
use crate::clock::{Clock, SystemClock};
use crate::scope::{CacheKind, Scope};

/// Default entry lifetime in seconds (24 hours).
pub const DEFAULT_TTL_SECS: i64 = 86_400;

/// A decoded cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<T> {
    pub value: T,
    pub stored_at: DateTime<Utc>,
}

/// Persistent TTL cache plus the in-memory analyzed markers.
///
/// Cloning is cheap; clones share the store and the markers.
#[derive(Debug, Clone)]
pub struct TtlCache {
    db: CacheDb,
    markers: Arc<AnalyzedMarkers>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl TtlCache {
    pub fn new(db: CacheDb, ttl: Duration) -> Self {
        Self::with_clock(db, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(db: CacheDb, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { db, markers: Arc::new(AnalyzedMarkers::new()), clock, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Read a fresh entry.
    ///
    /// An expired entry is deleted and reported absent; evicting it also
    /// drops the scope's analyzed marker. A row that no longer decodes as
    /// `T` is deleted and reported absent.
    pub async fn get<T: DeserializeOwned>(&self, kind: CacheKind, scope: &Scope) -> Result<Option<CacheEntry<T>>, Error> {
        let now = self.clock.now();
        match self.db.lookup_entry(kind, scope, now, self.ttl).await? {
            Lookup::Fresh(entry) => match serde_json::from_str::<T>(&entry.value_json) {
                Ok(value) => {
                    tracing::debug!(%kind, %scope, "cache hit");
                    Ok(Some(CacheEntry { value, stored_at: entry.stored_at }))
                }
                Err(e) => {
                    tracing::warn!(%kind, %scope, error = %e, "dropping undecodable cache entry");
                    self.db.remove_entry(kind, scope).await?;
                    Ok(None)
                }
            },
            Lookup::Evicted => {
                tracing::debug!(%kind, %scope, "cache entry expired");
                self.markers.clear(scope);
                Ok(None)
            }
            Lookup::Missing => {
                tracing::debug!(%kind, %scope, "cache miss");
                Ok(None)
            }
        }
    }

    /// Store `value` stamped with the current time, replacing any entry.
    pub async fn set<T: Serialize>(&self, kind: CacheKind, scope: &Scope, value: &T) -> Result<(), Error> {
        let value_json = serde_json::to_string(value)?;
        self.db.put_entry(kind, scope, value_json, self.clock.now()).await
    }

    /// Remove every kind's entry for a scope and its analyzed marker.
    ///
    /// Returns the number of deleted entries.
    pub async fn clear(&self, scope: &Scope) -> Result<u64, Error> {
        let deleted = self.db.remove_scope(scope).await?;
        self.markers.clear(scope);
        tracing::info!(%scope, deleted, "cleared cache for scope");
        Ok(deleted)
    }

    /// Delete every stale entry and expired marker in one sweep.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired(&self) -> Result<u64, Error> {
        let now = self.clock.now();
        let deleted = self.db.purge_entries_before(now - self.ttl).await?;
        let markers = self.markers.purge_expired(now, self.ttl);
        tracing::debug!(deleted, markers, "purged expired cache entries");
        Ok(deleted)
    }

    /// Number of stored entries, including stale ones not yet evicted.
    pub async fn len(&self) -> Result<u64, Error> {
        self.db.entry_count().await
    }

    pub async fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.len().await? == 0)
    }

    /// Number of analyzed markers held in memory, live or not yet swept.
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn mark_analyzed(&self, scope: &Scope) {
        self.markers.mark(scope, self.clock.now());
    }

    pub fn is_analyzed(&self, scope: &Scope) -> bool {
        self.markers.is_marked(scope, self.clock.now(), self.ttl)
    }
}
