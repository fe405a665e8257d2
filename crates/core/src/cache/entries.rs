//! Row-level operations on `cache_entries`.
//!
//! Values are stored as JSON text. Timestamps are fixed-width RFC 3339 with
//! nanoseconds, so lexical order in SQL matches chronological order.

use super::connection::CacheDb;
use crate::Error;
use crate::scope::{CacheKind, Scope};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A raw row as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub value_json: String,
    pub stored_at: DateTime<Utc>,
}

/// Outcome of a freshness-checked read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Fresh(StoredEntry),
    /// The row was stale (or unreadable) and has been deleted.
    Evicted,
    Missing,
}

pub(crate) fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

impl CacheDb {
    /// Read an entry, deleting it if `now - stored_at >= ttl`.
    ///
    /// The read, the freshness check and the delete happen in one database
    /// step, so no other cache operation can interleave with them.
    pub async fn lookup_entry(
        &self, kind: CacheKind, scope: &Scope, now: DateTime<Utc>, ttl: Duration,
    ) -> Result<Lookup, Error> {
        let key = kind.key(scope);
        self.conn
            .call(move |conn| -> Result<Lookup, Error> {
                let row = conn.query_row(
                    "SELECT value_json, stored_at FROM cache_entries WHERE cache_key = ?1",
                    params![key],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                );

                let (value_json, stored_at) = match row {
                    Ok(r) => r,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(Lookup::Missing),
                    Err(e) => return Err(e.into()),
                };

                let fresh = DateTime::parse_from_rfc3339(&stored_at)
                    .ok()
                    .map(|at| at.with_timezone(&Utc))
                    .filter(|at| now - *at < ttl);

                match fresh {
                    Some(stored_at) => Ok(Lookup::Fresh(StoredEntry { value_json, stored_at })),
                    None => {
                        conn.execute("DELETE FROM cache_entries WHERE cache_key = ?1", params![key])?;
                        Ok(Lookup::Evicted)
                    }
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or replace an entry.
    ///
    /// A single UPSERT statement; readers see either the old row or the new
    /// one, never a mix.
    pub async fn put_entry(
        &self, kind: CacheKind, scope: &Scope, value_json: String, stored_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        let key = kind.key(scope);
        let kind = kind.as_str();
        let scope = scope.as_str().to_string();
        let stored_at = format_timestamp(stored_at);

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO cache_entries (cache_key, kind, scope, value_json, stored_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(cache_key) DO UPDATE SET
                        value_json = excluded.value_json,
                        stored_at = excluded.stored_at",
                    params![key, kind, scope, value_json, stored_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete one entry. Returns whether a row existed.
    pub async fn remove_entry(&self, kind: CacheKind, scope: &Scope) -> Result<bool, Error> {
        let key = kind.key(scope);
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let count = conn.execute("DELETE FROM cache_entries WHERE cache_key = ?1", params![key])?;
                Ok(count > 0)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every entry of every known kind for a scope.
    ///
    /// Returns the number of deleted entries.
    pub async fn remove_scope(&self, scope: &Scope) -> Result<u64, Error> {
        let keys: Vec<String> = CacheKind::ALL.iter().map(|kind| kind.key(scope)).collect();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let tx = conn.transaction()?;
                let mut deleted = 0u64;
                for key in &keys {
                    deleted += tx.execute("DELETE FROM cache_entries WHERE cache_key = ?1", params![key])? as u64;
                }
                tx.commit()?;
                Ok(deleted)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every entry stored at or before `cutoff`.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_entries_before(&self, cutoff: DateTime<Utc>) -> Result<u64, Error> {
        let cutoff = format_timestamp(cutoff);
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM cache_entries WHERE stored_at <= ?1", params![cutoff])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of stored entries, fresh or not.
    pub async fn entry_count(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM cache_entries", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
