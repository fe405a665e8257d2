//! SQLite-backed TTL cache for analysis results.
//!
//! This module provides a persistent, kind-namespaced cache using SQLite
//! with async access via tokio-rusqlite. It supports:
//!
//! - `{kind}:{scope}` keys for page, form and coupon-list entries
//! - Expiry on read (lazy eviction) against an injectable clock
//! - In-memory "recently analyzed" markers per scope
//! - Automatic schema migrations and WAL mode

pub mod connection;
pub mod entries;
pub mod hash;
pub mod markers;
pub mod migrations;
pub mod ttl;

pub use crate::Error;

pub use connection::CacheDb;
pub use hash::content_signature;
pub use markers::AnalyzedMarkers;
pub use ttl::{CacheEntry, DEFAULT_TTL_SECS, TtlCache};
