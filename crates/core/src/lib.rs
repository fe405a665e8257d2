//! Core types and shared functionality for dealscout.
//!
//! This crate provides:
//! - Scope derivation from page URLs
//! - TTL cache with SQLite backend and analyzed markers
//! - In-flight deduplication and signature-keyed debouncing
//! - Analysis payload types, unified error types and configuration

pub mod analysis;
pub mod cache;
pub mod clock;
pub mod config;
pub mod debounce;
pub mod error;
pub mod inflight;
pub mod scope;

pub use analysis::{Coupon, DomainCoupons, FormAnalysis, FormFields, Locator, PageAnalysis};
pub use cache::{CacheDb, CacheEntry, TtlCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use debounce::{DebounceHandle, Debouncer};
pub use error::Error;
pub use inflight::{InFlightGuard, InFlightRegistry};
pub use scope::{CacheKind, Scope, derive_scope};
