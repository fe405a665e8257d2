//! Client side of dealscout.
//!
//! This crate talks to the coupon analysis service and puts the core cache,
//! dedup and debounce primitives in front of it.

pub mod orchestrator;
pub mod pages;
pub mod service;
pub mod trigger;

#[cfg(test)]
mod testing;

pub use orchestrator::Orchestrator;
pub use pages::{is_cart_page, is_checkout_page, is_ecommerce_url, offers_coupon_entry};
pub use service::{AnalysisService, HttpAnalysisService, ServiceConfig, ServiceError};
pub use trigger::{AnalysisTriggers, CouponNotifier, TriggerConfig};
