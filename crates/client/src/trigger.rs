//! Navigation and form-ready triggers.
//!
//! Page loads are debounced per scope (signature `page:{scope}`) and form
//! snapshots per scope and content hash (signature `form:{scope}:{hash}`), so
//! identical markup on two hosts never shares a timer. When a timer fires,
//! the task claims an in-flight slot for the same key and gives up if the
//! slot is taken; the slot is released when the analysis finishes, whatever
//! its outcome.

use std::sync::Arc;
use std::time::Duration;

use dealscout_core::cache::content_signature;
use dealscout_core::{
    AppConfig, Coupon, DebounceHandle, Debouncer, Error, FormAnalysis, InFlightRegistry, Scope, derive_scope,
};

use crate::orchestrator::Orchestrator;
use crate::pages::{is_ecommerce_url, offers_coupon_entry};

/// Receives the outcome of triggered analyses.
pub trait CouponNotifier: Send + Sync {
    /// Coupons were found for a checkout or cart page.
    fn coupons_found(&self, url: &str, coupons: &[Coupon]);

    /// A debounced form analysis finished.
    fn form_analyzed(&self, url: &str, result: &Result<FormAnalysis, Error>);
}

#[derive(Debug, Clone, Copy)]
pub struct TriggerConfig {
    /// Quiet period before a trigger fires (default: 1s).
    pub delay: Duration,
    /// Leading HTML characters hashed into a form signature (default: 1000).
    pub signature_chars: usize,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self { delay: Duration::from_millis(1_000), signature_chars: 1_000 }
    }
}

impl From<&AppConfig> for TriggerConfig {
    fn from(config: &AppConfig) -> Self {
        Self { delay: config.debounce(), signature_chars: config.signature_chars }
    }
}

/// Debounced, deduplicated entry points for unsolicited analysis.
#[derive(Clone)]
pub struct AnalysisTriggers {
    orchestrator: Orchestrator,
    notifier: Arc<dyn CouponNotifier>,
    debouncer: Debouncer,
    pages_in_flight: InFlightRegistry,
    forms_in_flight: InFlightRegistry,
    config: TriggerConfig,
}

impl AnalysisTriggers {
    pub fn new(orchestrator: Orchestrator, notifier: Arc<dyn CouponNotifier>, config: TriggerConfig) -> Self {
        Self {
            orchestrator,
            notifier,
            debouncer: Debouncer::new(),
            pages_in_flight: InFlightRegistry::new(),
            forms_in_flight: InFlightRegistry::new(),
            config,
        }
    }

    /// React to a completed navigation.
    ///
    /// Returns `None` when the URL is not a shopping page or has no usable
    /// host; otherwise the handle of the (re)armed timer.
    pub fn on_page_loaded(&self, url: &str) -> Option<DebounceHandle> {
        if !is_ecommerce_url(url) {
            tracing::trace!(url, "ignoring non-shopping page");
            return None;
        }

        let scope = match derive_scope(url) {
            Ok(scope) => scope,
            Err(e) => {
                tracing::debug!(url, error = %e, "ignoring navigation");
                return None;
            }
        };

        let this = self.clone();
        let url = url.to_string();
        let signature = format!("page:{scope}");
        Some(self.debouncer.schedule(signature, self.config.delay, async move {
            this.run_page_analysis(&scope, &url).await;
        }))
    }

    async fn run_page_analysis(&self, scope: &Scope, url: &str) {
        let Some(guard) = self.pages_in_flight.acquire(scope.as_str()) else {
            return;
        };
        let analysis = self.orchestrator.analyze(url).await;
        drop(guard);

        if !analysis.is_empty() && offers_coupon_entry(url) {
            self.notifier.coupons_found(url, &analysis.coupons);
        }
    }

    /// React to the user asking for coupons to be applied on a page.
    ///
    /// # Errors
    ///
    /// Returns `InvalidIdentifier` if `url` has no usable host; nothing is
    /// scheduled in that case.
    pub fn on_form_ready(&self, url: &str, html: &str) -> Result<DebounceHandle, Error> {
        let scope = derive_scope(url)?;
        let hash = content_signature(html, self.config.signature_chars);
        let signature = format!("form:{scope}:{hash}");

        let this = self.clone();
        let key = signature.clone();
        let url = url.to_string();
        let html = html.to_string();
        Ok(self.debouncer.schedule(signature, self.config.delay, async move {
            this.run_form_analysis(key, &url, &html).await;
        }))
    }

    async fn run_form_analysis(&self, key: String, url: &str, html: &str) {
        let Some(guard) = self.forms_in_flight.acquire(key) else {
            return;
        };
        let result = self.orchestrator.analyze_form(html, url).await;
        drop(guard);

        if let Err(e) = &result {
            tracing::warn!(url, error = %e, "form analysis failed");
        }
        self.notifier.form_analyzed(url, &result);
    }

    pub fn is_page_in_flight(&self, scope: &Scope) -> bool {
        self.pages_in_flight.is_in_flight(scope.as_str())
    }

    pub fn pending_triggers(&self) -> usize {
        self.debouncer.pending_count()
    }
}
