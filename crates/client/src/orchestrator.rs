//! Cache-first orchestration of page and form analysis.
//!
//! Page analysis is best-effort: it runs unsolicited on navigation, so
//! [`Orchestrator::analyze`] turns every failure into an empty result.
//! Form analysis runs after the user opted in and reports every failure.
//!
//! The analyzed marker is a fast path that is checked before the page
//! entry. It can outlive the `coupons` entry it reads from; in that window
//! the fast path answers with an empty list without calling the service.

use std::sync::Arc;

use dealscout_core::{
    CacheKind, Coupon, DomainCoupons, Error, FormAnalysis, PageAnalysis, Scope, TtlCache, derive_scope,
};

use crate::service::AnalysisService;

/// Answers page and form analysis from the cache or the analysis service.
///
/// Cloning is cheap; clones share the cache and the service.
#[derive(Clone)]
pub struct Orchestrator {
    cache: TtlCache,
    service: Arc<dyn AnalysisService>,
}

impl Orchestrator {
    pub fn new(cache: TtlCache, service: Arc<dyn AnalysisService>) -> Self {
        Self { cache, service }
    }

    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    /// Page analysis with empty-on-failure as the documented default.
    ///
    /// Invalid URLs, service failures and cache failures all yield an empty
    /// coupon list; no error escapes.
    pub async fn analyze(&self, url: &str) -> PageAnalysis {
        match self.try_analyze(url).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(url, error = %e, "page analysis failed; returning no coupons");
                PageAnalysis::default()
            }
        }
    }

    /// Page analysis, reporting failures.
    ///
    /// Nothing is written to the cache and no marker is set unless the
    /// service call succeeds.
    pub async fn try_analyze(&self, url: &str) -> Result<PageAnalysis, Error> {
        let scope = derive_scope(url)?;

        if self.cache.is_analyzed(&scope) {
            tracing::debug!(%scope, "scope already analyzed; skipping service call");
            let coupons = self.cached_coupons(&scope).await?.unwrap_or_default();
            return Ok(PageAnalysis { coupons });
        }

        if let Some(entry) = self.cache.get::<PageAnalysis>(CacheKind::Page, &scope).await? {
            self.cache.mark_analyzed(&scope);
            return Ok(entry.value);
        }

        let analysis = self.service.analyze_page(url).await?;
        tracing::info!(%scope, coupons = analysis.coupons.len(), "page analyzed");

        match self.store_page(&scope, url, &analysis).await {
            Ok(()) => self.cache.mark_analyzed(&scope),
            Err(e) => tracing::warn!(%scope, error = %e, "failed to cache page analysis"),
        }

        Ok(analysis)
    }

    async fn store_page(&self, scope: &Scope, url: &str, analysis: &PageAnalysis) -> Result<(), Error> {
        self.cache.set(CacheKind::Page, scope, analysis).await?;
        if !analysis.is_empty() {
            let coupons = DomainCoupons { coupons: analysis.coupons.clone(), url: url.to_string() };
            self.cache.set(CacheKind::Coupons, scope, &coupons).await?;
        }
        Ok(())
    }

    /// Form analysis for an HTML snapshot of the page at `url`.
    ///
    /// Form results are cached per scope, not per snapshot.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentifier` if `url` has no usable host
    /// - `InvalidInput` if `html` is blank
    /// - `Network` if the service call fails
    /// - `Validation` if the answer lacks either locator; nothing is cached
    pub async fn analyze_form(&self, html: &str, url: &str) -> Result<FormAnalysis, Error> {
        let scope = derive_scope(url)?;

        if html.trim().is_empty() {
            return Err(Error::InvalidInput("html cannot be empty".into()));
        }

        if let Some(entry) = self.cache.get::<FormAnalysis>(CacheKind::Form, &scope).await? {
            return Ok(entry.value);
        }

        let analysis = self.service.analyze_form(html).await?;
        tracing::info!(%scope, "form analyzed");

        if let Err(e) = self.cache.set(CacheKind::Form, &scope, &analysis).await {
            tracing::warn!(%scope, error = %e, "failed to cache form analysis");
        }

        Ok(analysis)
    }

    /// Coupons last found for the scope of `url`, for display.
    pub async fn domain_coupons(&self, url: &str) -> Result<Option<Vec<Coupon>>, Error> {
        let scope = derive_scope(url)?;
        self.cached_coupons(&scope).await
    }

    async fn cached_coupons(&self, scope: &Scope) -> Result<Option<Vec<Coupon>>, Error> {
        let entry = self.cache.get::<DomainCoupons>(CacheKind::Coupons, scope).await?;
        Ok(entry.map(|e| e.value.coupons))
    }

    /// Drop every cached result and the analyzed marker for the scope of `url`.
    pub async fn clear(&self, url: &str) -> Result<u64, Error> {
        let scope = derive_scope(url)?;
        self.cache.clear(&scope).await
    }

    pub async fn purge_expired(&self) -> Result<u64, Error> {
        self.cache.purge_expired().await
    }
}
