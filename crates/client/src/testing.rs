//! In-process analysis service for tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dealscout_core::{Coupon, Error, FormAnalysis, FormFields, Locator, PageAnalysis};

use crate::service::AnalysisService;

/// Canned answers with call counters.
#[derive(Debug)]
pub struct StubService {
    pub page: Mutex<Result<PageAnalysis, String>>,
    pub form: Mutex<Result<FormAnalysis, String>>,
    pub latency: Duration,
    pub page_calls: AtomicUsize,
    pub form_calls: AtomicUsize,
}

impl StubService {
    pub fn with_coupons(codes: &[&str]) -> Self {
        let coupons = codes.iter().map(|c| Coupon { code: c.to_string(), source: "x".into() }).collect();
        Self {
            page: Mutex::new(Ok(PageAnalysis { coupons })),
            form: Mutex::new(Ok(form_analysis("#promo", "#apply"))),
            latency: Duration::ZERO,
            page_calls: AtomicUsize::new(0),
            form_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn fail_pages(&self, msg: &str) {
        *self.page.lock().unwrap() = Err(msg.to_string());
    }

    pub fn fail_forms(&self, msg: &str) {
        *self.form.lock().unwrap() = Err(msg.to_string());
    }

    pub fn page_calls(&self) -> usize {
        self.page_calls.load(Ordering::SeqCst)
    }

    pub fn form_calls(&self) -> usize {
        self.form_calls.load(Ordering::SeqCst)
    }
}

pub fn form_analysis(input: &str, button: &str) -> FormAnalysis {
    FormAnalysis {
        form_fields: FormFields {
            coupon_input: Locator { css_path: input.into() },
            apply_button: Locator { css_path: button.into() },
        },
    }
}

#[async_trait]
impl AnalysisService for StubService {
    async fn analyze_page(&self, _url: &str) -> Result<PageAnalysis, Error> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.page.lock().unwrap().clone().map_err(Error::Network)
    }

    async fn analyze_form(&self, _html: &str) -> Result<FormAnalysis, Error> {
        self.form_calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.form.lock().unwrap().clone().map_err(Error::Validation)
    }
}
