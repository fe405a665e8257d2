//! Notifier that reports triggered results in the log stream.

use dealscout_client::CouponNotifier;
use dealscout_core::{Coupon, Error, FormAnalysis};

#[derive(Debug, Default)]
pub struct TracingNotifier;

impl CouponNotifier for TracingNotifier {
    fn coupons_found(&self, url: &str, coupons: &[Coupon]) {
        let codes: Vec<&str> = coupons.iter().map(|c| c.code.as_str()).collect();
        tracing::info!(url, count = coupons.len(), codes = ?codes, "coupons available");
    }

    fn form_analyzed(&self, url: &str, result: &Result<FormAnalysis, Error>) {
        match result {
            Ok(analysis) => tracing::info!(
                url,
                coupon_input = %analysis.form_fields.coupon_input.css_path,
                apply_button = %analysis.form_fields.apply_button.css_path,
                "coupon form located"
            ),
            Err(e) => tracing::warn!(url, error = %e, "coupon form not located"),
        }
    }
}
