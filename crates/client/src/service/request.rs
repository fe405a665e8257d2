//! Request bodies for the analysis service.

use serde::Serialize;

/// Body of `POST /analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest<'a> {
    /// Page URL to look up coupons for.
    pub url: &'a str,
}

/// Body of `POST /analyze_form`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeFormRequest<'a> {
    /// HTML snapshot of the checkout page.
    pub html_page: &'a str,
}
