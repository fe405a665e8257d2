//! analyze_page tool implementation.
//!
//! Cache-first coupon lookup for a page URL. Unlike the navigation trigger,
//! failures are reported to the caller instead of degrading to no coupons.

use dealscout_client::Orchestrator;
use dealscout_core::{Coupon, derive_scope};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for the analyze_page tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzePageParams {
    /// The page URL to analyze.
    pub url: String,
}

/// Output from the analyze_page tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzePageOutput {
    pub url: String,
    /// Normalized host the result is cached under.
    pub scope: String,
    pub coupons: Vec<Coupon>,
}

pub async fn analyze_page_impl(
    orchestrator: &Orchestrator, params: AnalyzePageParams,
) -> Result<CallToolResult, McpError> {
    let scope = derive_scope(&params.url)?;
    let analysis = orchestrator.try_analyze(&params.url).await?;

    json_result(&AnalyzePageOutput { url: params.url, scope: scope.to_string(), coupons: analysis.coupons })
}
