//! domain_coupons tool implementation.
//!
//! Reads the coupons last found for a host without calling the service.

use dealscout_client::Orchestrator;
use dealscout_core::Coupon;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for the domain_coupons tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DomainCouponsParams {
    /// Any URL on the host to look up.
    pub url: String,
}

/// Output from the domain_coupons tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DomainCouponsOutput {
    pub url: String,
    /// Whether a fresh entry exists for the host.
    pub cached: bool,
    pub coupons: Vec<Coupon>,
}

pub async fn domain_coupons_impl(
    orchestrator: &Orchestrator, params: DomainCouponsParams,
) -> Result<CallToolResult, McpError> {
    let found = orchestrator.domain_coupons(&params.url).await?;
    let output = DomainCouponsOutput { url: params.url, cached: found.is_some(), coupons: found.unwrap_or_default() };
    json_result(&output)
}
