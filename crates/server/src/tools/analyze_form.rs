//! analyze_form tool implementation.
//!
//! Locates the coupon input and apply button in an HTML snapshot.

use dealscout_client::Orchestrator;
use dealscout_core::FormAnalysis;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for the analyze_form tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeFormParams {
    /// URL of the page the snapshot was taken from.
    pub url: String,

    /// Serialized HTML of the page.
    pub html: String,
}

pub async fn analyze_form_impl(
    orchestrator: &Orchestrator, params: AnalyzeFormParams,
) -> Result<CallToolResult, McpError> {
    let analysis: FormAnalysis = orchestrator.analyze_form(&params.html, &params.url).await?;
    json_result(&analysis)
}
