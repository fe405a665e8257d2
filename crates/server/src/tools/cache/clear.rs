//! cache_clear tool implementation.
//!
//! Drops every cached result and the analyzed marker for one host.

use dealscout_client::Orchestrator;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_clear tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearParams {
    /// Any URL on the host to clear.
    pub url: String,
}

/// Output from the cache_clear tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

pub async fn clear_impl(orchestrator: &Orchestrator, params: CacheClearParams) -> Result<CallToolResult, McpError> {
    let deleted = orchestrator.clear(&params.url).await?;
    json_result(&CacheClearOutput { deleted })
}
