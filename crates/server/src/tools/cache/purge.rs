//! cache_purge tool implementation.
//!
//! Deletes every entry older than the cache TTL.

use dealscout_client::Orchestrator;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tools::json_result;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
    /// Entries left in the cache.
    pub remaining: u64,
}

pub async fn purge_impl(orchestrator: &Orchestrator, _params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let deleted = orchestrator.purge_expired().await?;
    let remaining = orchestrator.cache().len().await?;
    json_result(&CachePurgeOutput { deleted, remaining })
}
