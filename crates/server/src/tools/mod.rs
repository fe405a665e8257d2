//! MCP tool implementations.
//!
//! This module contains all tools exposed by the dealscout server.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

pub mod analyze_form;
pub mod analyze_page;
pub mod cache;
pub mod domain_coupons;
pub mod triggers;

/// Wrap a tool output as pretty-printed JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(dealscout_core::Error::from)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
