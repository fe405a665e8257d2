//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use crate::tools::{
    analyze_form::{AnalyzeFormParams, analyze_form_impl},
    analyze_page::{AnalyzePageParams, analyze_page_impl},
    cache::{CacheClearParams, CachePurgeParams, clear_impl, purge_impl},
    domain_coupons::{DomainCouponsParams, domain_coupons_impl},
    triggers::{FormReadyParams, PageLoadedParams, form_ready_impl, page_loaded_impl},
};

use dealscout_client::{AnalysisTriggers, Orchestrator};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for dealscout.
#[derive(Clone)]
pub struct DealScoutServer {
    orchestrator: Orchestrator,
    triggers: AnalysisTriggers,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl DealScoutServer {
    /// Create a new server handler.
    pub fn new(orchestrator: Orchestrator, triggers: AnalysisTriggers) -> Self {
        Self { orchestrator, triggers, tool_router: Self::tool_router() }
    }

    #[tool(description = "Find coupons for a shopping page. Answers from the per-host cache when possible.")]
    async fn analyze_page(&self, params: Parameters<AnalyzePageParams>) -> Result<CallToolResult, McpError> {
        analyze_page_impl(&self.orchestrator, params.0).await
    }

    #[tool(description = "Locate the coupon input and apply button in an HTML snapshot of a checkout page.")]
    async fn analyze_form(&self, params: Parameters<AnalyzeFormParams>) -> Result<CallToolResult, McpError> {
        analyze_form_impl(&self.orchestrator, params.0).await
    }

    #[tool(description = "Coupons last found for the host of a URL. Never calls the analysis service.")]
    async fn domain_coupons(&self, params: Parameters<DomainCouponsParams>) -> Result<CallToolResult, McpError> {
        domain_coupons_impl(&self.orchestrator, params.0).await
    }

    #[tool(description = "Forget every cached result for the host of a URL.")]
    async fn cache_clear(&self, params: Parameters<CacheClearParams>) -> Result<CallToolResult, McpError> {
        clear_impl(&self.orchestrator, params.0).await
    }

    #[tool(description = "Delete every cache entry older than the configured TTL.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.orchestrator, params.0).await
    }

    /// Navigation events arrive in bursts; only the last one per host fires.
    #[tool(description = "Report a completed page load. Shopping pages are analyzed after a quiet period.")]
    async fn page_loaded(&self, params: Parameters<PageLoadedParams>) -> Result<CallToolResult, McpError> {
        page_loaded_impl(&self.triggers, params.0)
    }

    #[tool(description = "Report that a page is ready for coupon entry. The form is analyzed after a quiet period.")]
    async fn form_ready(&self, params: Parameters<FormReadyParams>) -> Result<CallToolResult, McpError> {
        form_ready_impl(&self.triggers, params.0)
    }
}

impl ServerHandler for DealScoutServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "dealscout".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{orchestrator, triggers};

    #[tokio::test]
    async fn test_all_tools_listed() {
        let orchestrator = orchestrator("http://127.0.0.1:9").await;
        let server = DealScoutServer::new(orchestrator.clone(), triggers(orchestrator));

        let mut names: Vec<String> = server.tool_router.list_all().into_iter().map(|t| t.name.to_string()).collect();
        names.sort();
        assert_eq!(
            names,
            [
                "analyze_form",
                "analyze_page",
                "cache_clear",
                "cache_purge",
                "domain_coupons",
                "form_ready",
                "page_loaded"
            ]
        );
    }

    #[tokio::test]
    async fn test_server_info() {
        let orchestrator = orchestrator("http://127.0.0.1:9").await;
        let server = DealScoutServer::new(orchestrator.clone(), triggers(orchestrator));
        assert_eq!(server.get_info().server_info.name, "dealscout");
    }
}
