//! page_loaded and form_ready tool implementations.
//!
//! Both only arm a debounced trigger and return at once. Results surface
//! through the server's notifier when the trigger fires.

use dealscout_client::AnalysisTriggers;
use dealscout_core::Error;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for the page_loaded tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageLoadedParams {
    /// URL of the page that finished loading.
    pub url: String,
}

/// Input parameters for the form_ready tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FormReadyParams {
    /// URL of the page the snapshot was taken from.
    pub url: String,

    /// Serialized HTML of the page.
    pub html: String,
}

/// Output from the trigger tools.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TriggerOutput {
    /// Whether a trigger was armed.
    pub scheduled: bool,
    /// Debounce signature of the armed trigger.
    pub signature: Option<String>,
}

pub fn page_loaded_impl(triggers: &AnalysisTriggers, params: PageLoadedParams) -> Result<CallToolResult, McpError> {
    let handle = triggers.on_page_loaded(&params.url);
    json_result(&TriggerOutput {
        scheduled: handle.is_some(),
        signature: handle.map(|h| h.signature().to_string()),
    })
}

pub fn form_ready_impl(triggers: &AnalysisTriggers, params: FormReadyParams) -> Result<CallToolResult, McpError> {
    if params.html.trim().is_empty() {
        return Err(Error::InvalidInput("html cannot be empty".into()).into());
    }

    let handle = triggers.on_form_ready(&params.url, &params.html)?;
    json_result(&TriggerOutput { scheduled: true, signature: Some(handle.signature().to_string()) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{decode, orchestrator, triggers};

    #[tokio::test]
    async fn test_page_loaded_on_shop() {
        let triggers = triggers(orchestrator("http://127.0.0.1:9").await);
        let params = PageLoadedParams { url: "https://Shop.Example/cart".into() };

        let output: TriggerOutput = decode(&page_loaded_impl(&triggers, params).unwrap());
        assert!(output.scheduled);
        assert_eq!(output.signature.as_deref(), Some("page:shop.example"));
        assert_eq!(triggers.pending_triggers(), 1);
    }

    #[tokio::test]
    async fn test_page_loaded_ignores_other_sites() {
        let triggers = triggers(orchestrator("http://127.0.0.1:9").await);
        let params = PageLoadedParams { url: "https://news.example/today".into() };

        let output: TriggerOutput = decode(&page_loaded_impl(&triggers, params).unwrap());
        assert!(!output.scheduled);
        assert!(output.signature.is_none());
    }

    #[tokio::test]
    async fn test_form_ready() {
        let triggers = triggers(orchestrator("http://127.0.0.1:9").await);
        let params = FormReadyParams { url: "https://shop.example/checkout".into(), html: "<form></form>".into() };

        let output: TriggerOutput = decode(&form_ready_impl(&triggers, params).unwrap());
        assert!(output.scheduled);
        assert!(output.signature.unwrap().starts_with("form:shop.example:"));
    }

    #[tokio::test]
    async fn test_form_ready_blank_html() {
        let triggers = triggers(orchestrator("http://127.0.0.1:9").await);
        let params = FormReadyParams { url: "https://shop.example/checkout".into(), html: "".into() };

        let err = form_ready_impl(&triggers, params).unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[tokio::test]
    async fn test_form_ready_invalid_url() {
        let triggers = triggers(orchestrator("http://127.0.0.1:9").await);
        let params = FormReadyParams { url: "not a url".into(), html: "<form></form>".into() };

        let err = form_ready_impl(&triggers, params).unwrap_err();
        assert_eq!(err.code.0, -32003);
        assert_eq!(triggers.pending_triggers(), 0);
    }
}
