//! Analysis service client.
//!
//! The remote service is opaque and its calls are assumed idempotent.
//!
//! ### Endpoints
//!
//! - `POST /analyze` with `{url}`, answering `{coupons: [{code, source}]}`.
//!   Any other JSON shape degrades to an empty coupon list.
//! - `POST /analyze_form` with `{html_page}`, answering
//!   `{form_fields: {coupon_input: {css_path}, apply_button: {css_path}}}`.
//!   Missing locators are a validation error.
//!
//! Non-2xx statuses, transport failures and non-JSON bodies are network
//! errors.

pub mod error;
pub mod request;

pub use error::ServiceError;
pub use request::{AnalyzeFormRequest, AnalyzeRequest};

use async_trait::async_trait;
use dealscout_core::{AppConfig, Error, FormAnalysis, PageAnalysis};
use reqwest::header;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default base URL of the analysis service.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "dealscout/0.1";

/// The network collaborator behind page and form analysis.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Look up coupons for a page URL.
    async fn analyze_page(&self, url: &str) -> Result<PageAnalysis, Error>;

    /// Locate the coupon input and apply button in an HTML snapshot.
    async fn analyze_form(&self, html: &str) -> Result<FormAnalysis, Error>;
}

/// HTTP client configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL (default: http://localhost:8000).
    pub base_url: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string (default: dealscout/0.x).
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for ServiceConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Analysis service client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAnalysisService {
    http: reqwest::Client,
    config: ServiceConfig,
}

impl HttpAnalysisService {
    /// Create a new client with the given configuration.
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ServiceError::Setup(e.to_string()))?;

        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// POST a JSON body and decode the JSON answer.
    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ServiceError> {
        let start = Instant::now();
        let url = self.endpoint(path);

        let response = self
            .http
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(%url, %status, "analysis service responded");

        if !status.is_success() {
            return Err(ServiceError::HttpError { status: status.as_u16() });
        }

        let bytes = response.bytes().await.map_err(|e| ServiceError::Network(Arc::new(e)))?;
        let value = serde_json::from_slice(&bytes).map_err(|e| ServiceError::Parse(e.to_string()))?;

        tracing::debug!(%url, elapsed_ms = start.elapsed().as_millis() as u64, "analysis call completed");

        Ok(value)
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisService {
    async fn analyze_page(&self, url: &str) -> Result<PageAnalysis, Error> {
        let body = self.post_json("analyze", &AnalyzeRequest { url }).await?;
        Ok(PageAnalysis::from_response(&body))
    }

    async fn analyze_form(&self, html: &str) -> Result<FormAnalysis, Error> {
        let body = self.post_json("analyze_form", &AnalyzeFormRequest { html_page: html }).await?;
        FormAnalysis::from_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> HttpAnalysisService {
        HttpAnalysisService::new(ServiceConfig { base_url: server.uri(), ..Default::default() }).unwrap()
    }

    #[test]
    fn test_config_default() {
        let config = ServiceConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout, Duration::from_secs(20));
        assert_eq!(config.user_agent, "dealscout/0.1");
    }

    #[test]
    fn test_config_from_app_config() {
        let app = AppConfig { api_base_url: "https://coupons.internal/".into(), timeout_ms: 500, ..Default::default() };
        let config = ServiceConfig::from(&app);
        assert_eq!(config.base_url, "https://coupons.internal/");
        assert_eq!(config.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_endpoint_join() {
        let service = HttpAnalysisService::new(ServiceConfig {
            base_url: "http://localhost:8000/".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(service.endpoint("analyze"), "http://localhost:8000/analyze");
    }

    #[tokio::test]
    async fn test_analyze_page() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .and(body_json(json!({"url": "https://shop.example/cart"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"coupons": [{"code": "SAVE10", "source": "x"}]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let analysis = client_for(&server).analyze_page("https://shop.example/cart").await.unwrap();
        assert_eq!(analysis.coupons.len(), 1);
        assert_eq!(analysis.coupons[0].code, "SAVE10");
    }

    #[tokio::test]
    async fn test_analyze_page_unexpected_shape_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"coupons": "none"})))
            .mount(&server)
            .await;

        let analysis = client_for(&server).analyze_page("https://shop.example").await.unwrap();
        assert!(analysis.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_page_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).analyze_page("https://shop.example").await.unwrap_err();
        assert!(matches!(err, Error::Network(ref msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn test_analyze_page_non_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).analyze_page("https://shop.example").await.unwrap_err();
        assert!(matches!(err, Error::Network(ref msg) if msg.contains("parse error")));
    }

    #[tokio::test]
    async fn test_analyze_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze_form"))
            .and(body_json(json!({"html_page": "<form></form>"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "form_fields": {
                    "coupon_input": {"css_path": "#promo"},
                    "apply_button": {"css_path": "#apply"}
                }
            })))
            .mount(&server)
            .await;

        let analysis = client_for(&server).analyze_form("<form></form>").await.unwrap();
        assert_eq!(analysis.form_fields.apply_button.css_path, "#apply");
    }

    #[tokio::test]
    async fn test_analyze_form_missing_locator() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/analyze_form"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"form_fields": {"coupon_input": {"css_path": "#promo"}}})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).analyze_form("<form></form>").await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        let service = HttpAnalysisService::new(ServiceConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap();

        let err = service.analyze_page("https://shop.example").await.unwrap_err();
        assert!(matches!(err, Error::Network(_)));
    }
}
