//! dealscout server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use dealscout_client::{AnalysisTriggers, HttpAnalysisService, Orchestrator, ServiceConfig, TriggerConfig};
use dealscout_core::{AppConfig, CacheDb, TtlCache};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod notifier;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    tracing::info!(api_base_url = %config.api_base_url, db_path = %config.db_path.display(), "Starting dealscout server on stdio transport");

    let db = CacheDb::open(&config.db_path).await?;
    let cache = TtlCache::new(db, config.cache_ttl());
    let service = HttpAnalysisService::new(ServiceConfig::from(&config))?;
    let orchestrator = Orchestrator::new(cache, Arc::new(service));
    let triggers = AnalysisTriggers::new(
        orchestrator.clone(),
        Arc::new(notifier::TracingNotifier),
        TriggerConfig::from(&config),
    );

    let handler = handler::DealScoutServer::new(orchestrator, triggers);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
