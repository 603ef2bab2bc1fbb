//! Web search (SerpApi) adapter
//! POST /search on `endpoints.web_search` (default 127.0.0.1:8003)

use anyhow::Result;
use scout_api_http::{bind_and_serve, web_search_router};
use scout_core::application::search::WebSearchService;
use scout_daemon::config::required_env;
use scout_daemon::{logging, signals, ScoutConfig};
use scout_infra_http::SerpApiClient;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = ScoutConfig::load()?;
    let _guard = logging::init("websearch_adapter", &config.log)?;

    let api_key = required_env("SERPAPI_API_KEY").inspect_err(|e| {
        error!(error = %e, "Web search adapter cannot start");
    })?;

    let client = SerpApiClient::with_base_url(api_key, &config.upstream.serpapi_base);
    let service = Arc::new(WebSearchService::new(Arc::new(client)));

    info!(addr = %config.endpoints.web_search, "Starting web search adapter");
    bind_and_serve(
        &config.endpoints.web_search,
        web_search_router(service),
        signals::interrupt_on_signals(),
    )
    .await?;
    info!("Web search adapter stopped");
    Ok(())
}
