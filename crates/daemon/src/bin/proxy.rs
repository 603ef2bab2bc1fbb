//! Aggregation proxy
//! Forwards the three search operations to the adapters (default 127.0.0.1:8000)

use anyhow::Result;
use scout_api_http::{bind_and_serve, proxy_router};
use scout_daemon::config::base_url;
use scout_daemon::{logging, signals, ScoutConfig};
use scout_infra_http::HttpSearchGateway;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = ScoutConfig::load()?;
    let _guard = logging::init("proxy", &config.log)?;

    let endpoints = &config.endpoints;
    let gateway = HttpSearchGateway::new(
        base_url(&endpoints.reddit),
        base_url(&endpoints.twitter),
        base_url(&endpoints.web_search),
    );

    info!(
        addr = %endpoints.proxy,
        reddit = %endpoints.reddit,
        twitter = %endpoints.twitter,
        web_search = %endpoints.web_search,
        "Starting proxy"
    );
    bind_and_serve(
        &endpoints.proxy,
        proxy_router(Arc::new(gateway)),
        signals::interrupt_on_signals(),
    )
    .await?;
    info!("Proxy stopped");
    Ok(())
}
