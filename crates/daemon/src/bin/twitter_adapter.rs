//! Twitter search adapter
//! POST /fetch_tweets_by_keyword on `endpoints.twitter` (default 127.0.0.1:8002)

use anyhow::Result;
use scout_api_http::{bind_and_serve, twitter_router};
use scout_core::application::search::TwitterSearchService;
use scout_daemon::config::required_env;
use scout_daemon::{logging, signals, ScoutConfig};
use scout_infra_http::TwitterClient;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = ScoutConfig::load()?;
    let _guard = logging::init("twitter_adapter", &config.log)?;

    let token = required_env("TWITTER_BEARER_TOKEN").inspect_err(|e| {
        error!(error = %e, "Twitter adapter cannot start");
    })?;

    let client = TwitterClient::with_api_base(token, &config.upstream.twitter_api_base);
    let service = Arc::new(TwitterSearchService::new(Arc::new(client)));

    info!(addr = %config.endpoints.twitter, "Starting Twitter adapter");
    bind_and_serve(
        &config.endpoints.twitter,
        twitter_router(service),
        signals::interrupt_on_signals(),
    )
    .await?;
    info!("Twitter adapter stopped");
    Ok(())
}
