//! Reddit search adapter
//! POST /fetch_posts_by_title on `endpoints.reddit` (default 127.0.0.1:8001)

use anyhow::Result;
use scout_api_http::{bind_and_serve, reddit_router};
use scout_core::application::search::RedditSearchService;
use scout_daemon::config::required_env;
use scout_daemon::{logging, signals, ScoutConfig};
use scout_infra_http::reddit_client::DEFAULT_USER_AGENT;
use scout_infra_http::{RedditClient, RedditCredentials};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let config = ScoutConfig::load()?;
    let _guard = logging::init("reddit_adapter", &config.log)?;

    let credentials = match load_credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            error!(error = %e, "Reddit adapter cannot start");
            return Err(e.into());
        }
    };

    let client = RedditClient::with_endpoints(
        credentials,
        &config.upstream.reddit_auth_url,
        &config.upstream.reddit_api_base,
    );
    let service = Arc::new(RedditSearchService::new(Arc::new(client)));

    info!(addr = %config.endpoints.reddit, "Starting Reddit adapter");
    bind_and_serve(
        &config.endpoints.reddit,
        reddit_router(service),
        signals::interrupt_on_signals(),
    )
    .await?;
    info!("Reddit adapter stopped");
    Ok(())
}

fn load_credentials() -> Result<RedditCredentials, scout_daemon::ConfigError> {
    Ok(RedditCredentials {
        client_id: required_env("REDDIT_CLIENT_ID")?,
        client_secret: required_env("REDDIT_CLIENT_SECRET")?,
        user_agent: std::env::var("REDDIT_USER_AGENT")
            .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
    })
}
