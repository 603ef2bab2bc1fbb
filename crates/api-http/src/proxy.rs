//! Aggregation proxy routes
//!
//! Same three operations as the adapters, forwarded through a `SearchGateway`.
//! The adapter's body is returned untouched.

use axum::extract::State;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use scout_core::domain::{RedditQuery, SearchSource, TweetQuery, WebQuery};
use scout_core::port::SearchGateway;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use crate::adapter::{health, with_content_type, JSON_CONTENT_TYPE, TEXT_CONTENT_TYPE};
use crate::error::ApiError;

type Gateway = Arc<dyn SearchGateway>;

pub fn proxy_router(gateway: Gateway) -> Router {
    Router::new()
        .route(SearchSource::Reddit.path(), post(proxy_reddit))
        .route(SearchSource::Twitter.path(), post(proxy_twitter))
        .route(SearchSource::WebSearch.path(), post(proxy_search))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(gateway)
}

fn relay(
    source: SearchSource,
    content_type: &'static str,
    result: Result<String, scout_core::port::GatewayError>,
) -> Result<Response, ApiError> {
    match result {
        Ok(body) => {
            debug!(source = %source, bytes = body.len(), "Received response from adapter");
            info!(source = %source, "Successfully proxied request");
            Ok(with_content_type(content_type, body))
        }
        Err(e) => {
            error!(source = %source, error = %e, "Proxy request failed");
            Err(e.into())
        }
    }
}

async fn proxy_reddit(
    State(gateway): State<Gateway>,
    Json(query): Json<RedditQuery>,
) -> Result<Response, ApiError> {
    info!(
        title_keyword = %query.title_keyword,
        sort = %query.sort,
        limit = query.limit,
        "Proxying Reddit request"
    );
    let result = gateway.fetch_posts_by_title(&query).await;
    relay(SearchSource::Reddit, JSON_CONTENT_TYPE, result)
}

async fn proxy_twitter(
    State(gateway): State<Gateway>,
    Json(query): Json<TweetQuery>,
) -> Result<Response, ApiError> {
    info!(keyword = %query.keyword, limit = query.limit, "Proxying Twitter request");
    let result = gateway.fetch_tweets_by_keyword(&query).await;
    relay(SearchSource::Twitter, JSON_CONTENT_TYPE, result)
}

async fn proxy_search(
    State(gateway): State<Gateway>,
    Json(query): Json<WebQuery>,
) -> Result<Response, ApiError> {
    info!(params = ?query.params, "Proxying web search request");
    let result = gateway.search(&query).await;
    relay(SearchSource::WebSearch, TEXT_CONTENT_TYPE, result)
}
