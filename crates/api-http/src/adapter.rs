//! Search adapter routes
//!
//! One router per provider. Each exposes its single search operation plus
//! `GET /health`. Provider failures are `200` with an error payload.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use scout_core::application::search::{RedditSearchService, TwitterSearchService, WebSearchService};
use scout_core::domain::{RedditQuery, SearchSource, TweetQuery, WebQuery};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::ApiError;

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";
pub(crate) const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

pub(crate) async fn health() -> &'static str {
    "OK"
}

pub(crate) fn with_content_type(content_type: &'static str, body: String) -> Response {
    ([(header::CONTENT_TYPE, content_type)], body).into_response()
}

/// `POST /fetch_posts_by_title`
pub fn reddit_router(service: Arc<RedditSearchService>) -> Router {
    Router::new()
        .route(SearchSource::Reddit.path(), post(fetch_posts_by_title))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// `POST /fetch_tweets_by_keyword`
pub fn twitter_router(service: Arc<TwitterSearchService>) -> Router {
    Router::new()
        .route(SearchSource::Twitter.path(), post(fetch_tweets_by_keyword))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// `POST /search`
pub fn web_search_router(service: Arc<WebSearchService>) -> Router {
    Router::new()
        .route(SearchSource::WebSearch.path(), post(search))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

async fn fetch_posts_by_title(
    State(service): State<Arc<RedditSearchService>>,
    Json(query): Json<RedditQuery>,
) -> Result<Response, ApiError> {
    info!(
        title_keyword = %query.title_keyword,
        sort = %query.sort,
        limit = query.limit,
        "fetch_posts_by_title"
    );
    let outcome = service.fetch_posts_by_title(&query).await;
    let body = serde_json::to_string_pretty(&outcome)?;
    Ok(with_content_type(JSON_CONTENT_TYPE, body))
}

async fn fetch_tweets_by_keyword(
    State(service): State<Arc<TwitterSearchService>>,
    Json(query): Json<TweetQuery>,
) -> Result<Response, ApiError> {
    info!(keyword = %query.keyword, limit = query.limit, "fetch_tweets_by_keyword");
    let outcome = service.fetch_tweets_by_keyword(&query).await;
    let body = serde_json::to_string_pretty(&outcome)?;
    Ok(with_content_type(JSON_CONTENT_TYPE, body))
}

async fn search(
    State(service): State<Arc<WebSearchService>>,
    Json(query): Json<WebQuery>,
) -> Response {
    info!(params = ?query.params, limit = query.limit, "search");
    let body = service.search(&query).await;
    with_content_type(TEXT_CONTENT_TYPE, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::serve;
    use async_trait::async_trait;
    use scout_core::application::interrupt::InterruptToken;
    use scout_core::domain::{RedditPost, TwitterSearchPage};
    use scout_core::port::{RedditSource, SourceError, TwitterSource, WebSearchSource};
    use serde_json::{json, Map, Value};
    use tokio::net::TcpListener;

    struct FixedReddit(Result<Vec<RedditPost>, SourceError>);

    #[async_trait]
    impl RedditSource for FixedReddit {
        async fn search_posts(
            &self,
            _keyword: &str,
            _sort: &str,
            _limit: u32,
        ) -> Result<Vec<RedditPost>, SourceError> {
            self.0.clone()
        }
    }

    struct EmptyTwitter;

    #[async_trait]
    impl TwitterSource for EmptyTwitter {
        async fn recent_search(
            &self,
            _keyword: &str,
            _max_results: u32,
        ) -> Result<TwitterSearchPage, SourceError> {
            Ok(TwitterSearchPage::default())
        }
    }

    struct FixedWeb(Value);

    #[async_trait]
    impl WebSearchSource for FixedWeb {
        async fn search(&self, _params: Map<String, Value>) -> Result<Value, SourceError> {
            Ok(self.0.clone())
        }
    }

    async fn start(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, router, InterruptToken::never()));
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_reddit_failure_is_200_with_error_record() {
        let source = FixedReddit(Err(SourceError::Http {
            status: 429,
            body: String::new(),
        }));
        let base = start(reddit_router(Arc::new(RedditSearchService::new(Arc::new(source))))).await;

        let response = reqwest::Client::new()
            .post(format!("{base}/fetch_posts_by_title"))
            .json(&json!({"title_keyword": "rust"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let text = response.text().await.unwrap();
        // Pretty-printed
        assert!(text.contains("\n  \"keyword\": \"rust\""));
        let body: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(body["sort"], "hot");
        assert_eq!(
            body["error"],
            "Failed to fetch posts: Rate limit exceeded (HTTP 429)"
        );
    }

    #[tokio::test]
    async fn test_twitter_empty_result() {
        let base = start(twitter_router(Arc::new(TwitterSearchService::new(Arc::new(
            EmptyTwitter,
        )))))
        .await;

        let body: Value = reqwest::Client::new()
            .post(format!("{base}/fetch_tweets_by_keyword"))
            .json(&json!({"keyword": "rust", "limit": 50}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        assert_eq!(body, json!({"keyword": "rust", "tweets": [], "count": 0}));
    }

    #[tokio::test]
    async fn test_web_search_returns_text() {
        let doc = json!({"organic_results": [{"title": "Coffee", "link": "https://c.example"}]});
        let base = start(web_search_router(Arc::new(WebSearchService::new(Arc::new(
            FixedWeb(doc),
        )))))
        .await;

        let response = reqwest::Client::new()
            .post(format!("{base}/search"))
            .json(&json!({"params": {"q": "coffee"}}))
            .send()
            .await
            .unwrap();

        assert!(response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
        assert_eq!(
            response.text().await.unwrap(),
            "Title: Coffee\nLink: https://c.example\nSnippet: No snippet\n"
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let base = start(reddit_router(Arc::new(RedditSearchService::new(Arc::new(
            FixedReddit(Ok(vec![])),
        )))))
        .await;

        let response = reqwest::Client::new()
            .post(format!("{base}/fetch_posts_by_title"))
            .json(&json!({"sort": "new"}))
            .send()
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_health() {
        let base = start(twitter_router(Arc::new(TwitterSearchService::new(Arc::new(
            EmptyTwitter,
        )))))
        .await;

        let text = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(text, "OK");
    }
}
