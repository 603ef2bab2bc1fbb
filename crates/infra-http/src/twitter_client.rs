// Twitter API v2 client (bearer token, recent search)
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use scout_core::domain::TwitterSearchPage;
use scout_core::port::{SourceError, TwitterSource};

use crate::response::{decode, transport};

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";

const TWEET_FIELDS: &str = "created_at,author_id,public_metrics";
const EXPANSIONS: &str = "author_id";
const USER_FIELDS: &str = "username,name,profile_image_url";

pub struct TwitterClient {
    http: Client,
    api_base: String,
    bearer_token: String,
}

impl TwitterClient {
    pub fn new(bearer_token: impl Into<String>) -> Self {
        Self::with_api_base(bearer_token, DEFAULT_API_BASE)
    }

    pub fn with_api_base(bearer_token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bearer_token: bearer_token.into(),
        }
    }
}

#[async_trait]
impl TwitterSource for TwitterClient {
    async fn recent_search(
        &self,
        keyword: &str,
        max_results: u32,
    ) -> Result<TwitterSearchPage, SourceError> {
        let url = format!("{}/2/tweets/search/recent", self.api_base);
        debug!(url = %url, keyword = %keyword, max_results, "Sending request to Twitter API");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(&[
                ("query", keyword.to_string()),
                ("max_results", max_results.to_string()),
                ("tweet.fields", TWEET_FIELDS.to_string()),
                ("expansions", EXPANSIONS.to_string()),
                ("user.fields", USER_FIELDS.to_string()),
            ])
            .send()
            .await
            .map_err(transport)?;

        let page: TwitterSearchPage = decode(response).await?;
        debug!(
            tweets = page.data.len(),
            users = page.includes.users.len(),
            "Received response from Twitter API"
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dead_url, serve};
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    async fn recent(
        headers: HeaderMap,
        Query(q): Query<HashMap<String, String>>,
    ) -> impl IntoResponse {
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            == Some("Bearer secret-token");
        if !authorized {
            return (StatusCode::UNAUTHORIZED, Json(json!({"title": "Unauthorized"})));
        }
        assert_eq!(q.get("expansions").map(String::as_str), Some("author_id"));
        (
            StatusCode::OK,
            Json(json!({
                "data": [
                    {"id": "1", "text": "hello", "created_at": "2024-01-01T00:00:00.000Z",
                     "author_id": "u1", "public_metrics": {"like_count": 3}},
                ],
                "includes": {"users": [{"id": "u1", "username": "ferris", "name": "Ferris"}]},
                "meta": {"result_count": 1, "max_results": q.get("max_results")}
            })),
        )
    }

    #[tokio::test]
    async fn test_recent_search_decodes_page() {
        let base = serve(Router::new().route("/2/tweets/search/recent", get(recent))).await;
        let client = TwitterClient::with_api_base("secret-token", base);

        let page = client.recent_search("rust", 10).await.unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].author_id, "u1");
        assert_eq!(page.includes.users[0].username.as_deref(), Some("ferris"));
    }

    #[tokio::test]
    async fn test_bad_token_is_http_401() {
        let base = serve(Router::new().route("/2/tweets/search/recent", get(recent))).await;
        let client = TwitterClient::with_api_base("wrong", base);

        let err = client.recent_search("rust", 10).await.unwrap_err();

        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_empty_result_has_no_data() {
        let router = Router::new().route(
            "/2/tweets/search/recent",
            get(|| async { Json(json!({"meta": {"result_count": 0}})) }),
        );
        let client = TwitterClient::with_api_base("t", serve(router).await);

        let page = client.recent_search("nothing", 10).await.unwrap();

        assert!(page.data.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_api_is_transport_error() {
        let client = TwitterClient::with_api_base("t", dead_url().await);

        let err = client.recent_search("rust", 10).await.unwrap_err();

        assert!(matches!(err, SourceError::Transport(_)));
    }
}
