// HTTP Search Gateway: adapter endpoints called directly or through the proxy
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use scout_core::domain::{RedditQuery, SearchSource, TweetQuery, WebQuery};
use scout_core::port::{GatewayError, SearchGateway};

/// Upper bound for one adapter call (adapters make several upstream requests)
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct HttpSearchGateway {
    http: Client,
    reddit_url: String,
    twitter_url: String,
    web_url: String,
}

impl HttpSearchGateway {
    /// Call each adapter at its own base URL
    pub fn new(
        reddit_url: impl Into<String>,
        twitter_url: impl Into<String>,
        web_url: impl Into<String>,
    ) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            http,
            reddit_url: trim(reddit_url.into()),
            twitter_url: trim(twitter_url.into()),
            web_url: trim(web_url.into()),
        }
    }

    /// Route all three operations through one proxy
    pub fn via_proxy(proxy_url: impl Into<String>) -> Self {
        let url = proxy_url.into();
        Self::new(url.clone(), url.clone(), url)
    }

    fn base_url(&self, source: SearchSource) -> &str {
        match source {
            SearchSource::Reddit => &self.reddit_url,
            SearchSource::Twitter => &self.twitter_url,
            SearchSource::WebSearch => &self.web_url,
        }
    }

    async fn post<B: Serialize + Sync>(
        &self,
        source: SearchSource,
        body: &B,
    ) -> Result<String, GatewayError> {
        let url = format!("{}{}", self.base_url(source), source.path());
        debug!(url = %url, "Sending request to {}", source);

        let unreachable = |e: reqwest::Error| GatewayError::Unreachable {
            source_name: source.to_string(),
            message: e.to_string(),
        };
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(unreachable)?;
        let status = response.status();
        let text = response.text().await.map_err(unreachable)?;

        if !status.is_success() {
            return Err(GatewayError::Status {
                source_name: source.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        info!(source = %source, bytes = text.len(), "Received response");
        Ok(text)
    }
}

fn trim(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[async_trait]
impl SearchGateway for HttpSearchGateway {
    async fn fetch_posts_by_title(&self, query: &RedditQuery) -> Result<String, GatewayError> {
        self.post(SearchSource::Reddit, query).await
    }

    async fn fetch_tweets_by_keyword(&self, query: &TweetQuery) -> Result<String, GatewayError> {
        self.post(SearchSource::Twitter, query).await
    }

    async fn search(&self, query: &WebQuery) -> Result<String, GatewayError> {
        self.post(SearchSource::WebSearch, query).await
    }
}
