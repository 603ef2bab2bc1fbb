// Reddit API client (app-only OAuth)
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

use scout_core::domain::search::REDDIT_COMMENTS_PER_POST;
use scout_core::domain::{RedditComment, RedditPost};
use scout_core::port::{RedditSource, SourceError};

use crate::response::{check_status, decode, transport};

pub const DEFAULT_AUTH_URL: &str = "https://www.reddit.com/api/v1/access_token";
pub const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";
pub const DEFAULT_USER_AGENT: &str = "AIInsightAgent/1.0";

const PERMALINK_BASE: &str = "https://reddit.com";
const DELETED_AUTHOR: &str = "[deleted]";
/// Refresh the token this long before Reddit says it expires
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// App credentials (script/installed app)
#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct RedditClient {
    http: Client,
    credentials: RedditCredentials,
    auth_url: String,
    api_base: String,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    pub fn new(credentials: RedditCredentials) -> Self {
        Self::with_endpoints(credentials, DEFAULT_AUTH_URL, DEFAULT_API_BASE)
    }

    /// Custom token / API endpoints (configured upstreams, loopback mocks)
    pub fn with_endpoints(
        credentials: RedditCredentials,
        auth_url: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            http: Client::new(),
            credentials,
            auth_url: auth_url.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, SourceError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        debug!(url = %self.auth_url, "Requesting Reddit access token");
        let response = self
            .http
            .post(&self.auth_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .header(reqwest::header::USER_AGENT, &self.credentials.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(transport)?;
        let token: TokenResponse = decode(response)
            .await
            .map_err(|e| SourceError::Auth(e.to_string()))?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(token.access_token)
    }

    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, SourceError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(format!("{}{}", self.api_base, path))
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, &self.credentials.user_agent)
            .query(query)
            .send()
            .await
            .map_err(transport)?;
        check_status(response).await
    }

    async fn top_comments(&self, post_id: &str) -> Result<Vec<RedditComment>, SourceError> {
        let response = self
            .get(
                &format!("/comments/{post_id}"),
                &[
                    ("limit", REDDIT_COMMENTS_PER_POST.to_string()),
                    ("depth", "1".to_string()),
                    ("raw_json", "1".to_string()),
                ],
            )
            .await?;
        // [submission listing, comment listing]
        let (_, comments): (Value, Listing<RawComment>) = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        Ok(comments
            .data
            .children
            .into_iter()
            .filter(|thing| thing.kind == "t1")
            .take(REDDIT_COMMENTS_PER_POST)
            .map(|thing| thing.data.into_comment())
            .collect())
    }
}

#[async_trait]
impl RedditSource for RedditClient {
    async fn search_posts(
        &self,
        keyword: &str,
        sort: &str,
        limit: u32,
    ) -> Result<Vec<RedditPost>, SourceError> {
        let response = self
            .get(
                "/r/all/search",
                &[
                    ("q", keyword.to_string()),
                    ("sort", sort.to_string()),
                    ("limit", limit.to_string()),
                    ("raw_json", "1".to_string()),
                ],
            )
            .await?;
        let listing: Listing<RawPost> = response
            .json()
            .await
            .map_err(|e| SourceError::Decode(e.to_string()))?;

        let mut posts = Vec::new();
        for thing in listing.data.children.into_iter().take(limit as usize) {
            debug!(id = %thing.data.id, "Processing Reddit post");
            let comments = self.top_comments(&thing.data.id).await?;
            posts.push(thing.data.into_post(comments));
        }
        info!(keyword = %keyword, count = posts.len(), "Fetched Reddit posts");
        Ok(posts)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Deserialize)]
struct Listing<T> {
    data: ListingData<T>,
}

#[derive(Deserialize)]
struct ListingData<T> {
    #[serde(default = "Vec::new")]
    children: Vec<Thing<T>>,
}

#[derive(Deserialize)]
struct Thing<T> {
    #[serde(default)]
    kind: String,
    data: T,
}

#[derive(Deserialize)]
struct RawPost {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    subreddit: String,
    author: Option<String>,
    #[serde(default)]
    score: i64,
    #[serde(default)]
    num_comments: i64,
    #[serde(default)]
    created_utc: f64,
    #[serde(default)]
    url: String,
    #[serde(default)]
    selftext: String,
    #[serde(default)]
    permalink: String,
}

impl RawPost {
    fn into_post(self, comments: Vec<RedditComment>) -> RedditPost {
        RedditPost {
            id: self.id,
            title: self.title,
            subreddit: self.subreddit,
            author: author_or_deleted(self.author),
            score: self.score,
            num_comments: self.num_comments,
            created_utc: self.created_utc,
            url: self.url,
            selftext: self.selftext,
            permalink: absolute_permalink(&self.permalink),
            comments,
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct RawComment {
    id: String,
    author: Option<String>,
    body: String,
    score: i64,
    created_utc: f64,
    permalink: String,
}

impl RawComment {
    fn into_comment(self) -> RedditComment {
        RedditComment {
            id: self.id,
            author: author_or_deleted(self.author),
            body: self.body,
            score: self.score,
            created_utc: self.created_utc,
            permalink: absolute_permalink(&self.permalink),
        }
    }
}

fn author_or_deleted(author: Option<String>) -> String {
    author
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| DELETED_AUTHOR.to_string())
}

fn absolute_permalink(permalink: &str) -> String {
    format!("{PERMALINK_BASE}{permalink}")
}
