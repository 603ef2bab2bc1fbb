// Search Source Ports
// One trait per third-party search provider; each call hits the provider once.

use crate::domain::{RedditPost, TwitterSearchPage};
use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Upstream provider errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("{}", http_message(.status, .body))]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl SourceError {
    pub fn status(&self) -> Option<u16> {
        match self {
            SourceError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn http_message(status: &u16, body: &str) -> String {
    match status {
        429 => "Rate limit exceeded (HTTP 429)".to_string(),
        401 | 403 => format!("Invalid credentials (HTTP {status})"),
        _ => format!("HTTP {status}: {body}"),
    }
}

/// Reddit search (all subreddits) with top comments per post
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedditSource: Send + Sync {
    async fn search_posts(
        &self,
        keyword: &str,
        sort: &str,
        limit: u32,
    ) -> Result<Vec<RedditPost>, SourceError>;
}

/// Twitter v2 recent search
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TwitterSource: Send + Sync {
    async fn recent_search(
        &self,
        keyword: &str,
        max_results: u32,
    ) -> Result<TwitterSearchPage, SourceError>;
}

/// SerpApi search; returns the raw response document
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WebSearchSource: Send + Sync {
    async fn search(&self, params: Map<String, Value>) -> Result<Value, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_messages() {
        let rate = SourceError::Http {
            status: 429,
            body: String::new(),
        };
        assert_eq!(rate.to_string(), "Rate limit exceeded (HTTP 429)");
        assert_eq!(rate.status(), Some(429));

        let other = SourceError::Http {
            status: 500,
            body: "oops".into(),
        };
        assert_eq!(other.to_string(), "HTTP 500: oops");
        assert_eq!(SourceError::Transport("x".into()).status(), None);
    }
}
