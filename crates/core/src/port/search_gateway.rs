// Search Gateway Port
// Raw-body access to the three adapter operations (directly or through the proxy)

use crate::domain::{RedditQuery, SearchSource, TweetQuery, WebQuery};
use async_trait::async_trait;
use thiserror::Error;

/// Gateway errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Adapter answered with a non-success status
    #[error("{source_name} returned HTTP {status}: {body}")]
    Status {
        source_name: String,
        status: u16,
        body: String,
    },

    /// Adapter could not be reached
    #[error("{source_name} unreachable: {message}")]
    Unreachable {
        source_name: String,
        message: String,
    },
}

/// Search Gateway trait
///
/// Implementations:
/// - HttpSearchGateway: reqwest POST to adapter/proxy addresses
/// - MockSearchGateway: canned bodies for driver and proxy tests
#[async_trait]
pub trait SearchGateway: Send + Sync {
    async fn fetch_posts_by_title(&self, query: &RedditQuery) -> Result<String, GatewayError>;

    async fn fetch_tweets_by_keyword(&self, query: &TweetQuery) -> Result<String, GatewayError>;

    async fn search(&self, query: &WebQuery) -> Result<String, GatewayError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned gateway: one response per source, records call order
    pub struct MockSearchGateway {
        responses: HashMap<SearchSource, Result<String, GatewayError>>,
        calls: Mutex<Vec<(SearchSource, String)>>,
    }

    impl MockSearchGateway {
        pub fn new() -> Self {
            Self {
                responses: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn respond(mut self, source: SearchSource, body: impl Into<String>) -> Self {
            self.responses.insert(source, Ok(body.into()));
            self
        }

        pub fn fail(mut self, source: SearchSource, error: GatewayError) -> Self {
            self.responses.insert(source, Err(error));
            self
        }

        /// (source, keyword) pairs in call order
        pub fn calls(&self) -> Vec<(SearchSource, String)> {
            self.calls.lock().unwrap().clone()
        }

        fn answer(&self, source: SearchSource, keyword: &str) -> Result<String, GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .push((source, keyword.to_string()));
            self.responses.get(&source).cloned().unwrap_or_else(|| {
                Err(GatewayError::Unreachable {
                    source_name: source.to_string(),
                    message: "no canned response".to_string(),
                })
            })
        }
    }

    impl Default for MockSearchGateway {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl SearchGateway for MockSearchGateway {
        async fn fetch_posts_by_title(&self, query: &RedditQuery) -> Result<String, GatewayError> {
            self.answer(SearchSource::Reddit, &query.title_keyword)
        }

        async fn fetch_tweets_by_keyword(
            &self,
            query: &TweetQuery,
        ) -> Result<String, GatewayError> {
            self.answer(SearchSource::Twitter, &query.keyword)
        }

        async fn search(&self, query: &WebQuery) -> Result<String, GatewayError> {
            self.answer(SearchSource::WebSearch, query.query_text().unwrap_or_default())
        }
    }
}
