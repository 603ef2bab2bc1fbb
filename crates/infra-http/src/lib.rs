// Scout Infrastructure - HTTP Adapters
// Implements: RedditSource, TwitterSource, WebSearchSource, SearchGateway, ReadinessProbe

pub mod gateway;
pub mod readiness;
pub mod reddit_client;
mod response;
pub mod serpapi_client;
pub mod twitter_client;

#[cfg(test)]
mod test_support;

pub use gateway::HttpSearchGateway;
pub use readiness::HttpReadinessProbe;
pub use reddit_client::{RedditClient, RedditCredentials};
pub use serpapi_client::SerpApiClient;
pub use twitter_client::TwitterClient;
