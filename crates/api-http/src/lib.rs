//! HTTP API Layer
//!
//! Adapter services and the aggregation proxy, served with axum.
//! Adapters answer provider failures with `200` and an error payload;
//! only the proxy maps transport problems to HTTP error statuses.

pub mod adapter;
pub mod error;
pub mod proxy;
pub mod server;

pub use adapter::{reddit_router, twitter_router, web_search_router};
pub use error::ApiError;
pub use proxy::proxy_router;
pub use server::{bind_and_serve, serve, ServerError};
