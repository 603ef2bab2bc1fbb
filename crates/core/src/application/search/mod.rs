// Search services - one per adapter.
// Upstream failures are folded into error records; nothing here returns Err.

mod reddit;
mod twitter;
mod web;

pub use reddit::RedditSearchService;
pub use twitter::TwitterSearchService;
pub use web::WebSearchService;
