// Domain Layer - Pure business logic and entities

pub mod error;
pub mod process;
pub mod search;

// Re-exports
pub use error::DomainError;
pub use process::{LaunchSpec, Pid, ProcessInfo, ProcessRole, ProcessState, StopMethod};
pub use search::{
    RedditComment, RedditPost, RedditQuery, RedditSearchResult, SearchErrorRecord, SearchOutcome,
    SearchSource, Tweet, TweetAuthor, TweetQuery, TweetSearchResult, TwitterSearchPage, WebQuery,
    WebResult, WebSearchResult,
};
