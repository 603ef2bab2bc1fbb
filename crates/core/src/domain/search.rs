// Search Domain Model
//
// Queries accepted by the adapters and the records they answer with.
// Every result record derives its `count` from its item sequence.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reddit: default number of posts
pub const REDDIT_DEFAULT_LIMIT: u32 = 3;
/// Reddit: hard cap on posts per call
pub const REDDIT_MAX_POSTS: u32 = 5;
/// Reddit: comments attached to each post
pub const REDDIT_COMMENTS_PER_POST: usize = 3;
/// Reddit: default sort order
pub const REDDIT_DEFAULT_SORT: &str = "hot";

/// Twitter: default number of tweets
pub const TWITTER_DEFAULT_LIMIT: u32 = 3;
/// Twitter: hard cap on tweets per call
pub const TWITTER_MAX_TWEETS: u32 = 10;

/// Web search: default number of organic results
pub const WEB_DEFAULT_LIMIT: u32 = 3;
/// Web search: hard cap on organic results per call
pub const WEB_MAX_RESULTS: u32 = 10;
/// Web search: engine used when the caller does not pick one
pub const WEB_DEFAULT_ENGINE: &str = "google_light";

/// Text returned when a web search yields nothing
pub const NO_ORGANIC_RESULTS: &str = "No organic results found";

/// Which adapter a call belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSource {
    Reddit,
    WebSearch,
    Twitter,
}

impl SearchSource {
    /// Adapter endpoint path (shared by adapters and proxy)
    pub fn path(self) -> &'static str {
        match self {
            SearchSource::Reddit => "/fetch_posts_by_title",
            SearchSource::WebSearch => "/search",
            SearchSource::Twitter => "/fetch_tweets_by_keyword",
        }
    }
}

impl std::fmt::Display for SearchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchSource::Reddit => write!(f, "Reddit"),
            SearchSource::WebSearch => write!(f, "Web Search"),
            SearchSource::Twitter => write!(f, "Twitter"),
        }
    }
}

fn default_reddit_sort() -> String {
    REDDIT_DEFAULT_SORT.to_string()
}

fn default_reddit_limit() -> u32 {
    REDDIT_DEFAULT_LIMIT
}

fn default_twitter_limit() -> u32 {
    TWITTER_DEFAULT_LIMIT
}

fn default_web_limit() -> u32 {
    WEB_DEFAULT_LIMIT
}

/// POST /fetch_posts_by_title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditQuery {
    pub title_keyword: String,
    #[serde(default = "default_reddit_sort")]
    pub sort: String,
    #[serde(default = "default_reddit_limit")]
    pub limit: u32,
}

impl RedditQuery {
    pub fn new(title_keyword: impl Into<String>) -> Self {
        Self {
            title_keyword: title_keyword.into(),
            sort: default_reddit_sort(),
            limit: REDDIT_DEFAULT_LIMIT,
        }
    }

    /// Number of posts actually requested upstream
    pub fn effective_limit(&self) -> u32 {
        self.limit.min(REDDIT_MAX_POSTS)
    }
}

/// POST /fetch_tweets_by_keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetQuery {
    pub keyword: String,
    #[serde(default = "default_twitter_limit")]
    pub limit: u32,
}

impl TweetQuery {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            limit: TWITTER_DEFAULT_LIMIT,
        }
    }

    pub fn effective_limit(&self) -> u32 {
        self.limit.clamp(1, TWITTER_MAX_TWEETS)
    }
}

/// POST /search
///
/// `params` are engine-specific SerpApi parameters (`q`, `engine`, `location`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebQuery {
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default = "default_web_limit")]
    pub limit: u32,
}

impl WebQuery {
    /// Query with `q` set to the keyword
    pub fn keyword(keyword: impl Into<String>) -> Self {
        let mut params = Map::new();
        params.insert("q".to_string(), Value::String(keyword.into()));
        Self {
            params,
            limit: WEB_DEFAULT_LIMIT,
        }
    }

    pub fn effective_limit(&self) -> u32 {
        self.limit.clamp(1, WEB_MAX_RESULTS)
    }

    /// The `q` parameter, if the caller supplied one as a string
    pub fn query_text(&self) -> Option<&str> {
        self.params.get("q").and_then(Value::as_str)
    }
}

/// A Reddit comment (top-level, most relevant first)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditComment {
    pub id: String,
    pub author: String,
    pub body: String,
    pub score: i64,
    pub created_utc: f64,
    pub permalink: String,
}

/// A Reddit submission with its top comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedditPost {
    pub id: String,
    pub title: String,
    pub subreddit: String,
    pub author: String,
    pub score: i64,
    pub num_comments: i64,
    pub created_utc: f64,
    pub url: String,
    pub selftext: String,
    pub permalink: String,
    pub comments: Vec<RedditComment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RedditSearchFields")]
pub struct RedditSearchResult {
    keyword: String,
    sort: String,
    posts: Vec<RedditPost>,
    count: usize,
}

#[derive(Deserialize)]
struct RedditSearchFields {
    keyword: String,
    sort: String,
    posts: Vec<RedditPost>,
}

impl From<RedditSearchFields> for RedditSearchResult {
    fn from(f: RedditSearchFields) -> Self {
        Self::new(f.keyword, f.sort, f.posts)
    }
}

impl RedditSearchResult {
    pub fn new(
        keyword: impl Into<String>,
        sort: impl Into<String>,
        posts: Vec<RedditPost>,
    ) -> Self {
        let count = posts.len();
        Self {
            keyword: keyword.into(),
            sort: sort.into(),
            posts,
            count,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn posts(&self) -> &[RedditPost] {
        &self.posts
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Author block attached to a tweet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetAuthor {
    pub username: String,
    pub name: String,
    pub profile_image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub created_at: String,
    pub metrics: Value,
    pub author: TweetAuthor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TweetSearchFields")]
pub struct TweetSearchResult {
    keyword: String,
    tweets: Vec<Tweet>,
    count: usize,
}

#[derive(Deserialize)]
struct TweetSearchFields {
    keyword: String,
    tweets: Vec<Tweet>,
}

impl From<TweetSearchFields> for TweetSearchResult {
    fn from(f: TweetSearchFields) -> Self {
        Self::new(f.keyword, f.tweets)
    }
}

impl TweetSearchResult {
    pub fn new(keyword: impl Into<String>, tweets: Vec<Tweet>) -> Self {
        let count = tweets.len();
        Self {
            keyword: keyword.into(),
            tweets,
            count,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn tweets(&self) -> &[Tweet] {
        &self.tweets
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Raw page from the Twitter v2 recent-search endpoint
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TwitterSearchPage {
    #[serde(default)]
    pub data: Vec<TwitterTweetData>,
    #[serde(default)]
    pub includes: TwitterIncludes,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TwitterTweetData {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub author_id: String,
    #[serde(default)]
    pub public_metrics: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TwitterIncludes {
    #[serde(default)]
    pub users: Vec<TwitterUser>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TwitterUser {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
}

/// One organic web search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WebSearchFields")]
pub struct WebSearchResult {
    keyword: String,
    results: Vec<WebResult>,
    count: usize,
}

#[derive(Deserialize)]
struct WebSearchFields {
    keyword: String,
    results: Vec<WebResult>,
}

impl From<WebSearchFields> for WebSearchResult {
    fn from(f: WebSearchFields) -> Self {
        Self::new(f.keyword, f.results)
    }
}

impl WebSearchResult {
    pub fn new(keyword: impl Into<String>, results: Vec<WebResult>) -> Self {
        let count = results.len();
        Self {
            keyword: keyword.into(),
            results,
            count,
        }
    }

    pub fn results(&self) -> &[WebResult] {
        &self.results
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Text body served by the web-search adapter
    pub fn render(&self) -> String {
        if self.results.is_empty() {
            return NO_ORGANIC_RESULTS.to_string();
        }
        self.results
            .iter()
            .map(|r| format!("Title: {}\nLink: {}\nSnippet: {}\n", r.title, r.link, r.snippet))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Error payload returned in place of a result record.
///
/// Carries the query fields of the matching success record, minus the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchErrorRecord {
    pub keyword: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    pub error: String,
}

/// What an adapter returns for one call: a record or an error record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchOutcome<T> {
    Found(T),
    Failed(SearchErrorRecord),
}

impl<T> SearchOutcome<T> {
    pub fn is_failed(&self) -> bool {
        matches!(self, SearchOutcome::Failed(_))
    }
}
