// Twitter adapter service

use crate::domain::{
    SearchErrorRecord, SearchOutcome, Tweet, TweetAuthor, TweetQuery, TweetSearchResult,
    TwitterSearchPage,
};
use crate::port::TwitterSource;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

/// The recent-search endpoint rejects `max_results` below this
const UPSTREAM_MIN_RESULTS: u32 = 10;

pub struct TwitterSearchService {
    source: Arc<dyn TwitterSource>,
}

impl TwitterSearchService {
    pub fn new(source: Arc<dyn TwitterSource>) -> Self {
        Self { source }
    }

    /// Recent tweets matching a keyword; limit clamped to 1..=10
    pub async fn fetch_tweets_by_keyword(
        &self,
        query: &TweetQuery,
    ) -> SearchOutcome<TweetSearchResult> {
        let limit = query.effective_limit();
        info!(keyword = %query.keyword, requested = query.limit, limit, "Fetching tweets");

        let upstream = limit.max(UPSTREAM_MIN_RESULTS);
        match self.source.recent_search(&query.keyword, upstream).await {
            Ok(page) => {
                let tweets = shape_tweets(page, limit as usize);
                let result = TweetSearchResult::new(&query.keyword, tweets);
                info!(count = result.count(), keyword = %query.keyword, "Fetched tweets");
                SearchOutcome::Found(result)
            }
            Err(e) => {
                error!(error = %e, keyword = %query.keyword, "Failed to fetch tweets");
                SearchOutcome::Failed(SearchErrorRecord {
                    keyword: query.keyword.clone(),
                    sort: None,
                    error: format!("Failed to fetch tweets: {e}"),
                })
            }
        }
    }
}

/// Join authors from `includes.users` and keep the first `limit` tweets
fn shape_tweets(page: TwitterSearchPage, limit: usize) -> Vec<Tweet> {
    let users: HashMap<_, _> = page
        .includes
        .users
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    page.data
        .into_iter()
        .take(limit)
        .map(|tweet| {
            let user = users.get(&tweet.author_id);
            Tweet {
                id: tweet.id,
                text: tweet.text,
                created_at: tweet.created_at,
                metrics: tweet
                    .public_metrics
                    .unwrap_or_else(|| Value::Object(Default::default())),
                author: TweetAuthor {
                    username: format!(
                        "@{}",
                        user.and_then(|u| u.username.as_deref())
                            .unwrap_or("unknown")
                    ),
                    name: user
                        .and_then(|u| u.name.clone())
                        .unwrap_or_else(|| "Unknown".to_string()),
                    profile_image: user
                        .and_then(|u| u.profile_image_url.clone())
                        .unwrap_or_default(),
                },
            }
        })
        .collect()
}
