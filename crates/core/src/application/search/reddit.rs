// Reddit adapter service

use crate::domain::{RedditQuery, RedditSearchResult, SearchErrorRecord, SearchOutcome};
use crate::port::RedditSource;
use std::sync::Arc;
use tracing::{debug, error, info};

pub struct RedditSearchService {
    source: Arc<dyn RedditSource>,
}

impl RedditSearchService {
    pub fn new(source: Arc<dyn RedditSource>) -> Self {
        Self { source }
    }

    /// Search all subreddits by title keyword; limit is capped silently
    pub async fn fetch_posts_by_title(
        &self,
        query: &RedditQuery,
    ) -> SearchOutcome<RedditSearchResult> {
        let limit = query.effective_limit();
        info!(
            keyword = %query.title_keyword,
            sort = %query.sort,
            requested = query.limit,
            limit,
            "Fetching Reddit posts"
        );

        match self
            .source
            .search_posts(&query.title_keyword, &query.sort, limit)
            .await
        {
            Ok(mut posts) => {
                posts.truncate(limit as usize);
                for post in &posts {
                    debug!(
                        post_id = %post.id,
                        comments = post.comments.len(),
                        "Processed Reddit post"
                    );
                }
                let result = RedditSearchResult::new(&query.title_keyword, &query.sort, posts);
                info!(
                    count = result.count(),
                    keyword = %query.title_keyword,
                    "Fetched Reddit posts"
                );
                SearchOutcome::Found(result)
            }
            Err(e) => {
                error!(error = %e, keyword = %query.title_keyword, "Failed to fetch Reddit posts");
                SearchOutcome::Failed(SearchErrorRecord {
                    keyword: query.title_keyword.clone(),
                    sort: Some(query.sort.clone()),
                    error: format!("Failed to fetch posts: {e}"),
                })
            }
        }
    }
}
