// Web-search (SerpApi) adapter service

use crate::domain::search::{NO_ORGANIC_RESULTS, WEB_DEFAULT_ENGINE};
use crate::domain::{WebQuery, WebResult, WebSearchResult};
use crate::port::{SourceError, WebSearchSource};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct WebSearchService {
    source: Arc<dyn WebSearchSource>,
}

impl WebSearchService {
    pub fn new(source: Arc<dyn WebSearchSource>) -> Self {
        Self { source }
    }

    /// Run the search and render the text body served to callers.
    /// Failures are rendered as `Error: ...` text.
    pub async fn search(&self, query: &WebQuery) -> String {
        match self.search_record(query).await {
            Ok(Some(result)) => result.render(),
            Ok(None) => NO_ORGANIC_RESULTS.to_string(),
            Err(e) => {
                error!(error = %e, "Web search failed");
                error_text(&e)
            }
        }
    }

    /// `Ok(None)` when the response carries no `organic_results` at all
    pub async fn search_record(
        &self,
        query: &WebQuery,
    ) -> Result<Option<WebSearchResult>, SourceError> {
        let params = with_defaults(&query.params);
        info!(params = ?params, limit = query.effective_limit(), "Performing web search");

        let data = self.source.search(params).await?;
        debug!("Received web search response");

        let Some(organic) = data.get("organic_results").and_then(Value::as_array) else {
            warn!("No organic results found");
            return Ok(None);
        };

        let results: Vec<WebResult> = organic
            .iter()
            .take(query.effective_limit() as usize)
            .map(|r| WebResult {
                title: text_field(r, "title", "No title"),
                link: text_field(r, "link", "No link"),
                snippet: text_field(r, "snippet", "No snippet"),
            })
            .collect();
        let result = WebSearchResult::new(query.query_text().unwrap_or_default(), results);
        info!(count = result.count(), "Fetched web search results");
        Ok(Some(result))
    }
}

/// Engine default first, caller parameters override it
fn with_defaults(params: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = Map::new();
    merged.insert(
        "engine".to_string(),
        Value::String(WEB_DEFAULT_ENGINE.to_string()),
    );
    for (k, v) in params {
        merged.insert(k.clone(), v.clone());
    }
    merged
}

fn text_field(value: &Value, key: &str, fallback: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

/// Human-readable error text for the web-search body
pub fn error_text(err: &SourceError) -> String {
    match err {
        SourceError::Http { status: 429, .. } => {
            "Error: Rate limit exceeded. Please try again later.".to_string()
        }
        SourceError::Http { status: 401, .. } => {
            "Error: Invalid API key. Please check your API key.".to_string()
        }
        SourceError::Http { status, body } => format!("Error: {status} - {body}"),
        other => format!("Error: {other}"),
    }
}
