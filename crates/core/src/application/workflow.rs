// Workflow Driver - one keyword fanned out to every adapter, in a fixed order

use crate::domain::{RedditQuery, SearchSource, TweetQuery, WebQuery};
use crate::error::{AppError, Result};
use crate::port::SearchGateway;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Fixed call order
pub const WORKFLOW_ORDER: [SearchSource; 3] = [
    SearchSource::Reddit,
    SearchSource::WebSearch,
    SearchSource::Twitter,
];

/// Output of one adapter call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowSection {
    pub source: SearchSource,
    pub succeeded: bool,
    /// Adapter body, or the failure text when the call failed
    pub output: String,
}

/// Aggregated result of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowReport {
    pub keyword: String,
    pub sections: Vec<WorkflowSection>,
}

impl WorkflowReport {
    pub fn failures(&self) -> usize {
        self.sections.iter().filter(|s| !s.succeeded).count()
    }

    /// Plain-text rendering: one titled block per source
    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(|s| format!("=== {} ===\n{}\n", s.source, s.output.trim_end()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub struct WorkflowDriver {
    gateway: Arc<dyn SearchGateway>,
}

impl WorkflowDriver {
    pub fn new(gateway: Arc<dyn SearchGateway>) -> Self {
        Self { gateway }
    }

    /// Query Reddit, then Web-Search, then Twitter with the same keyword.
    /// A failing adapter is recorded in its section; later adapters still run.
    pub async fn run(&self, keyword: &str) -> Result<WorkflowReport> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AppError::Validation("keyword must not be empty".to_string()));
        }
        info!(keyword = %keyword, "Starting workflow");

        let mut sections = Vec::with_capacity(WORKFLOW_ORDER.len());
        for source in WORKFLOW_ORDER {
            info!(source = %source, "Querying adapter");
            let result = match source {
                SearchSource::Reddit => {
                    self.gateway
                        .fetch_posts_by_title(&RedditQuery::new(keyword))
                        .await
                }
                SearchSource::WebSearch => self.gateway.search(&WebQuery::keyword(keyword)).await,
                SearchSource::Twitter => {
                    self.gateway
                        .fetch_tweets_by_keyword(&TweetQuery::new(keyword))
                        .await
                }
            };

            let section = match result {
                Ok(output) => WorkflowSection {
                    source,
                    succeeded: true,
                    output,
                },
                Err(e) => {
                    error!(source = %source, error = %e, "Adapter call failed");
                    WorkflowSection {
                        source,
                        succeeded: false,
                        output: format!("Error: {e}"),
                    }
                }
            };
            sections.push(section);
        }

        info!(keyword = %keyword, "Workflow completed");
        Ok(WorkflowReport {
            keyword: keyword.to_string(),
            sections,
        })
    }
}
