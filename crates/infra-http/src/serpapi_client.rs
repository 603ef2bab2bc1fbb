// SerpApi client
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::debug;

use scout_core::port::{SourceError, WebSearchSource};

use crate::response::{decode, transport};

pub const DEFAULT_BASE_URL: &str = "https://serpapi.com";

pub struct SerpApiClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl SerpApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Query string: the api key, then the caller's params as given.
    /// Engine defaults belong to `WebSearchService`.
    fn query_pairs(&self, params: &Map<String, Value>) -> Vec<(String, String)> {
        let mut merged = Map::new();
        merged.insert("api_key".into(), Value::String(self.api_key.clone()));
        for (k, v) in params {
            merged.insert(k.clone(), v.clone());
        }
        merged
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| {
                let v = match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, v)
            })
            .collect()
    }
}

#[async_trait]
impl WebSearchSource for SerpApiClient {
    async fn search(&self, params: Map<String, Value>) -> Result<Value, SourceError> {
        let url = format!("{}/search.json", self.base_url);
        debug!(url = %url, "Executing SerpApi search");

        let response = self
            .http
            .get(&url)
            .query(&self.query_pairs(&params))
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }
}
