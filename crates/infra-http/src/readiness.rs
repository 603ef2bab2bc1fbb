// HTTP readiness probe: GET {base_url}/health
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use scout_core::port::ReadinessProbe;

const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

pub struct HttpReadinessProbe {
    http: Client,
}

impl HttpReadinessProbe {
    pub fn new() -> Self {
        let http = Client::builder()
            .timeout(PROBE_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { http }
    }
}

impl Default for HttpReadinessProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReadinessProbe for HttpReadinessProbe {
    async fn is_ready(&self, base_url: &str) -> bool {
        let url = format!("{}/health", base_url.trim_end_matches('/'));
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(url = %url, error = %e, "Probe failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dead_url, serve};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;

    #[tokio::test]
    async fn test_ready_when_health_answers_ok() {
        let base = serve(Router::new().route("/health", get(|| async { "OK" }))).await;
        assert!(HttpReadinessProbe::new().is_ready(&base).await);
    }

    #[tokio::test]
    async fn test_not_ready_on_error_status() {
        let router = Router::new().route(
            "/health",
            get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let base = serve(router).await;
        assert!(!HttpReadinessProbe::new().is_ready(&base).await);
    }

    #[tokio::test]
    async fn test_not_ready_when_nothing_listens() {
        assert!(!HttpReadinessProbe::new().is_ready(&dead_url().await).await);
    }
}
