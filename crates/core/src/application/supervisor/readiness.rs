// Readiness policies: fixed delay (default) or health probing with backoff

use super::constants::{INITIAL_PROBE_BACKOFF, MAX_PROBE_BACKOFF};
use crate::port::ReadinessProbe;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

/// A service the probe policy waits for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessTarget {
    pub name: String,
    pub base_url: String,
}

impl ReadinessTarget {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
        }
    }
}

/// How the supervisor decides services are up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessPolicy {
    /// Sleep for a fixed duration; nothing is verified
    FixedDelay(Duration),
    /// Poll each target's health endpoint until ready or the budget runs out
    Probe {
        targets: Vec<ReadinessTarget>,
        timeout: Duration,
    },
}

/// Poll one target with exponential backoff until `deadline`
pub(crate) async fn wait_until_ready(
    probe: &dyn ReadinessProbe,
    target: &ReadinessTarget,
    deadline: Instant,
) -> bool {
    let mut backoff = INITIAL_PROBE_BACKOFF;
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        if probe.is_ready(&target.base_url).await {
            info!(name = %target.name, attempts, "Service ready");
            return true;
        }

        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        debug!(
            name = %target.name,
            attempts,
            backoff_ms = backoff.as_millis() as u64,
            "Service not ready yet"
        );
        sleep(backoff.min(deadline - now)).await;
        backoff = (backoff * 2).min(MAX_PROBE_BACKOFF);
    }
}
