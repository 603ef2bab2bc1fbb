// Readiness Probe Port

use async_trait::async_trait;

/// Checks whether a network service answers its health endpoint
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Single probe, no retries (the supervisor owns the backoff)
    async fn is_ready(&self, base_url: &str) -> bool;
}

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Becomes ready for `url` after it has been probed `after` times
    pub struct MockReadinessProbe {
        ready_after: HashMap<String, usize>,
        calls: Mutex<HashMap<String, usize>>,
    }

    impl MockReadinessProbe {
        pub fn new() -> Self {
            Self {
                ready_after: HashMap::new(),
                calls: Mutex::new(HashMap::new()),
            }
        }

        pub fn ready_after(mut self, url: impl Into<String>, probes: usize) -> Self {
            self.ready_after.insert(url.into(), probes);
            self
        }

        pub fn calls(&self, url: &str) -> usize {
            self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
        }
    }

    impl Default for MockReadinessProbe {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ReadinessProbe for MockReadinessProbe {
        async fn is_ready(&self, base_url: &str) -> bool {
            let mut calls = self.calls.lock().unwrap();
            let count = calls.entry(base_url.to_string()).or_insert(0);
            *count += 1;
            match self.ready_after.get(base_url) {
                Some(after) => *count >= *after,
                None => false,
            }
        }
    }
}
