// Supervisor constants (no magic values)
use std::time::Duration;

/// Fixed readiness delay before the workflow starts (10s)
pub const DEFAULT_READINESS_DELAY: Duration = Duration::from_secs(10);

/// Grace period between graceful-terminate and forced-kill (5s)
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Total time budget for health probing when the probe policy is selected (30s)
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// First backoff between health probes (100ms), doubled after each miss
pub const INITIAL_PROBE_BACKOFF: Duration = Duration::from_millis(100);

/// Upper bound for the probe backoff (2s)
pub const MAX_PROBE_BACKOFF: Duration = Duration::from_secs(2);
