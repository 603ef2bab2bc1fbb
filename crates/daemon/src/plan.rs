//! The fixed set of Scout processes a supervised run starts

use crate::config::{base_url, ReadinessMode, ScoutConfig};
use scout_core::application::supervisor::{ReadinessPolicy, ReadinessTarget, SupervisorPlan};
use scout_core::domain::LaunchSpec;
use std::path::{Path, PathBuf};

pub const REDDIT_ADAPTER_BIN: &str = "scout-reddit-adapter";
pub const TWITTER_ADAPTER_BIN: &str = "scout-twitter-adapter";
pub const WEBSEARCH_ADAPTER_BIN: &str = "scout-websearch-adapter";
pub const PROXY_BIN: &str = "scout-proxy";
pub const WORKFLOW_BIN: &str = "scout-workflow";

/// Configured `bin_dir`, else the directory holding the running executable
pub fn resolve_bin_dir(config: &ScoutConfig) -> Option<PathBuf> {
    config.supervisor.bin_dir().or_else(|| {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
    })
}

/// Adapters first, proxy last; the workflow runs in the foreground.
/// `workflow_args` are passed through to the workflow driver.
pub fn supervisor_plan(
    config: &ScoutConfig,
    bin_dir: &Path,
    workflow_args: Vec<String>,
) -> SupervisorPlan {
    let endpoints = &config.endpoints;
    let services = [
        ("reddit_adapter", REDDIT_ADAPTER_BIN, &endpoints.reddit),
        ("twitter_adapter", TWITTER_ADAPTER_BIN, &endpoints.twitter),
        ("websearch_adapter", WEBSEARCH_ADAPTER_BIN, &endpoints.web_search),
        ("proxy", PROXY_BIN, &endpoints.proxy),
    ];

    let readiness = match config.supervisor.readiness {
        ReadinessMode::Delay => ReadinessPolicy::FixedDelay(config.supervisor.readiness_delay()),
        ReadinessMode::Probe => ReadinessPolicy::Probe {
            targets: services
                .iter()
                .map(|(name, _, addr)| ReadinessTarget::new(*name, base_url(addr)))
                .collect(),
            timeout: config.supervisor.probe_timeout(),
        },
    };

    SupervisorPlan {
        services: services
            .iter()
            .map(|(name, bin, _)| LaunchSpec::service(*name, bin_dir.join(bin)))
            .collect(),
        workflow: LaunchSpec::foreground("workflow", bin_dir.join(WORKFLOW_BIN))
            .with_args(workflow_args),
        readiness,
    }
}
