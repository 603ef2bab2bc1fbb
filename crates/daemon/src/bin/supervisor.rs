//! Scout supervisor
//!
//! Starts the three search adapters and the proxy, waits for them to come
//! up, runs the workflow driver in the foreground, then stops every child
//! (graceful terminate, forced kill after the grace period).
//! Arguments are passed through to the workflow driver.

use anyhow::{Context, Result};
use scout_core::application::supervisor::{Supervisor, WorkflowOutcome};
use scout_core::port::time_provider::SystemTimeProvider;
use scout_daemon::plan::{resolve_bin_dir, supervisor_plan};
use scout_daemon::{logging, signals, ScoutConfig};
use scout_infra_http::HttpReadinessProbe;
use scout_infra_system::SubprocessLauncher;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info, warn};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();
    let config = ScoutConfig::load()?;
    let _guard = logging::init("supervisor", &config.log)?;
    info!("Scout supervisor v{} starting", VERSION);

    let bin_dir = resolve_bin_dir(&config).context("cannot determine the Scout bin directory")?;
    let workflow_args: Vec<String> = std::env::args().skip(1).collect();
    let plan = supervisor_plan(&config, &bin_dir, workflow_args);
    info!(bin_dir = %bin_dir.display(), services = plan.services.len(), "Supervisor plan ready");

    let mut supervisor = Supervisor::new(
        Arc::new(SubprocessLauncher::new()),
        Arc::new(SystemTimeProvider),
    )
    .with_grace_period(config.supervisor.grace_period())
    .with_probe(Arc::new(HttpReadinessProbe::new()));

    let report = supervisor.run(plan, signals::interrupt_on_signals()).await;

    for name in &report.skipped {
        warn!(name = %name, "Process was not started");
    }
    for name in &report.not_ready {
        warn!(name = %name, "Service never reported ready");
    }
    info!(
        launched = report.processes.len(),
        stopped = report.stopped,
        workflow = ?report.workflow,
        "Supervisor finished"
    );

    Ok(match report.workflow {
        WorkflowOutcome::Completed => ExitCode::SUCCESS,
        WorkflowOutcome::Failed(reason) => {
            error!(reason = %reason, "Workflow failed");
            ExitCode::FAILURE
        }
        WorkflowOutcome::Interrupted | WorkflowOutcome::NotRun => ExitCode::from(130),
    })
}
