// Supervisor - launches services, runs the foreground workflow, stops everything

pub mod constants;
mod managed;
mod readiness;

#[cfg(test)]
mod tests;

pub use managed::ManagedProcess;
pub use readiness::{ReadinessPolicy, ReadinessTarget};

use crate::application::interrupt::InterruptToken;
use crate::domain::{LaunchSpec, ProcessInfo, ProcessState, StopMethod};
use crate::port::{ProcessLauncher, ReadinessProbe, TimeProvider};
use constants::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, error, info, warn};

/// Upper bound for reaping a child after forced-kill (1s)
const KILL_REAP_TIMEOUT: Duration = Duration::from_secs(1);

/// Everything one supervised run needs
#[derive(Debug, Clone)]
pub struct SupervisorPlan {
    /// Started in this order, stopped in this order
    pub services: Vec<LaunchSpec>,
    /// Foreground process the supervisor blocks on
    pub workflow: LaunchSpec,
    pub readiness: ReadinessPolicy,
}

/// Result of the foreground phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// The run was interrupted before the workflow was started
    NotRun,
    Completed,
    Failed(String),
    Interrupted,
}

/// Summary of a supervised run
#[derive(Debug, Clone)]
pub struct SupervisorReport {
    pub processes: Vec<ProcessInfo>,
    pub skipped: Vec<String>,
    pub not_ready: Vec<String>,
    pub workflow: WorkflowOutcome,
    pub stopped: usize,
}

impl SupervisorReport {
    /// True when no launched process is left running
    pub fn all_stopped(&self) -> bool {
        self.processes.iter().all(|p| p.state.is_terminal())
    }
}

/// Process Supervisor
pub struct Supervisor {
    launcher: Arc<dyn ProcessLauncher>,
    time_provider: Arc<dyn TimeProvider>,
    probe: Option<Arc<dyn ReadinessProbe>>,
    grace_period: Duration,
    processes: Vec<ManagedProcess>,
    skipped: Vec<String>,
}

impl Supervisor {
    pub fn new(launcher: Arc<dyn ProcessLauncher>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            launcher,
            time_provider,
            probe: None,
            grace_period: DEFAULT_GRACE_PERIOD,
            processes: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Probe used by `ReadinessPolicy::Probe`
    pub fn with_probe(mut self, probe: Arc<dyn ReadinessProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn processes(&self) -> Vec<ProcessInfo> {
        self.processes.iter().map(ManagedProcess::info).collect()
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// Full run: bring-up and foreground phase race the interrupt; both paths
    /// end in the same `shutdown()`.
    pub async fn run(
        &mut self,
        plan: SupervisorPlan,
        mut interrupt: InterruptToken,
    ) -> SupervisorReport {
        let mut not_ready = Vec::new();

        let workflow = {
            let bring_up = self.bring_up(&plan, &mut not_ready);
            tokio::select! {
                biased;
                _ = interrupt.interrupted() => {
                    warn!("Interrupt received, shutting down processes");
                    WorkflowOutcome::Interrupted
                }
                outcome = bring_up => outcome,
            }
        };
        // A terminal Ctrl+C also reaches the foreground child, which can exit
        // before the interrupt arm is polled
        let workflow = match workflow {
            WorkflowOutcome::Failed(reason) if interrupt.is_interrupted() => {
                warn!(reason = %reason, "Workflow ended by the interrupt");
                WorkflowOutcome::Interrupted
            }
            WorkflowOutcome::Interrupted if !self.has_foreground() => WorkflowOutcome::NotRun,
            other => other,
        };

        let stopped = self.shutdown().await;

        SupervisorReport {
            processes: self.processes(),
            skipped: self.skipped.clone(),
            not_ready,
            workflow,
            stopped,
        }
    }

    async fn bring_up(
        &mut self,
        plan: &SupervisorPlan,
        not_ready: &mut Vec<String>,
    ) -> WorkflowOutcome {
        for spec in &plan.services {
            self.launch(spec.clone()).await;
        }
        not_ready.extend(self.await_readiness(&plan.readiness).await);
        self.run_workflow(plan.workflow.clone()).await
    }

    fn has_foreground(&self) -> bool {
        self.processes
            .iter()
            .any(|p| p.spec().role == crate::domain::ProcessRole::Foreground)
    }

    /// Start one child. A missing program or spawn failure is logged and
    /// skipped; it never aborts the run.
    pub async fn launch(&mut self, spec: LaunchSpec) -> Option<ProcessInfo> {
        debug!(name = %spec.name, program = %spec.program.display(), "Checking if program exists");
        let Some(resolved) = self.launcher.locate(&spec) else {
            error!(
                name = %spec.name,
                program = %spec.program.display(),
                "Program not found, skipping"
            );
            self.skipped.push(spec.name);
            return None;
        };
        let spec = LaunchSpec {
            program: resolved,
            ..spec
        };

        info!(
            name = %spec.name,
            program = %spec.program.display(),
            args = ?spec.args,
            "Starting process"
        );
        let handle = match self.launcher.spawn(&spec).await {
            Ok(handle) => handle,
            Err(e) => {
                error!(name = %spec.name, error = %e, "Failed to start process");
                self.skipped.push(spec.name);
                return None;
            }
        };

        let started_at = self.time_provider.now_millis();
        match ManagedProcess::started(spec, handle, started_at) {
            Ok(process) => {
                debug!(name = %process.name(), pid = ?process.pid(), "Process started");
                let info = process.info();
                self.processes.push(process);
                Some(info)
            }
            Err(e) => {
                error!(error = %e, "Could not register started process");
                None
            }
        }
    }

    /// Block until services are considered ready. Returns the names of
    /// services that never became ready (always empty for a fixed delay).
    pub async fn await_readiness(&self, policy: &ReadinessPolicy) -> Vec<String> {
        match policy {
            ReadinessPolicy::FixedDelay(delay) => {
                info!(delay_ms = delay.as_millis() as u64, "Waiting for services to initialize");
                sleep(*delay).await;
                debug!("Finished waiting for service initialization");
                Vec::new()
            }
            ReadinessPolicy::Probe { targets, timeout } => {
                let Some(probe) = self.probe.as_deref() else {
                    warn!("Probe readiness requested without a probe, not waiting");
                    return Vec::new();
                };
                info!(
                    services = targets.len(),
                    timeout_ms = timeout.as_millis() as u64,
                    "Probing services for readiness"
                );
                let deadline = Instant::now() + *timeout;
                let mut not_ready = Vec::new();
                for target in targets {
                    if !readiness::wait_until_ready(probe, target, deadline).await {
                        error!(
                            name = %target.name,
                            url = %target.base_url,
                            "Service not ready after probing"
                        );
                        not_ready.push(target.name.clone());
                    }
                }
                not_ready
            }
        }
    }

    /// Launch the foreground process and block until it exits
    pub async fn run_workflow(&mut self, spec: LaunchSpec) -> WorkflowOutcome {
        let name = spec.name.clone();
        if self.launch(spec).await.is_none() {
            error!(name = %name, "Workflow could not be started");
            return WorkflowOutcome::Failed(format!("{name} could not be started"));
        }
        let Some(process) = self.processes.last_mut() else {
            return WorkflowOutcome::Failed(format!("{name} could not be started"));
        };

        match process.handle_mut().wait().await {
            Ok(exit) => {
                mark(process, ProcessState::Stopped);
                if exit.success() {
                    info!(name = %name, "Workflow completed");
                    WorkflowOutcome::Completed
                } else {
                    error!(name = %name, exit_code = ?exit.code, "Workflow failed");
                    WorkflowOutcome::Failed(match exit.code {
                        Some(code) => format!("{name} exited with code {code}"),
                        None => format!("{name} was terminated by a signal"),
                    })
                }
            }
            Err(e) => {
                error!(name = %name, error = %e, "Error waiting for workflow");
                WorkflowOutcome::Failed(e.to_string())
            }
        }
    }

    /// Stop every managed process in launch order. Idempotent: processes
    /// already `Stopped` are skipped. Returns the number of stopped processes.
    pub async fn shutdown(&mut self) -> usize {
        let pending = self
            .processes
            .iter()
            .filter(|p| !p.state().is_terminal())
            .count();
        if pending > 0 {
            info!(pending, "Shutting down processes");
            for process in self.processes.iter_mut() {
                stop_process(process, self.grace_period).await;
            }
            info!("All processes stopped");
        }

        self.processes
            .iter()
            .filter(|p| p.state().is_terminal())
            .count()
    }
}

fn mark(process: &mut ManagedProcess, next: ProcessState) {
    if let Err(e) = process.set_state(next) {
        warn!(name = %process.name(), error = %e, "Unexpected state transition");
    }
}

/// Graceful-terminate, wait up to `grace`, then forced-kill.
/// Every branch ends in `Stopped`.
async fn stop_process(process: &mut ManagedProcess, grace: Duration) -> Option<StopMethod> {
    if process.state().is_terminal() {
        return None;
    }
    let name = process.name().to_string();
    let pid = process.pid();

    match process.handle_mut().try_wait() {
        Ok(Some(exit)) => {
            info!(name = %name, pid = ?pid, exit_code = ?exit.code, "Process already exited");
            mark(process, ProcessState::Stopped);
            return Some(StopMethod::Exited);
        }
        Ok(None) => {}
        Err(e) => warn!(name = %name, pid = ?pid, error = %e, "Could not check process status"),
    }

    mark(process, ProcessState::Terminating);
    debug!(name = %name, pid = ?pid, "Terminating process");
    let handle = process.handle_mut();
    if let Err(e) = handle.terminate().await {
        warn!(name = %name, pid = ?pid, error = %e, "Graceful terminate failed");
    }

    let method = match timeout(grace, handle.wait()).await {
        Ok(Ok(_)) => {
            info!(name = %name, pid = ?pid, "Process terminated gracefully");
            StopMethod::Graceful
        }
        Ok(Err(e)) => {
            warn!(name = %name, pid = ?pid, error = %e, "Wait failed, force killing");
            force_kill(handle, &name).await;
            StopMethod::Forced
        }
        Err(_) => {
            warn!(
                name = %name,
                pid = ?pid,
                grace_ms = grace.as_millis() as u64,
                "Process did not terminate, force killing"
            );
            force_kill(handle, &name).await;
            StopMethod::Forced
        }
    };

    mark(process, ProcessState::Stopped);
    Some(method)
}

async fn force_kill(handle: &mut dyn crate::port::ChildHandle, name: &str) {
    if let Err(e) = handle.kill().await {
        warn!(name = %name, error = %e, "Forced kill failed");
    }
    match timeout(KILL_REAP_TIMEOUT, handle.wait()).await {
        Ok(Ok(_)) => info!(name = %name, "Force killed process"),
        Ok(Err(e)) => warn!(name = %name, error = %e, "Could not reap killed process"),
        Err(_) => warn!(name = %name, "Killed process not reaped in time"),
    }
}
