//! Supervisor shutdown against real child processes
//!
//! Uses `sh` and `sleep`, so these tests only run on Unix.
#![cfg(unix)]

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use scout_core::application::interrupt::{interrupt_channel, InterruptToken};
use scout_core::application::supervisor::{
    ReadinessPolicy, Supervisor, SupervisorPlan, WorkflowOutcome,
};
use scout_core::domain::{LaunchSpec, Pid, ProcessState};
use scout_core::port::time_provider::SystemTimeProvider;
use scout_core::port::{ChildHandle, ExitOutcome, LaunchError, ProcessLauncher};
use scout_infra_system::SubprocessLauncher;

/// Ignores SIGTERM; `exec` keeps the ignored disposition for `sleep`
const STUBBORN: &str = "trap '' TERM; exec sleep 30";
const COOPERATIVE: &str = "exec sleep 30";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Terminate,
    Kill,
}

type SignalLog = Arc<Mutex<Vec<(String, Signal)>>>;

/// Real launcher that records every signal it forwards
struct RecordingLauncher {
    inner: SubprocessLauncher,
    log: SignalLog,
}

impl RecordingLauncher {
    fn new() -> Self {
        Self {
            inner: SubprocessLauncher::new(),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn signals(&self) -> Vec<(String, Signal)> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessLauncher for RecordingLauncher {
    fn locate(&self, spec: &LaunchSpec) -> Option<PathBuf> {
        self.inner.locate(spec)
    }

    async fn spawn(&self, spec: &LaunchSpec) -> Result<Box<dyn ChildHandle>, LaunchError> {
        let inner = self.inner.spawn(spec).await?;
        Ok(Box::new(RecordingChild {
            name: spec.name.clone(),
            inner,
            log: Arc::clone(&self.log),
        }))
    }
}

struct RecordingChild {
    name: String,
    inner: Box<dyn ChildHandle>,
    log: SignalLog,
}

#[async_trait]
impl ChildHandle for RecordingChild {
    fn pid(&self) -> Option<Pid> {
        self.inner.pid()
    }

    async fn terminate(&mut self) -> Result<(), LaunchError> {
        self.log
            .lock()
            .unwrap()
            .push((self.name.clone(), Signal::Terminate));
        self.inner.terminate().await
    }

    async fn kill(&mut self) -> Result<(), LaunchError> {
        self.log
            .lock()
            .unwrap()
            .push((self.name.clone(), Signal::Kill));
        self.inner.kill().await
    }

    async fn wait(&mut self) -> Result<ExitOutcome, LaunchError> {
        self.inner.wait().await
    }

    fn try_wait(&mut self) -> Result<Option<ExitOutcome>, LaunchError> {
        self.inner.try_wait()
    }
}

fn sh(name: &str, script: &str) -> LaunchSpec {
    LaunchSpec::service(name, "sh").with_args(["-c", script])
}

fn is_alive(pid: Pid) -> bool {
    std::process::Command::new("kill")
        .args(["-0", &pid.to_string()])
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Give `sh` time to install its trap before it gets signalled
async fn settle() {
    tokio::time::sleep(Duration::from_millis(300)).await;
}

#[tokio::test]
async fn test_stubborn_children_are_force_killed_in_order() {
    let launcher = Arc::new(RecordingLauncher::new());
    let grace = Duration::from_secs(1);
    let mut sup = Supervisor::new(launcher.clone(), Arc::new(SystemTimeProvider))
        .with_grace_period(grace);

    let a = sup.launch(sh("a", STUBBORN)).await.expect("a starts");
    let b = sup.launch(sh("b", STUBBORN)).await.expect("b starts");
    settle().await;

    let start = Instant::now();
    let stopped = sup.shutdown().await;
    let elapsed = start.elapsed();

    assert_eq!(stopped, 2);
    assert!(elapsed >= grace * 2, "each child gets its grace period: {elapsed:?}");
    assert!(elapsed < grace * 2 + Duration::from_secs(2), "took {elapsed:?}");
    assert_eq!(
        launcher.signals(),
        vec![
            ("a".to_string(), Signal::Terminate),
            ("a".to_string(), Signal::Kill),
            ("b".to_string(), Signal::Terminate),
            ("b".to_string(), Signal::Kill),
        ]
    );
    for info in [a, b] {
        assert!(!is_alive(info.pid.unwrap()), "{} still running", info.name);
    }
    assert!(sup
        .processes()
        .iter()
        .all(|p| p.state == ProcessState::Stopped));
}

#[tokio::test]
async fn test_cooperative_child_stops_without_kill() {
    let launcher = Arc::new(RecordingLauncher::new());
    let mut sup = Supervisor::new(launcher.clone(), Arc::new(SystemTimeProvider))
        .with_grace_period(Duration::from_secs(5));
    let info = sup.launch(sh("calm", COOPERATIVE)).await.unwrap();

    let start = Instant::now();
    sup.shutdown().await;

    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(
        launcher.signals(),
        vec![("calm".to_string(), Signal::Terminate)]
    );
    assert!(!is_alive(info.pid.unwrap()));
}

#[tokio::test]
async fn test_full_run_with_real_workflow() {
    let launcher = Arc::new(RecordingLauncher::new());
    let mut sup = Supervisor::new(launcher.clone(), Arc::new(SystemTimeProvider))
        .with_grace_period(Duration::from_secs(1));
    let plan = SupervisorPlan {
        services: vec![
            sh("reddit_adapter", COOPERATIVE),
            LaunchSpec::service("ghost", "/nonexistent/scout-ghost"),
            sh("proxy", STUBBORN),
        ],
        workflow: LaunchSpec::foreground("workflow", "sh").with_args(["-c", "sleep 0.5; exit 0"]),
        readiness: ReadinessPolicy::FixedDelay(Duration::from_millis(300)),
    };

    let report = sup.run(plan, InterruptToken::never()).await;

    assert_eq!(report.workflow, WorkflowOutcome::Completed);
    assert_eq!(report.skipped, vec!["ghost".to_string()]);
    assert_eq!(report.processes.len(), 3);
    assert!(report.all_stopped());
    for info in &report.processes {
        assert!(!is_alive(info.pid.unwrap()), "{} still running", info.name);
    }
    // The workflow exited on its own and is never signalled
    assert!(!launcher.signals().iter().any(|(name, _)| name == "workflow"));
}

#[tokio::test]
async fn test_interrupt_tears_down_running_workflow() {
    let launcher = Arc::new(RecordingLauncher::new());
    let mut sup = Supervisor::new(launcher.clone(), Arc::new(SystemTimeProvider))
        .with_grace_period(Duration::from_secs(1));
    let plan = SupervisorPlan {
        services: vec![sh("twitter_adapter", COOPERATIVE)],
        workflow: LaunchSpec::foreground("workflow", "sh").with_args(["-c", COOPERATIVE]),
        readiness: ReadinessPolicy::FixedDelay(Duration::from_millis(100)),
    };
    let (tx, token) = interrupt_channel();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(1)).await;
        tx.interrupt();
    });

    let start = Instant::now();
    let report = sup.run(plan, token).await;

    assert_eq!(report.workflow, WorkflowOutcome::Interrupted);
    assert_eq!(report.stopped, 2);
    assert!(start.elapsed() < Duration::from_secs(5));
    for info in &report.processes {
        assert!(!is_alive(info.pid.unwrap()));
    }
}
