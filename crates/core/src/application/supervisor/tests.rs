use super::*;
use crate::application::interrupt::interrupt_channel;
use crate::domain::ProcessRole;
use crate::port::process_launcher::mocks::{ChildBehavior, LaunchEvent, MockLauncher};
use crate::port::readiness_probe::mocks::MockReadinessProbe;
use crate::port::time_provider::SteppingTimeProvider;

fn supervisor(launcher: Arc<MockLauncher>) -> Supervisor {
    Supervisor::new(launcher, Arc::new(SteppingTimeProvider::new(1_000)))
}

fn service(name: &str) -> LaunchSpec {
    LaunchSpec::service(name, format!("/opt/scout/bin/{name}"))
}

fn plan(services: &[&str], delay: Duration) -> SupervisorPlan {
    SupervisorPlan {
        services: services.iter().map(|s| service(s)).collect(),
        workflow: LaunchSpec::foreground("workflow", "/opt/scout/bin/workflow"),
        readiness: ReadinessPolicy::FixedDelay(delay),
    }
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_every_process() {
    let launcher = Arc::new(MockLauncher::new());
    let mut sup = supervisor(launcher.clone());

    for name in ["reddit", "twitter", "web", "proxy"] {
        assert!(sup.launch(service(name)).await.is_some());
    }
    assert!(sup
        .processes()
        .iter()
        .all(|p| p.state == ProcessState::Running));

    let stopped = sup.shutdown().await;

    assert_eq!(stopped, 4);
    assert!(sup
        .processes()
        .iter()
        .all(|p| p.state == ProcessState::Stopped));
    assert!(!launcher
        .events()
        .iter()
        .any(|e| matches!(e, LaunchEvent::Kill(_))));
}

#[tokio::test(start_paused = true)]
async fn test_stubborn_process_is_force_killed_after_grace() {
    let launcher = Arc::new(
        MockLauncher::new().with_behavior("stubborn", ChildBehavior::IgnoresTerminate),
    );
    let mut sup = supervisor(launcher.clone()).with_grace_period(Duration::from_secs(5));
    sup.launch(service("stubborn")).await;

    let start = Instant::now();
    sup.shutdown().await;

    assert_eq!(start.elapsed(), Duration::from_secs(5));
    assert_eq!(sup.processes()[0].state, ProcessState::Stopped);
    assert_eq!(
        launcher.events(),
        vec![
            LaunchEvent::Spawned("stubborn".into()),
            LaunchEvent::Terminate("stubborn".into()),
            LaunchEvent::Kill("stubborn".into()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_sequential_shutdown_in_launch_order() {
    let launcher = Arc::new(
        MockLauncher::new()
            .with_behavior("a", ChildBehavior::IgnoresTerminate)
            .with_behavior("b", ChildBehavior::IgnoresTerminate),
    );
    let mut sup = supervisor(launcher.clone()).with_grace_period(Duration::from_secs(5));
    sup.launch(service("a")).await;
    sup.launch(service("b")).await;

    let start = Instant::now();
    assert_eq!(sup.shutdown().await, 2);

    // Each process gets its full grace period before the next one starts
    assert_eq!(start.elapsed(), Duration::from_secs(10));
    let signals: Vec<_> = launcher
        .events()
        .into_iter()
        .filter(|e| !matches!(e, LaunchEvent::Spawned(_)))
        .collect();
    assert_eq!(
        signals,
        vec![
            LaunchEvent::Terminate("a".into()),
            LaunchEvent::Kill("a".into()),
            LaunchEvent::Terminate("b".into()),
            LaunchEvent::Kill("b".into()),
        ]
    );
}

#[tokio::test]
async fn test_missing_program_is_skipped() {
    let launcher = Arc::new(MockLauncher::new().with_missing("twitter"));
    let mut sup = supervisor(launcher.clone());

    assert!(sup.launch(service("reddit")).await.is_some());
    assert!(sup.launch(service("twitter")).await.is_none());
    assert!(sup.launch(service("web")).await.is_some());

    let names: Vec<_> = sup.processes().into_iter().map(|p| p.name).collect();
    assert_eq!(names, vec!["reddit", "web"]);
    assert_eq!(sup.skipped(), ["twitter".to_string()]);
}

#[tokio::test]
async fn test_spawn_failure_is_skipped() {
    let launcher = Arc::new(MockLauncher::new().with_spawn_failure("proxy"));
    let mut sup = supervisor(launcher);

    assert!(sup.launch(service("proxy")).await.is_none());
    assert!(sup.launch(service("reddit")).await.is_some());
    assert_eq!(sup.processes().len(), 1);
    assert_eq!(sup.skipped(), ["proxy".to_string()]);
}

#[tokio::test]
async fn test_launch_records_pid_and_start_time() {
    let launcher = Arc::new(MockLauncher::new());
    let mut sup = supervisor(launcher);

    let info = sup.launch(service("reddit")).await.unwrap();

    assert_eq!(info.pid, Some(1000));
    assert_eq!(info.started_at, 1_000);
    assert_eq!(info.role, ProcessRole::Service);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_is_idempotent() {
    let launcher = Arc::new(MockLauncher::new());
    let mut sup = supervisor(launcher.clone());
    sup.launch(service("reddit")).await;

    assert_eq!(sup.shutdown().await, 1);
    let events_after_first = launcher.events().len();
    assert_eq!(sup.shutdown().await, 1);

    assert_eq!(launcher.events().len(), events_after_first);
}

#[tokio::test(start_paused = true)]
async fn test_already_exited_process_is_not_signalled() {
    let launcher =
        Arc::new(MockLauncher::new().with_behavior("crashy", ChildBehavior::ExitsImmediately(1)));
    let mut sup = supervisor(launcher.clone());
    sup.launch(service("crashy")).await;

    sup.shutdown().await;

    assert_eq!(sup.processes()[0].state, ProcessState::Stopped);
    assert_eq!(launcher.events(), vec![LaunchEvent::Spawned("crashy".into())]);
}

#[tokio::test(start_paused = true)]
async fn test_run_completes_workflow_then_stops_services() {
    let launcher = Arc::new(
        MockLauncher::new().with_behavior("workflow", ChildBehavior::ExitsImmediately(0)),
    );
    let mut sup = supervisor(launcher.clone());
    let (_tx, token) = interrupt_channel();

    let start = Instant::now();
    let report = sup
        .run(plan(&["reddit", "proxy"], Duration::from_secs(10)), token)
        .await;

    assert_eq!(report.workflow, WorkflowOutcome::Completed);
    assert_eq!(report.stopped, 3);
    assert!(report.all_stopped());
    assert!(start.elapsed() >= Duration::from_secs(10));
    assert_eq!(
        launcher.events(),
        vec![
            LaunchEvent::Spawned("reddit".into()),
            LaunchEvent::Spawned("proxy".into()),
            LaunchEvent::Spawned("workflow".into()),
            LaunchEvent::Terminate("reddit".into()),
            LaunchEvent::Terminate("proxy".into()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_workflow_failure_still_shuts_down() {
    let launcher = Arc::new(
        MockLauncher::new().with_behavior("workflow", ChildBehavior::ExitsImmediately(2)),
    );
    let mut sup = supervisor(launcher);
    let (_tx, token) = interrupt_channel();

    let report = sup.run(plan(&["reddit"], Duration::from_secs(1)), token).await;

    assert_eq!(
        report.workflow,
        WorkflowOutcome::Failed("workflow exited with code 2".into())
    );
    assert!(report.all_stopped());
}

#[tokio::test(start_paused = true)]
async fn test_missing_workflow_is_reported_as_failure() {
    let launcher = Arc::new(MockLauncher::new().with_missing("workflow"));
    let mut sup = supervisor(launcher);
    let (_tx, token) = interrupt_channel();

    let report = sup.run(plan(&["reddit"], Duration::from_secs(1)), token).await;

    assert!(matches!(report.workflow, WorkflowOutcome::Failed(_)));
    assert_eq!(report.skipped, vec!["workflow".to_string()]);
    assert_eq!(report.stopped, 1);
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_during_readiness_wait() {
    let launcher = Arc::new(MockLauncher::new());
    let mut sup = supervisor(launcher.clone());
    let (tx, token) = interrupt_channel();

    tokio::spawn(async move {
        sleep(Duration::from_secs(2)).await;
        tx.interrupt();
    });
    let report = sup
        .run(plan(&["reddit", "twitter"], Duration::from_secs(10)), token)
        .await;

    assert_eq!(report.workflow, WorkflowOutcome::NotRun);
    assert!(report.all_stopped());
    assert!(!launcher
        .events()
        .contains(&LaunchEvent::Spawned("workflow".into())));
}

#[tokio::test(start_paused = true)]
async fn test_interrupt_stops_running_workflow() {
    let launcher = Arc::new(
        MockLauncher::new().with_behavior("workflow", ChildBehavior::RunsUntilSignalled(130)),
    );
    let mut sup = supervisor(launcher.clone());
    let (tx, token) = interrupt_channel();

    tokio::spawn(async move {
        sleep(Duration::from_secs(5)).await;
        tx.interrupt();
    });
    let report = sup
        .run(plan(&["reddit"], Duration::from_secs(1)), token)
        .await;

    assert_eq!(report.workflow, WorkflowOutcome::Interrupted);
    assert_eq!(report.stopped, 2);
    assert!(launcher
        .events()
        .contains(&LaunchEvent::Terminate("workflow".into())));
}

#[tokio::test(start_paused = true)]
async fn test_probe_policy_reports_unready_services() {
    let launcher = Arc::new(MockLauncher::new());
    let probe = Arc::new(MockReadinessProbe::new().ready_after("http://127.0.0.1:8001", 2));
    let sup = supervisor(launcher).with_probe(probe.clone());

    let policy = ReadinessPolicy::Probe {
        targets: vec![
            ReadinessTarget::new("reddit", "http://127.0.0.1:8001"),
            ReadinessTarget::new("twitter", "http://127.0.0.1:8002"),
        ],
        timeout: Duration::from_secs(3),
    };
    let not_ready = sup.await_readiness(&policy).await;

    assert_eq!(not_ready, vec!["twitter".to_string()]);
    assert_eq!(probe.calls("http://127.0.0.1:8001"), 2);
}

/// Foreground child that dies from the same Ctrl+C that interrupts the supervisor
struct SharedSigintLauncher {
    interrupt: Arc<crate::application::interrupt::InterruptSender>,
}

struct SigintChild {
    interrupt: Arc<crate::application::interrupt::InterruptSender>,
}

#[async_trait::async_trait]
impl ProcessLauncher for SharedSigintLauncher {
    fn locate(&self, spec: &LaunchSpec) -> Option<std::path::PathBuf> {
        Some(spec.program.clone())
    }

    async fn spawn(
        &self,
        _spec: &LaunchSpec,
    ) -> Result<Box<dyn crate::port::ChildHandle>, crate::port::LaunchError> {
        Ok(Box::new(SigintChild {
            interrupt: Arc::clone(&self.interrupt),
        }))
    }
}

#[async_trait::async_trait]
impl crate::port::ChildHandle for SigintChild {
    fn pid(&self) -> Option<crate::domain::Pid> {
        Some(4242)
    }

    async fn terminate(&mut self) -> Result<(), crate::port::LaunchError> {
        Ok(())
    }

    async fn kill(&mut self) -> Result<(), crate::port::LaunchError> {
        Ok(())
    }

    async fn wait(&mut self) -> Result<crate::port::ExitOutcome, crate::port::LaunchError> {
        self.interrupt.interrupt();
        Ok(crate::port::ExitOutcome { code: None })
    }

    fn try_wait(&mut self) -> Result<Option<crate::port::ExitOutcome>, crate::port::LaunchError> {
        Ok(Some(crate::port::ExitOutcome { code: None }))
    }
}

#[tokio::test(start_paused = true)]
async fn test_workflow_killed_by_ctrl_c_is_reported_as_interrupted() {
    let (tx, token) = interrupt_channel();
    let launcher = Arc::new(SharedSigintLauncher {
        interrupt: Arc::new(tx),
    });
    let mut sup = Supervisor::new(launcher, Arc::new(SteppingTimeProvider::new(1_000)));

    let report = sup.run(plan(&[], Duration::from_secs(1)), token).await;

    assert_eq!(report.workflow, WorkflowOutcome::Interrupted);
    assert_eq!(report.stopped, 1);
    assert!(report.all_stopped());
}
