// Process Launcher Port
// Abstraction over spawning and signalling OS child processes

use crate::domain::{LaunchSpec, Pid};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// How a child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitOutcome {
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

impl ExitOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Launch / signalling errors
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Program not found: {0}")]
    NotFound(String),

    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Signal failed: {0}")]
    Signal(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Handle to one spawned child
#[async_trait]
pub trait ChildHandle: Send {
    /// OS process id (None once the child has been reaped)
    fn pid(&self) -> Option<Pid>;

    /// Send the graceful-terminate signal (SIGTERM on Unix)
    async fn terminate(&mut self) -> Result<(), LaunchError>;

    /// Send the forced-kill signal (SIGKILL on Unix)
    async fn kill(&mut self) -> Result<(), LaunchError>;

    /// Wait for the child to exit. Cancel-safe.
    async fn wait(&mut self) -> Result<ExitOutcome, LaunchError>;

    /// Non-blocking exit check
    fn try_wait(&mut self) -> Result<Option<ExitOutcome>, LaunchError>;
}

/// Process Launcher trait
///
/// Implementations:
/// - SubprocessLauncher: tokio::process + nix signals
/// - MockLauncher: scripted children for supervisor tests
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Resolve the program on disk; `None` when it does not exist
    fn locate(&self, spec: &LaunchSpec) -> Option<PathBuf>;

    /// Spawn the child with the current environment inherited
    ///
    /// # Errors
    /// - LaunchError::SpawnFailed if the OS refuses to start the process
    async fn spawn(&self, spec: &LaunchSpec) -> Result<Box<dyn ChildHandle>, LaunchError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::sync::watch;

    /// How a mock child reacts to signals
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum ChildBehavior {
        /// Exits as soon as it receives graceful-terminate
        Cooperative,
        /// Ignores graceful-terminate; only forced-kill stops it
        IgnoresTerminate,
        /// Exits on its own with the given code right after spawn
        ExitsImmediately(i32),
        /// Never exits on its own, exits with the given code when terminated
        RunsUntilSignalled(i32),
    }

    /// Signal or lifecycle event observed by the mock
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum LaunchEvent {
        Spawned(String),
        Terminate(String),
        Kill(String),
    }

    /// Shared event log
    pub type EventLog = Arc<Mutex<Vec<LaunchEvent>>>;

    /// Mock Process Launcher for testing
    pub struct MockLauncher {
        behaviors: Mutex<Vec<(String, ChildBehavior)>>,
        missing: HashSet<String>,
        failing: HashSet<String>,
        next_pid: AtomicU32,
        events: EventLog,
    }

    impl MockLauncher {
        pub fn new() -> Self {
            Self {
                behaviors: Mutex::new(Vec::new()),
                missing: HashSet::new(),
                failing: HashSet::new(),
                next_pid: AtomicU32::new(1000),
                events: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Give children named `name` a specific behavior (default: Cooperative)
        pub fn with_behavior(self, name: impl Into<String>, behavior: ChildBehavior) -> Self {
            self.behaviors.lock().unwrap().push((name.into(), behavior));
            self
        }

        /// Pretend the program for `name` does not exist on disk
        pub fn with_missing(mut self, name: impl Into<String>) -> Self {
            self.missing.insert(name.into());
            self
        }

        /// Make spawning `name` fail
        pub fn with_spawn_failure(mut self, name: impl Into<String>) -> Self {
            self.failing.insert(name.into());
            self
        }

        pub fn events(&self) -> Vec<LaunchEvent> {
            self.events.lock().unwrap().clone()
        }

        fn behavior_for(&self, name: &str) -> ChildBehavior {
            self.behaviors
                .lock()
                .unwrap()
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, b)| *b)
                .unwrap_or(ChildBehavior::Cooperative)
        }
    }

    impl Default for MockLauncher {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl ProcessLauncher for MockLauncher {
        fn locate(&self, spec: &LaunchSpec) -> Option<PathBuf> {
            if self.missing.contains(&spec.name) {
                None
            } else {
                Some(spec.program.clone())
            }
        }

        async fn spawn(&self, spec: &LaunchSpec) -> Result<Box<dyn ChildHandle>, LaunchError> {
            if self.failing.contains(&spec.name) {
                return Err(LaunchError::SpawnFailed(format!(
                    "mock refused to spawn {}",
                    spec.name
                )));
            }
            let behavior = self.behavior_for(&spec.name);
            let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);
            self.events
                .lock()
                .unwrap()
                .push(LaunchEvent::Spawned(spec.name.clone()));

            let initial = match behavior {
                ChildBehavior::ExitsImmediately(code) => Some(ExitOutcome { code: Some(code) }),
                _ => None,
            };
            let (tx, _) = watch::channel(initial);
            Ok(Box::new(MockChild {
                name: spec.name.clone(),
                pid,
                behavior,
                exit: tx,
                events: Arc::clone(&self.events),
            }))
        }
    }

    /// Scripted child process
    pub struct MockChild {
        name: String,
        pid: Pid,
        behavior: ChildBehavior,
        exit: watch::Sender<Option<ExitOutcome>>,
        events: EventLog,
    }

    impl MockChild {
        fn record(&self, event: LaunchEvent) {
            self.events.lock().unwrap().push(event);
        }

        fn exit_with(&self, code: Option<i32>) {
            if self.exit.borrow().is_none() {
                self.exit.send_replace(Some(ExitOutcome { code }));
            }
        }
    }

    #[async_trait]
    impl ChildHandle for MockChild {
        fn pid(&self) -> Option<Pid> {
            Some(self.pid)
        }

        async fn terminate(&mut self) -> Result<(), LaunchError> {
            self.record(LaunchEvent::Terminate(self.name.clone()));
            match self.behavior {
                ChildBehavior::Cooperative => self.exit_with(None),
                ChildBehavior::RunsUntilSignalled(code) => self.exit_with(Some(code)),
                ChildBehavior::IgnoresTerminate | ChildBehavior::ExitsImmediately(_) => {}
            }
            Ok(())
        }

        async fn kill(&mut self) -> Result<(), LaunchError> {
            self.record(LaunchEvent::Kill(self.name.clone()));
            self.exit_with(None);
            Ok(())
        }

        async fn wait(&mut self) -> Result<ExitOutcome, LaunchError> {
            let mut rx = self.exit.subscribe();
            let outcome = rx
                .wait_for(Option::is_some)
                .await
                .map_err(|e| LaunchError::IoError(e.to_string()))?;
            Ok((*outcome).unwrap_or(ExitOutcome { code: None }))
        }

        fn try_wait(&mut self) -> Result<Option<ExitOutcome>, LaunchError> {
            Ok(*self.exit.borrow())
        }
    }
}
