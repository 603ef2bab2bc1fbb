// Managed Process Domain Model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::{DomainError, Result};

/// OS process identifier
pub type Pid = u32;

/// Role of a child process in a supervised run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessRole {
    /// Long-running network service (adapter or proxy)
    Service,
    /// Foreground process the supervisor blocks on (workflow driver)
    Foreground,
}

/// Lifecycle state of a managed process
///
/// `Starting -> Running -> Terminating -> Stopped`, with two shortcuts:
/// `Starting -> Stopped` when the spawn fails and `Running -> Stopped` when
/// the child exits on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessState {
    Starting,
    Running,
    Terminating,
    Stopped,
}

impl ProcessState {
    pub fn can_transition_to(self, next: ProcessState) -> bool {
        use ProcessState::*;
        matches!(
            (self, next),
            (Starting, Running)
                | (Starting, Stopped)
                | (Running, Terminating)
                | (Running, Stopped)
                | (Terminating, Stopped)
        )
    }

    /// Validate and return the next state
    pub fn transition_to(self, next: ProcessState) -> Result<ProcessState> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(DomainError::InvalidStateTransition {
                from: self.to_string(),
                to: next.to_string(),
            })
        }
    }

    pub fn is_terminal(self) -> bool {
        self == ProcessState::Stopped
    }
}

impl std::fmt::Display for ProcessState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessState::Starting => write!(f, "STARTING"),
            ProcessState::Running => write!(f, "RUNNING"),
            ProcessState::Terminating => write!(f, "TERMINATING"),
            ProcessState::Stopped => write!(f, "STOPPED"),
        }
    }
}

/// How a process reached `Stopped`.
///
/// Only used for logging: the supervisor reports every variant as stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMethod {
    /// Exited before shutdown reached it
    Exited,
    /// Acknowledged the graceful-terminate signal within the grace period
    Graceful,
    /// Force-killed after the grace period elapsed
    Forced,
}

impl std::fmt::Display for StopMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopMethod::Exited => write!(f, "exited"),
            StopMethod::Graceful => write!(f, "graceful"),
            StopMethod::Forced => write!(f, "forced"),
        }
    }
}

/// Startup command for a child process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchSpec {
    pub name: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub role: ProcessRole,
}

impl LaunchSpec {
    pub fn service(name: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            role: ProcessRole::Service,
        }
    }

    pub fn foreground(name: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            role: ProcessRole::Foreground,
            ..Self::service(name, program)
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Point-in-time view of a managed process (for reports and assertions)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessInfo {
    pub name: String,
    pub pid: Option<Pid>,
    pub started_at: i64, // epoch ms
    pub role: ProcessRole,
    pub state: ProcessState,
}
