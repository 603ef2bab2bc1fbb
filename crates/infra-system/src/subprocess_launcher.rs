// Subprocess launcher
// reason: tokio::process for async child management, nix for POSIX signals
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use scout_core::domain::{LaunchSpec, Pid};
use scout_core::port::{ChildHandle, ExitOutcome, LaunchError, ProcessLauncher};

/// Spawns real OS processes.
///
/// Children inherit the supervisor's environment and stdio, so adapter logs
/// and the workflow prompt share the supervisor's terminal.
pub struct SubprocessLauncher {
    search_path: Option<OsString>,
}

impl SubprocessLauncher {
    /// Resolve bare program names against `$PATH`
    pub fn new() -> Self {
        Self {
            search_path: std::env::var_os("PATH"),
        }
    }

    /// Resolve bare program names against an explicit search path
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }

    fn resolve(&self, program: &Path) -> Option<PathBuf> {
        if program.components().count() > 1 || program.is_absolute() {
            return is_executable(program).then(|| program.to_path_buf());
        }
        let search_path = self.search_path.as_ref()?;
        std::env::split_paths(search_path)
            .map(|dir| dir.join(program))
            .find(|candidate| is_executable(candidate))
    }
}

impl Default for SubprocessLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[async_trait]
impl ProcessLauncher for SubprocessLauncher {
    fn locate(&self, spec: &LaunchSpec) -> Option<PathBuf> {
        let resolved = self.resolve(&spec.program);
        debug!(
            name = %spec.name,
            program = %spec.program.display(),
            resolved = ?resolved,
            "Resolved program"
        );
        resolved
    }

    async fn spawn(&self, spec: &LaunchSpec) -> Result<Box<dyn ChildHandle>, LaunchError> {
        let child = Command::new(&spec.program)
            .args(&spec.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            // Never leak a child if the supervisor itself unwinds
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    LaunchError::NotFound(spec.program.display().to_string())
                }
                _ => LaunchError::SpawnFailed(format!("{}: {}", spec.name, e)),
            })?;

        let pid = child.id();
        info!(name = %spec.name, pid = ?pid, "Spawned child process");
        Ok(Box::new(SubprocessChild {
            name: spec.name.clone(),
            pid,
            child,
            exit: None,
        }))
    }
}

/// One spawned OS child
pub struct SubprocessChild {
    name: String,
    pid: Option<Pid>,
    child: Child,
    exit: Option<ExitOutcome>,
}

impl SubprocessChild {
    fn record(&mut self, status: ExitStatus) -> ExitOutcome {
        let outcome = ExitOutcome {
            code: status.code(),
        };
        self.exit = Some(outcome);
        outcome
    }

    /// Already reaped, or exited and reapable right now
    fn has_exited(&mut self) -> bool {
        matches!(self.try_wait(), Ok(Some(_)))
    }

    #[cfg(unix)]
    fn signal(&self, signal: nix::sys::signal::Signal) -> Result<(), LaunchError> {
        use nix::errno::Errno;
        use nix::sys::signal::kill;
        use nix::unistd::Pid as NixPid;

        let Some(pid) = self.pid else {
            return Ok(());
        };
        match kill(NixPid::from_raw(pid as i32), signal) {
            Ok(()) => Ok(()),
            // Exited between the liveness check and the signal
            Err(Errno::ESRCH) => Ok(()),
            Err(e) => Err(LaunchError::Signal(format!(
                "{} to {} (pid {}) failed: {}",
                signal, self.name, pid, e
            ))),
        }
    }
}

#[async_trait]
impl ChildHandle for SubprocessChild {
    fn pid(&self) -> Option<Pid> {
        if self.exit.is_some() {
            None
        } else {
            self.pid
        }
    }

    async fn terminate(&mut self) -> Result<(), LaunchError> {
        if self.has_exited() {
            return Ok(());
        }

        #[cfg(unix)]
        {
            info!(name = %self.name, pid = ?self.pid, "Sending SIGTERM for graceful shutdown");
            self.signal(nix::sys::signal::Signal::SIGTERM)
        }

        #[cfg(not(unix))]
        {
            // No graceful signal available; terminate is a hard stop here
            warn!(name = %self.name, pid = ?self.pid, "Graceful terminate unsupported, killing");
            self.child
                .start_kill()
                .map_err(|e| LaunchError::Signal(e.to_string()))
        }
    }

    async fn kill(&mut self) -> Result<(), LaunchError> {
        if self.has_exited() {
            return Ok(());
        }
        warn!(name = %self.name, pid = ?self.pid, "Sending SIGKILL");

        #[cfg(unix)]
        {
            self.signal(nix::sys::signal::Signal::SIGKILL)
        }

        #[cfg(not(unix))]
        {
            self.child
                .start_kill()
                .map_err(|e| LaunchError::Signal(e.to_string()))
        }
    }

    async fn wait(&mut self) -> Result<ExitOutcome, LaunchError> {
        if let Some(outcome) = self.exit {
            return Ok(outcome);
        }
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| LaunchError::IoError(e.to_string()))?;
        let outcome = self.record(status);
        debug!(name = %self.name, exit_code = ?outcome.code, "Child process reaped");
        Ok(outcome)
    }

    fn try_wait(&mut self) -> Result<Option<ExitOutcome>, LaunchError> {
        if let Some(outcome) = self.exit {
            return Ok(Some(outcome));
        }
        match self.child.try_wait() {
            Ok(Some(status)) => Ok(Some(self.record(status))),
            Ok(None) => Ok(None),
            Err(e) => Err(LaunchError::IoError(e.to_string())),
        }
    }
}
