// Managed Process - a spawned child plus its lifecycle bookkeeping

use crate::domain::{LaunchSpec, Pid, ProcessInfo, ProcessState};
use crate::error::Result;
use crate::port::ChildHandle;
use tracing::debug;

/// Owned exclusively by the Supervisor
pub struct ManagedProcess {
    spec: LaunchSpec,
    pid: Option<Pid>,
    started_at: i64,
    state: ProcessState,
    handle: Box<dyn ChildHandle>,
}

impl ManagedProcess {
    /// Wrap a freshly spawned child (`Starting -> Running`)
    pub(crate) fn started(
        spec: LaunchSpec,
        handle: Box<dyn ChildHandle>,
        started_at: i64,
    ) -> Result<Self> {
        let pid = handle.pid();
        let state = ProcessState::Starting.transition_to(ProcessState::Running)?;
        Ok(Self {
            spec,
            pid,
            started_at,
            state,
            handle,
        })
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn pid(&self) -> Option<Pid> {
        self.pid
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn spec(&self) -> &LaunchSpec {
        &self.spec
    }

    pub fn info(&self) -> ProcessInfo {
        ProcessInfo {
            name: self.spec.name.clone(),
            pid: self.pid,
            started_at: self.started_at,
            role: self.spec.role,
            state: self.state,
        }
    }

    pub(crate) fn handle_mut(&mut self) -> &mut dyn ChildHandle {
        self.handle.as_mut()
    }

    pub(crate) fn set_state(&mut self, next: ProcessState) -> Result<()> {
        self.state = self.state.transition_to(next)?;
        debug!(
            name = %self.spec.name,
            pid = ?self.pid,
            state = %self.state,
            "Process state changed"
        );
        Ok(())
    }
}

impl std::fmt::Debug for ManagedProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagedProcess")
            .field("name", &self.spec.name)
            .field("pid", &self.pid)
            .field("state", &self.state)
            .finish()
    }
}
