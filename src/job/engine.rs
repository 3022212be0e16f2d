use statig::blocking::IntoStateMachineExt as _;

use super::actions::JobApplyStatus;
use super::events::JobCommand;
use super::machine::{DispatchContext, JobMachine};
use super::types::JobSnapshot;

#[derive(Clone, Copy, Debug)]
pub struct JobApplyResult {
    pub before: JobSnapshot,
    pub after: JobSnapshot,
    pub status: JobApplyStatus,
}

impl JobApplyResult {
    pub fn changed(self) -> bool {
        matches!(self.status, JobApplyStatus::Applied)
    }

    pub fn rejected(self) -> bool {
        matches!(self.status, JobApplyStatus::InvalidTransition)
    }
}

pub struct JobEngine {
    machine: statig::blocking::StateMachine<JobMachine>,
}

impl Default for JobEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl JobEngine {
    pub fn new() -> Self {
        Self {
            machine: JobMachine::new().state_machine(),
        }
    }

    pub fn snapshot(&self) -> JobSnapshot {
        self.machine.inner().snapshot
    }

    pub fn apply(&mut self, command: JobCommand) -> JobApplyResult {
        let before = self.snapshot();
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&command, &mut context);
        let after = self.snapshot();
        if matches!(context.status, JobApplyStatus::InvalidTransition) {
            log::debug!(
                "card: job_rejected cmd={} phase={}",
                command.label(),
                before.phase.label()
            );
        }
        JobApplyResult {
            before,
            after,
            status: context.status,
        }
    }
}
