use statig::prelude::*;

use super::actions::JobApplyStatus;
use super::events::JobCommand;
use super::types::{JobPhase, JobSnapshot};

#[derive(Clone, Copy, Debug)]
pub(super) struct JobMachine {
    pub(super) snapshot: JobSnapshot,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct DispatchContext {
    pub(super) status: JobApplyStatus,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            status: JobApplyStatus::Unchanged,
        }
    }
}

impl JobMachine {
    pub(super) fn new() -> Self {
        Self {
            snapshot: JobSnapshot::default(),
        }
    }

    fn enter(&mut self, context: &mut DispatchContext, phase: JobPhase, logging: bool) {
        let next = JobSnapshot { phase, logging };
        // Reopening always counts: the file behind the phase is a new one.
        context.status = JobApplyStatus::Applied;
        self.snapshot = next;
    }

    // Opening and closing are valid from every state.
    fn common(&mut self, context: &mut DispatchContext, event: &JobCommand) -> Outcome<State> {
        match event {
            JobCommand::OpenRead => {
                self.enter(context, JobPhase::Paused, false);
                Transition(State::paused())
            }
            JobCommand::OpenWrite { logging } => {
                self.enter(context, JobPhase::Writing, *logging);
                Transition(State::writing())
            }
            JobCommand::Abort | JobCommand::Close => {
                if matches!(self.snapshot.phase, JobPhase::Idle) {
                    context.status = JobApplyStatus::Unchanged;
                    return Handled;
                }
                self.enter(context, JobPhase::Idle, false);
                Transition(State::idle())
            }
            _ => {
                context.status = JobApplyStatus::InvalidTransition;
                Handled
            }
        }
    }
}

#[state_machine(initial = "State::idle()")]
impl JobMachine {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &JobCommand) -> Outcome<State> {
        self.common(context, event)
    }

    #[state]
    fn writing(&mut self, context: &mut DispatchContext, event: &JobCommand) -> Outcome<State> {
        self.common(context, event)
    }

    #[state]
    fn paused(&mut self, context: &mut DispatchContext, event: &JobCommand) -> Outcome<State> {
        match event {
            JobCommand::StartOrResume => {
                self.snapshot.phase = JobPhase::Printing;
                context.status = JobApplyStatus::Applied;
                Transition(State::printing())
            }
            JobCommand::Pause => {
                context.status = JobApplyStatus::Unchanged;
                Handled
            }
            _ => self.common(context, event),
        }
    }

    #[state]
    fn printing(&mut self, context: &mut DispatchContext, event: &JobCommand) -> Outcome<State> {
        match event {
            JobCommand::Pause => {
                self.snapshot.phase = JobPhase::Paused;
                context.status = JobApplyStatus::Applied;
                Transition(State::paused())
            }
            JobCommand::StartOrResume => {
                context.status = JobApplyStatus::Unchanged;
                Handled
            }
            JobCommand::ReachedEnd => {
                self.snapshot.phase = JobPhase::Done;
                context.status = JobApplyStatus::Applied;
                Transition(State::done())
            }
            _ => self.common(context, event),
        }
    }

    #[state]
    fn done(&mut self, context: &mut DispatchContext, event: &JobCommand) -> Outcome<State> {
        self.common(context, event)
    }
}
