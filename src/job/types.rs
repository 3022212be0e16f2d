#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JobPhase {
    Idle,
    Writing,
    Paused,
    Printing,
    Done,
}

impl JobPhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Writing => "writing",
            Self::Paused => "paused",
            Self::Printing => "printing",
            Self::Done => "done",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct JobSnapshot {
    pub phase: JobPhase,
    pub logging: bool,
}

impl Default for JobSnapshot {
    fn default() -> Self {
        Self {
            phase: JobPhase::Idle,
            logging: false,
        }
    }
}

impl JobSnapshot {
    pub fn saving(self) -> bool {
        matches!(self.phase, JobPhase::Writing)
    }

    pub fn logging(self) -> bool {
        self.saving() && self.logging
    }

    pub fn printing(self) -> bool {
        matches!(self.phase, JobPhase::Printing)
    }

    pub fn print_done(self) -> bool {
        matches!(self.phase, JobPhase::Done)
    }

    pub fn reading(self) -> bool {
        matches!(self.phase, JobPhase::Paused | JobPhase::Printing)
    }
}
