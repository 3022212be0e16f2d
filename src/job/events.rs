#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JobCommand {
    OpenRead,
    OpenWrite { logging: bool },
    StartOrResume,
    Pause,
    ReachedEnd,
    Abort,
    Close,
}

impl JobCommand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::OpenRead => "open_read",
            Self::OpenWrite { logging: false } => "open_write",
            Self::OpenWrite { logging: true } => "open_log",
            Self::StartOrResume => "start",
            Self::Pause => "pause",
            Self::ReachedEnd => "reached_end",
            Self::Abort => "abort",
            Self::Close => "close",
        }
    }
}
