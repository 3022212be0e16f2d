pub(crate) mod actions;
pub(crate) mod engine;
pub(crate) mod events;
pub(crate) mod machine;
pub(crate) mod progress;
pub(crate) mod types;

pub use actions::JobApplyStatus;
pub use engine::{JobApplyResult, JobEngine};
pub use events::JobCommand;
pub use progress::JobProgress;
pub use types::{JobPhase, JobSnapshot};
