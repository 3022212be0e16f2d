#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum JobApplyStatus {
    Applied,
    Unchanged,
    InvalidTransition,
}
