use crate::config::SUBCALL_DEPTH_MAX;
use crate::error::MediaError;
use crate::types::MediaPath;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcedureFrame {
    pub path: MediaPath,
    pub position: u32,
}

/// Suspended caller files, innermost last.
pub struct ProcedureStack {
    frames: heapless::Vec<ProcedureFrame, SUBCALL_DEPTH_MAX>,
    limit: usize,
}

impl ProcedureStack {
    pub fn new(limit: u8) -> Self {
        Self {
            frames: heapless::Vec::new(),
            limit: (limit as usize).clamp(1, SUBCALL_DEPTH_MAX),
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() >= self.limit
    }

    pub fn push(&mut self, frame: ProcedureFrame) -> Result<(), MediaError> {
        if self.is_full() {
            return Err(MediaError::CallDepthExceeded);
        }
        self.frames
            .push(frame)
            .map_err(|_| MediaError::CallDepthExceeded)
    }

    pub fn pop(&mut self) -> Option<ProcedureFrame> {
        self.frames.pop()
    }

    pub fn top(&self) -> Option<&ProcedureFrame> {
        self.frames.last()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn frames(&self) -> &[ProcedureFrame] {
        &self.frames
    }
}
