/// Byte position of the active job file against its size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JobProgress {
    pub size: u32,
    pub position: u32,
}

impl JobProgress {
    pub const fn new(size: u32) -> Self {
        Self { size, position: 0 }
    }

    pub fn remaining(self) -> u32 {
        self.size.saturating_sub(self.position)
    }

    pub fn at_end(self) -> bool {
        self.position >= self.size
    }

    // Position over the rounded-up hundredth of the size.
    pub fn percent(self) -> u8 {
        scaled(self, 100) as u8
    }

    pub fn permyriad(self) -> u16 {
        scaled(self, 10_000) as u16
    }
}

fn scaled(progress: JobProgress, scale: u64) -> u64 {
    if progress.size == 0 {
        return 0;
    }
    let step = (u64::from(progress.size) + scale - 1) / scale;
    (u64::from(progress.position) / step).min(scale)
}
