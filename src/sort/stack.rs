use super::{precedes, EntrySource, SortStrategy};
use crate::error::MediaError;
use crate::media::MediaVolume;
use crate::types::FolderSort;

/// Keeps no per-entry state: every indexed access ranks the directory again
/// straight from the media. O(n^2) reads per access, zero buffer memory.
pub struct StackSort {
    limit: usize,
    count: usize,
    folders: FolderSort,
}

impl StackSort {
    pub const fn new(limit: usize) -> Self {
        Self {
            limit,
            count: 0,
            folders: FolderSort::Mixed,
        }
    }
}

impl SortStrategy for StackSort {
    fn limit(&self) -> usize {
        self.limit
    }

    fn clear(&mut self) {
        self.count = 0;
    }

    fn rebuild<V: MediaVolume>(
        &mut self,
        _entries: &mut EntrySource<'_, V>,
        count: usize,
        folders: FolderSort,
    ) -> Result<(), MediaError> {
        self.count = count.min(self.limit);
        self.folders = folders;
        Ok(())
    }

    fn visible_index<V: MediaVolume>(
        &mut self,
        entries: &mut EntrySource<'_, V>,
        sorted: usize,
    ) -> Result<usize, MediaError> {
        for candidate in 0..self.count {
            let key = entries.key(candidate)?;
            let mut rank = 0usize;
            for other in 0..self.count {
                if other == candidate {
                    continue;
                }
                if precedes(&entries.key(other)?, &key, self.folders) {
                    rank += 1;
                }
            }
            if rank == sorted {
                return Ok(candidate);
            }
        }
        Err(MediaError::IndexOutOfRange)
    }
}
