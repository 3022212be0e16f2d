use alloc::vec::Vec;

use super::{insertion_point, EntrySource, SortKey, SortStrategy};
use crate::error::MediaError;
use crate::media::MediaVolume;
use crate::types::FolderSort;

/// Heap-backed permutation and name cache, sized per directory and released
/// on every flush.
pub struct HeapSortCache {
    limit: usize,
    keys: Vec<SortKey>,
}

impl HeapSortCache {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            keys: Vec::new(),
        }
    }

    pub fn allocated(&self) -> usize {
        self.keys.capacity()
    }
}

impl SortStrategy for HeapSortCache {
    fn limit(&self) -> usize {
        self.limit
    }

    fn clear(&mut self) {
        self.keys = Vec::new();
    }

    fn rebuild<V: MediaVolume>(
        &mut self,
        entries: &mut EntrySource<'_, V>,
        count: usize,
        folders: FolderSort,
    ) -> Result<(), MediaError> {
        let count = count.min(self.limit);
        self.keys = Vec::with_capacity(count);
        for visible in 0..count {
            let key = entries.key(visible)?;
            let position = insertion_point(self.keys.iter(), &key, folders);
            self.keys.insert(position, key);
        }
        Ok(())
    }

    fn visible_index<V: MediaVolume>(
        &mut self,
        _entries: &mut EntrySource<'_, V>,
        sorted: usize,
    ) -> Result<usize, MediaError> {
        self.keys
            .get(sorted)
            .map(|key| key.visible_index as usize)
            .ok_or(MediaError::IndexOutOfRange)
    }

    fn cached_key(&self, sorted: usize) -> Option<&SortKey> {
        self.keys.get(sorted)
    }
}
