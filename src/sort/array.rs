use super::{insertion_point, EntrySource, SortKey, SortStrategy};
use crate::error::MediaError;
use crate::media::MediaVolume;
use crate::types::FolderSort;

/// Statically sized permutation with names and folder bits cached per slot.
pub struct ArraySortCache<const N: usize> {
    keys: heapless::Vec<SortKey, N>,
}

impl<const N: usize> ArraySortCache<N> {
    pub const fn new() -> Self {
        Self {
            keys: heapless::Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<const N: usize> Default for ArraySortCache<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SortStrategy for ArraySortCache<N> {
    fn limit(&self) -> usize {
        N
    }

    fn clear(&mut self) {
        self.keys.clear();
    }

    fn rebuild<V: MediaVolume>(
        &mut self,
        entries: &mut EntrySource<'_, V>,
        count: usize,
        folders: FolderSort,
    ) -> Result<(), MediaError> {
        for visible in 0..count.min(N) {
            let key = entries.key(visible)?;
            let position = insertion_point(self.keys.iter(), &key, folders);
            if self.keys.insert(position, key).is_err() {
                break;
            }
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
