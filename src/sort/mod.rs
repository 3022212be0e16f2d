mod array;
#[cfg(feature = "alloc")]
mod heap;
mod stack;

use core::cmp::Ordering;

pub use array::ArraySortCache;
#[cfg(feature = "alloc")]
pub use heap::HeapSortCache;
pub use stack::StackSort;

use crate::config::SORT_LIMIT_DEFAULT;
use crate::error::MediaError;
use crate::media::{DirEntry, MediaVolume, Visibility};
use crate::types::{FolderSort, LongName, ShortName, SortFlag};

/// Fixed-capacity cache sized to the default sort limit.
pub type DefaultSortCache = ArraySortCache<SORT_LIMIT_DEFAULT>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortKey {
    pub visible_index: u16,
    pub short_name: ShortName,
    pub long_name: LongName,
    pub is_dir: bool,
    pub is_bin: bool,
}

impl SortKey {
    pub fn from_entry(visible_index: u16, entry: &DirEntry) -> Self {
        Self {
            visible_index,
            short_name: entry.short_name.clone(),
            long_name: entry.long_name.clone(),
            is_dir: entry.is_dir(),
            is_bin: entry.is_bin(),
        }
    }

    pub fn name(&self) -> &str {
        if self.long_name.is_empty() {
            self.short_name.as_str()
        } else {
            self.long_name.as_str()
        }
    }
}

pub fn compare_names(a: &str, b: &str) -> Ordering {
    let lhs = a.bytes().map(|byte| byte.to_ascii_lowercase());
    let rhs = b.bytes().map(|byte| byte.to_ascii_lowercase());
    lhs.cmp(rhs)
}

pub fn compare_keys(a: &SortKey, b: &SortKey, folders: FolderSort) -> Ordering {
    if a.is_dir != b.is_dir {
        match folders {
            FolderSort::Before if a.is_dir => return Ordering::Less,
            FolderSort::Before => return Ordering::Greater,
            FolderSort::After if a.is_dir => return Ordering::Greater,
            FolderSort::After => return Ordering::Less,
            FolderSort::Mixed => {}
        }
    }
    compare_names(a.name(), b.name())
}

// Equal keys keep enumeration order, which makes the order total.
pub(crate) fn precedes(a: &SortKey, b: &SortKey, folders: FolderSort) -> bool {
    match compare_keys(a, b, folders) {
        Ordering::Less => true,
        Ordering::Equal => a.visible_index < b.visible_index,
        Ordering::Greater => false,
    }
}

pub(crate) fn insertion_point<'a>(
    sorted: impl Iterator<Item = &'a SortKey>,
    key: &SortKey,
    folders: FolderSort,
) -> usize {
    let mut position = 0usize;
    for existing in sorted {
        if precedes(key, existing, folders) {
            break;
        }
        position += 1;
    }
    position
}

/// Visible entries of one directory, addressed by their position in raw
/// enumeration order with invisible entries skipped.
pub struct EntrySource<'a, V: MediaVolume> {
    volume: &'a mut V,
    dir: &'a V::File,
    visibility: Visibility,
    // (visible index, raw index) of the next entry a forward scan will see
    cursor: (u16, u16),
}

impl<'a, V: MediaVolume> EntrySource<'a, V> {
    pub fn new(volume: &'a mut V, dir: &'a V::File, visibility: Visibility) -> Self {
        Self {
            volume,
            dir,
            visibility,
            cursor: (0, 0),
        }
    }

    pub fn count(&mut self) -> Result<usize, MediaError> {
        let mut raw = 0u16;
        let mut visible = 0usize;
        while let Some(entry) = self.volume.dir_entry(self.dir, raw)? {
            if self.visibility.accepts(&entry) {
                visible += 1;
            }
            raw = match raw.checked_add(1) {
                Some(next) => next,
                None => break,
            };
        }
        Ok(visible)
    }

    pub fn entry(&mut self, visible_index: usize) -> Result<DirEntry, MediaError> {
        let target = u16::try_from(visible_index).map_err(|_| MediaError::IndexOutOfRange)?;
        if target < self.cursor.0 {
            self.cursor = (0, 0);
        }
        let (mut visible, mut raw) = self.cursor;
        loop {
            let entry = self
                .volume
                .dir_entry(self.dir, raw)?
                .ok_or(MediaError::IndexOutOfRange)?;
            raw = raw.checked_add(1).ok_or(MediaError::IndexOutOfRange)?;
            if !self.visibility.accepts(&entry) {
                continue;
            }
            if visible == target {
                self.cursor = (visible.saturating_add(1), raw);
                return Ok(entry);
            }
            visible += 1;
        }
    }

    pub fn key(&mut self, visible_index: usize) -> Result<SortKey, MediaError> {
        let entry = self.entry(visible_index)?;
        Ok(SortKey::from_entry(visible_index as u16, &entry))
    }
}

/// Storage for the sorted permutation of one directory.
///
/// Implementations differ only in where the permutation and the optional
/// name caches live; the order they produce is the same.
pub trait SortStrategy {
    fn limit(&self) -> usize;

    fn clear(&mut self);

    /// Rebuilds for `count` visible entries, already capped at `limit`.
    fn rebuild<V: MediaVolume>(
        &mut self,
        entries: &mut EntrySource<'_, V>,
        count: usize,
        folders: FolderSort,
    ) -> Result<(), MediaError>;

    /// Visible index of the entry at `sorted` (forward order).
    fn visible_index<V: MediaVolume>(
        &mut self,
        entries: &mut EntrySource<'_, V>,
        sorted: usize,
    ) -> Result<usize, MediaError>;

    fn cached_key(&self, _sorted: usize) -> Option<&SortKey> {
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortCacheState {
    Empty,
    Built,
    Dirty,
}

pub struct SortCache<S> {
    strategy: S,
    state: SortCacheState,
    direction: SortFlag,
    folders: FolderSort,
    // entries reachable by sorted index
    count: usize,
}

impl<S: SortStrategy> SortCache<S> {
    pub fn new(strategy: S, direction: SortFlag, folders: FolderSort) -> Self {
        Self {
            strategy,
            state: SortCacheState::Empty,
            direction: direction.normalized(),
            folders,
            count: 0,
        }
    }

    pub fn state(&self) -> SortCacheState {
        self.state
    }

    pub fn direction(&self) -> SortFlag {
        self.direction
    }

    pub fn folders(&self) -> FolderSort {
        self.folders
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn set_direction(&mut self, direction: SortFlag) {
        self.direction = direction.normalized();
        self.invalidate();
    }

    pub fn set_folders(&mut self, folders: FolderSort) {
        self.folders = folders;
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.state = SortCacheState::Dirty;
    }

    pub fn flush(&mut self) {
        self.strategy.clear();
        self.count = 0;
        self.state = SortCacheState::Empty;
    }

    pub fn presort<V: MediaVolume>(
        &mut self,
        entries: &mut EntrySource<'_, V>,
    ) -> Result<usize, MediaError> {
        self.strategy.clear();
        self.count = 0;
        self.state = SortCacheState::Dirty;
        let visible = entries.count()?;
        if matches!(self.direction, SortFlag::Off) {
            self.count = visible;
        } else {
            let count = visible.min(self.strategy.limit());
            if let Err(err) = self.strategy.rebuild(entries, count, self.folders) {
                self.strategy.clear();
                return Err(err);
            }
            self.count = count;
        }
        self.state = SortCacheState::Built;
        log::debug!(
            "card: presort visible={} sorted={} dir={}",
            visible,
            self.count,
            self.direction.label()
        );
        Ok(self.count)
    }

    pub fn sorted_count<V: MediaVolume>(
        &mut self,
        entries: &mut EntrySource<'_, V>,
    ) -> Result<usize, MediaError> {
        self.ensure_built(entries)?;
        Ok(self.count)
    }

    pub fn select<V: MediaVolume>(
        &mut self,
        entries: &mut EntrySource<'_, V>,
        index: usize,
    ) -> Result<SortKey, MediaError> {
        self.ensure_built(entries)?;
        if index >= self.count {
            return Err(MediaError::IndexOutOfRange);
        }
        let sorted = match self.direction {
            SortFlag::Off => return entries.key(index),
            SortFlag::Reverse | SortFlag::AlsoReverse => self.count - 1 - index,
            SortFlag::Forward => index,
        };
        if let Some(key) = self.strategy.cached_key(sorted) {
            return Ok(key.clone());
        }
        let visible = self.strategy.visible_index(entries, sorted)?;
        entries.key(visible)
    }

    fn ensure_built<V: MediaVolume>(
        &mut self,
        entries: &mut EntrySource<'_, V>,
    ) -> Result<(), MediaError> {
        if !matches!(self.state, SortCacheState::Built) {
            self.presort(entries)?;
        }
        Ok(())
    }
}
