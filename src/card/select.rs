use super::CardReader;
use crate::error::MediaError;
use crate::media::{MediaDetect, MediaVolume};
use crate::sort::{EntrySource, SortKey, SortStrategy};
use crate::types::{FolderSort, SortFlag};

impl<V: MediaVolume, S: SortStrategy, D: MediaDetect> CardReader<V, S, D> {
    /// Visible entries of the working directory, not capped by the sort
    /// limit.
    pub fn count_visible(&mut self) -> Result<usize, MediaError> {
        self.require_mounted()?;
        let visibility = self.visibility();
        let dir = self.workdir.current().ok_or(MediaError::NotMounted)?;
        EntrySource::new(&mut self.volume, dir, visibility).count()
    }

    /// Entries reachable through `select_by_index`.
    pub fn sorted_count(&mut self) -> Result<usize, MediaError> {
        self.require_mounted()?;
        let visibility = self.visibility();
        let dir = self.workdir.current().ok_or(MediaError::NotMounted)?;
        let mut entries = EntrySource::new(&mut self.volume, dir, visibility);
        self.sort.sorted_count(&mut entries)
    }

    pub fn presort(&mut self) -> Result<usize, MediaError> {
        self.require_mounted()?;
        let visibility = self.visibility();
        let dir = self.workdir.current().ok_or(MediaError::NotMounted)?;
        let mut entries = EntrySource::new(&mut self.volume, dir, visibility);
        self.sort.presort(&mut entries)
    }

    /// Selects the entry at `index` of the sorted listing, rebuilding the
    /// sort cache first when the working directory changed.
    pub fn select_by_index(&mut self, index: usize) -> Result<SortKey, MediaError> {
        self.require_mounted()?;
        let visibility = self.visibility();
        let dir = self.workdir.current().ok_or(MediaError::NotMounted)?;
        let mut entries = EntrySource::new(&mut self.volume, dir, visibility);
        let key = self.sort.select(&mut entries, index)?;
        Ok(self.record_selection(key))
    }

    /// Selects by position in enumeration order, hidden entries skipped.
    pub fn select_by_raw_index(&mut self, index: usize) -> Result<SortKey, MediaError> {
        self.require_mounted()?;
        let visibility = self.visibility();
        let dir = self.workdir.current().ok_or(MediaError::NotMounted)?;
        let key = EntrySource::new(&mut self.volume, dir, visibility).key(index)?;
        Ok(self.record_selection(key))
    }

    /// Selects a visible entry of the working directory by short or long
    /// name, ignoring case.
    pub fn select_by_name(&mut self, name: &str) -> Result<SortKey, MediaError> {
        self.require_mounted()?;
        let visibility = self.visibility();
        let dir = self.workdir.current().ok_or(MediaError::NotMounted)?;
        let mut entries = EntrySource::new(&mut self.volume, dir, visibility);
        let mut index = 0usize;
        let found = loop {
            let entry = match entries.entry(index) {
                Ok(entry) => entry,
                Err(MediaError::IndexOutOfRange) => return Err(MediaError::NotFound),
                Err(err) => return Err(err),
            };
            if entry.matches_name(name) {
                break SortKey::from_entry(index as u16, &entry);
            }
            index += 1;
        };
        Ok(self.record_selection(found))
    }

    /// Opens the selection: directories become the working directory, files
    /// start a read job.
    pub fn open_selected(&mut self) -> Result<(), MediaError> {
        let selected = self.selected.clone().ok_or(MediaError::NotFound)?;
        if selected.is_dir {
            self.cd(&selected.short_name)
        } else {
            self.open_file_read(&selected.short_name)
        }
    }

    pub fn set_sort(&mut self, flag: SortFlag) -> Result<(), MediaError> {
        self.sort.set_direction(flag);
        self.config.sort = self.sort.direction();
        self.resort()
    }

    pub fn set_sort_folders(&mut self, folders: FolderSort) -> Result<(), MediaError> {
        self.sort.set_folders(folders);
        self.config.folders = folders;
        self.resort()
    }

    fn resort(&mut self) -> Result<(), MediaError> {
        if self.flags.mounted {
            self.presort()?;
        }
        Ok(())
    }
}
