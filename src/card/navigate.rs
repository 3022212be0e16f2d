use super::CardReader;
use crate::error::MediaError;
use crate::media::{find_entry, open_dir, MediaDetect, MediaVolume, OpenMode};
use crate::path::dive;
use crate::sort::SortStrategy;
use crate::types::{push_truncated, MediaPath, ShortName};

impl<V: MediaVolume, S: SortStrategy, D: MediaDetect> CardReader<V, S, D> {
    /// Changes into `path`, relative to the working directory or absolute.
    /// `..` steps up one level. A failed change leaves the working directory
    /// where it was.
    pub fn cd(&mut self, path: &str) -> Result<(), MediaError> {
        self.require_mounted()?;
        match path {
            "" => return Ok(()),
            ".." => {
                self.cdup();
                return Ok(());
            }
            _ => {}
        }
        let mut dir_path = MediaPath::new();
        let fits = dir_path.push_str(path).is_ok()
            && (dir_path.ends_with('/') || dir_path.push('/').is_ok());
        if !fits {
            return Err(MediaError::NameTooLong);
        }
        match dive(&mut self.workdir, &mut self.volume, &dir_path, true, |_, _, _| Ok(())) {
            Ok(()) => {
                self.after_navigation();
                log::debug!("card: cd path={} depth={}", self.workdir.path(), self.workdir.depth());
                Ok(())
            }
            Err(err) => {
                log::warn!("card: cd_failed path={} reason={}", path, err.label());
                Err(err)
            }
        }
    }

    /// Returns the depth after stepping up; at root nothing moves.
    pub fn cdup(&mut self) -> usize {
        let depth = self.workdir.ascend(&mut self.volume);
        self.after_navigation();
        log::debug!("card: cdup depth={}", depth);
        depth
    }

    pub fn cdroot(&mut self) {
        self.workdir.reset(&mut self.volume);
        self.after_navigation();
        log::debug!("card: cdroot");
    }

    pub fn work_dir_name(&self) -> ShortName {
        self.workdir.current_name()
    }

    pub fn work_dir_path(&self) -> MediaPath {
        self.workdir.path()
    }

    /// Absolute path of the selected entry within the working directory.
    pub fn abs_filename_in_cwd(&self) -> Result<MediaPath, MediaError> {
        let selected = self.selected.as_ref().ok_or(MediaError::NotFound)?;
        let mut out = self.workdir.path();
        if out.len() + selected.short_name.len() > out.capacity() {
            return Err(MediaError::NameTooLong);
        }
        push_truncated(&mut out, &selected.short_name);
        Ok(out)
    }

    /// Whether `path` names an existing file or directory. Never moves the
    /// working directory.
    pub fn file_exists(&mut self, path: &str) -> Result<bool, MediaError> {
        self.require_mounted()?;
        let found = dive(&mut self.workdir, &mut self.volume, path, false, |volume, dir, landing| {
            if landing.leaf.is_empty() {
                return Ok(());
            }
            let file = volume.open(dir, landing.leaf, OpenMode::Read)?;
            volume.close(file);
            Ok(())
        });
        match found {
            Ok(()) => Ok(true),
            Err(MediaError::NotFound | MediaError::NotADirectory) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub fn remove_file(&mut self, path: &str) -> Result<(), MediaError> {
        self.require_mounted()?;
        let removed = dive(
            &mut self.workdir,
            &mut self.volume,
            path,
            false,
            |volume, dir, landing| {
                if landing.leaf.is_empty() {
                    return Err(MediaError::IsADirectory);
                }
                volume.remove(dir, landing.leaf)?;
                Ok(landing.in_work_dir)
            },
        );
        match removed {
            Ok(in_work_dir) => {
                if in_work_dir {
                    self.sort.invalidate();
                }
                log::info!("card: file_removed path={}", path);
                Ok(())
            }
            Err(err) => {
                log::warn!("card: remove_failed path={} reason={}", path, err.label());
                Err(err)
            }
        }
    }

    /// Translates a path of short names, taken from the volume root, into
    /// long names wherever an entry has one.
    pub fn long_path(&mut self, dos_path: &str) -> Result<MediaPath, MediaError> {
        self.require_mounted()?;
        let root = self.workdir.root().ok_or(MediaError::NotMounted)?;
        let mut out = MediaPath::new();
        let mut held: Option<V::File> = None;
        let mut result = Ok(());
        let mut parts = dos_path.split('/').filter(|part| !part.is_empty()).peekable();
        while let Some(part) = parts.next() {
            let dir = held.as_ref().unwrap_or(root);
            let entry = match find_entry(&mut self.volume, dir, part) {
                Ok(Some(entry)) => entry,
                Ok(None) => {
                    result = Err(MediaError::NotFound);
                    break;
                }
                Err(err) => {
                    result = Err(err);
                    break;
                }
            };
            if out.push('/').is_err() || out.push_str(entry.display_name()).is_err() {
                result = Err(MediaError::NameTooLong);
                break;
            }
            if parts.peek().is_none() {
                break;
            }
            let next = match open_dir(&mut self.volume, dir, part) {
                Ok(next) => next,
                Err(err) => {
                    result = Err(err);
                    break;
                }
            };
            if let Some(previous) = held.replace(next) {
                self.volume.close(previous);
            }
        }
        if let Some(file) = held {
            self.volume.close(file);
        }
        result?;
        if out.is_empty() {
            push_truncated(&mut out, "/");
        }
        Ok(out)
    }
}
