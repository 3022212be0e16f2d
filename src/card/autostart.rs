use core::fmt::Write as _;

use super::CardReader;
use crate::config::{AUTOSTART_MAX_FILES, AUTOSTART_PREFIX, AUTOSTART_SUFFIX};
use crate::error::MediaError;
use crate::media::{MediaDetect, MediaVolume};
use crate::sort::SortStrategy;
use crate::types::MediaPath;

impl<V: MediaVolume, S: SortStrategy, D: MediaDetect> CardReader<V, S, D> {
    /// Arms the `/auto0.g`, `/auto1.g`, ... sequence and runs its first file.
    pub fn autofile_begin(&mut self) -> Result<bool, MediaError> {
        self.autostart = Some(0);
        self.autofile_check()
    }

    /// Starts the next autostart file when no job is active. Returns whether
    /// a file was started; the sequence disarms at the first missing file.
    pub fn autofile_check(&mut self) -> Result<bool, MediaError> {
        let Some(index) = self.autostart else {
            return Ok(false);
        };
        if self.job_file.is_some() {
            return Ok(false);
        }
        if !self.flags.mounted {
            if let Err(err) = self.mount() {
                self.autofile_cancel();
                return Err(err);
            }
        }
        if index < AUTOSTART_MAX_FILES && !self.job_recover_file_exists()? {
            let mut name = MediaPath::new();
            let _ = write!(name, "{}{}{}", AUTOSTART_PREFIX, index, AUTOSTART_SUFFIX);
            if self.file_exists(&name)? {
                log::info!("card: autostart path={}", name);
                self.cdroot();
                if let Err(err) = self.open_and_print(&name) {
                    self.autofile_cancel();
                    return Err(err);
                }
                self.autostart = Some(index + 1);
                return Ok(true);
            }
        }
        self.autofile_cancel();
        Ok(false)
    }

    pub fn autofile_cancel(&mut self) {
        self.autostart = None;
    }

    pub fn autostart_armed(&self) -> bool {
        self.autostart.is_some()
    }
}
