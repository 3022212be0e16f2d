use super::CardReader;
use crate::config::JOB_RECOVERY_FILE;
use crate::error::MediaError;
use crate::media::{open_file, MediaDetect, MediaVolume, OpenMode};
use crate::sort::SortStrategy;

fn recovery_name() -> &'static str {
    JOB_RECOVERY_FILE.trim_start_matches('/')
}

impl<V: MediaVolume, S: SortStrategy, D: MediaDetect> CardReader<V, S, D> {
    pub fn job_recover_file_exists(&mut self) -> Result<bool, MediaError> {
        self.require_mounted()?;
        let root = self.workdir.root().ok_or(MediaError::NotMounted)?;
        match self.volume.open(root, recovery_name(), OpenMode::Read) {
            Ok(file) => {
                self.volume.close(file);
                Ok(true)
            }
            Err(MediaError::NotFound) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Opens the recovery file in the volume root, read-only or truncated
    /// for writing. Does nothing when it is already open.
    pub fn open_job_recovery_file(&mut self, read: bool) -> Result<(), MediaError> {
        self.require_mounted()?;
        if self.recovery.is_some() {
            return Ok(());
        }
        let root = self.workdir.root().ok_or(MediaError::NotMounted)?;
        let mode = if read { OpenMode::Read } else { OpenMode::Write };
        match open_file(&mut self.volume, root, recovery_name(), mode) {
            Ok(file) => {
                self.recovery = Some(file);
                log::info!("card: recovery_opened read={}", read as u8);
                Ok(())
            }
            Err(err) => {
                log::warn!(
                    "card: open_failed path={} reason={}",
                    JOB_RECOVERY_FILE,
                    err.label()
                );
                Err(err)
            }
        }
    }

    pub fn is_recovery_file_open(&self) -> bool {
        self.recovery.is_some()
    }

    pub fn recovery_read(&mut self, buf: &mut [u8]) -> Result<usize, MediaError> {
        let file = self.recovery.as_mut().ok_or(MediaError::NotOpen)?;
        self.volume.read(file, buf)
    }

    pub fn recovery_write(&mut self, data: &[u8]) -> Result<usize, MediaError> {
        let file = self.recovery.as_mut().ok_or(MediaError::NotOpen)?;
        self.volume.write(file, data)
    }

    pub fn recovery_seek(&mut self, position: u32) -> Result<(), MediaError> {
        let file = self.recovery.as_mut().ok_or(MediaError::NotOpen)?;
        self.volume.seek(file, position)
    }

    pub fn close_job_recovery_file(&mut self) {
        if let Some(file) = self.recovery.take() {
            self.volume.close(file);
        }
    }

    /// Removes the recovery file if present. Returns whether it existed.
    pub fn remove_job_recovery_file(&mut self) -> Result<bool, MediaError> {
        self.close_job_recovery_file();
        if !self.job_recover_file_exists()? {
            return Ok(false);
        }
        self.remove_file(JOB_RECOVERY_FILE)?;
        Ok(true)
    }
}
