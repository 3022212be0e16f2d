use super::CardReader;
use crate::error::MediaError;
use crate::media::{MediaDetect, MediaVolume, OpenMode};
use crate::sort::SortStrategy;
use crate::subcall::ProcedureFrame;

impl<V: MediaVolume, S: SortStrategy, D: MediaDetect> CardReader<V, S, D> {
    /// Suspends the active read job at its current position and makes the
    /// file at `path` the active one. Without a read job this is a plain
    /// `open_file_read`.
    ///
    /// The callee is opened before anything else changes, so a rejected or
    /// failed call leaves the caller active and untouched.
    pub fn call(&mut self, path: &str) -> Result<(), MediaError> {
        self.require_mounted()?;
        if self.job_file.is_none() || !self.job().reading() {
            return self.open_file_read(path);
        }
        if self.procedures.is_full() {
            log::warn!(
                "card: call_rejected path={} depth={} limit={}",
                path,
                self.procedures.depth(),
                self.procedures.limit()
            );
            return Err(MediaError::CallDepthExceeded);
        }
        let frame = ProcedureFrame {
            path: self.job_path.clone(),
            position: self.progress.position,
        };
        let opened = match self.open_path(path, OpenMode::Read, false) {
            Ok(opened) => opened,
            Err(err) => {
                log::warn!("card: call_failed path={} reason={}", path, err.label());
                return Err(err);
            }
        };
        if let Err(err) = self.procedures.push(frame) {
            self.volume.close(opened.file);
            return Err(err);
        }
        self.install_job_file(opened);
        log::info!(
            "card: call path={} depth={}",
            self.job_path,
            self.procedures.depth()
        );
        Ok(())
    }

    /// Closes the active file and resumes the innermost suspended caller at
    /// its saved position. Returns `false` when there is no caller.
    pub fn return_from_call(&mut self) -> Result<bool, MediaError> {
        let Some(frame) = self.procedures.top().cloned() else {
            return Ok(false);
        };
        let mut opened = self.open_path(&frame.path, OpenMode::Read, false)?;
        if let Err(err) = self.volume.seek(&mut opened.file, frame.position) {
            self.volume.close(opened.file);
            return Err(err);
        }
        self.procedures.pop();
        self.install_job_file(opened);
        log::info!(
            "card: return path={} pos={} depth={}",
            self.job_path,
            frame.position,
            self.procedures.depth()
        );
        Ok(true)
    }
}
