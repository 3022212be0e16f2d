use super::CardReader;
use crate::config::MAX_PATH_LEN;
use crate::error::MediaError;
use crate::job::{JobApplyResult, JobCommand, JobProgress};
use crate::media::{find_entry, open_file, MediaDetect, MediaVolume, OpenMode};
use crate::path::dive;
use crate::sort::{SortKey, SortStrategy};
use crate::types::{push_truncated, MediaPath};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FinishOutcome {
    ReturnedToCaller,
    PrintDone,
}

pub(super) struct OpenedFile<F> {
    pub(super) file: F,
    pub(super) path: MediaPath,
    pub(super) key: Option<SortKey>,
    pub(super) in_work_dir: bool,
}

impl<V: MediaVolume, S: SortStrategy, D: MediaDetect> CardReader<V, S, D> {
    /// Starts a fresh read job: any open job is aborted, the procedure stack
    /// is emptied and the working directory follows the file's directory.
    pub fn open_file_read(&mut self, path: &str) -> Result<(), MediaError> {
        self.require_mounted()?;
        if self.job_file.is_some() {
            self.abort_now();
        }
        self.procedures.clear();
        let work_dir = self.workdir.path();
        let opened = match self.open_path(path, OpenMode::Read, true) {
            Ok(opened) => opened,
            Err(err) => {
                log::warn!("card: open_failed path={} reason={}", path, err.label());
                return Err(err);
            }
        };
        if self.workdir.path() != work_dir {
            self.after_navigation();
        }
        let size = self.install_job_file(opened);
        self.job.apply(JobCommand::OpenRead);
        log::info!("card: file_opened path={} size={}", self.job_path, size);
        Ok(())
    }

    pub fn open_file_write(&mut self, path: &str) -> Result<(), MediaError> {
        self.open_for_writing(path, false)
    }

    pub fn open_log_file(&mut self, path: &str) -> Result<(), MediaError> {
        self.open_for_writing(path, true)
    }

    fn open_for_writing(&mut self, path: &str, logging: bool) -> Result<(), MediaError> {
        self.require_mounted()?;
        self.end_job();
        let opened = match self.open_path(path, OpenMode::Write, false) {
            Ok(opened) => opened,
            Err(err) => {
                log::warn!("card: open_failed path={} reason={}", path, err.label());
                return Err(err);
            }
        };
        if opened.in_work_dir {
            self.sort.invalidate();
        }
        self.install_job_file(opened);
        self.job.apply(JobCommand::OpenWrite { logging });
        log::info!(
            "card: writing_to_file path={} logging={}",
            self.job_path,
            logging as u8
        );
        Ok(())
    }

    /// Appends one command line, terminated with CR LF, to the file being
    /// saved.
    pub fn write_command(&mut self, line: &str) -> Result<(), MediaError> {
        if !self.is_saving() {
            return Err(MediaError::NotOpen);
        }
        let line = line.trim_end_matches(['\r', '\n']);
        self.write(line.as_bytes())?;
        self.write(b"\r\n")?;
        Ok(())
    }

    pub fn close_file(&mut self) {
        if self.job_file.is_some() {
            log::info!(
                "card: file_closed path={} bytes={}",
                self.job_path,
                self.progress.position
            );
        }
        self.end_job();
    }

    pub fn open_and_print(&mut self, path: &str) -> Result<(), MediaError> {
        self.open_file_read(path)?;
        self.start_or_resume();
        Ok(())
    }

    pub fn start_or_resume(&mut self) -> JobApplyResult {
        let result = self.job.apply(JobCommand::StartOrResume);
        if result.changed() {
            log::info!(
                "card: print_started path={} pos={}",
                self.job_path,
                self.progress.position
            );
        }
        result
    }

    pub fn pause(&mut self) -> JobApplyResult {
        let result = self.job.apply(JobCommand::Pause);
        if result.changed() {
            log::info!(
                "card: print_paused path={} pos={}",
                self.job_path,
                self.progress.position
            );
        }
        result
    }

    /// Asks the host loop to abort at its next iteration.
    pub fn abort_soon(&mut self) {
        self.flags.abort_requested = self.job_file.is_some();
    }

    /// Closes the job file and drops every suspended caller. The abort
    /// request stays set until the host samples it.
    pub fn abort_now(&mut self) {
        if self.job_file.is_some() {
            log::info!(
                "card: job_aborted path={} pos={} depth={}",
                self.job_path,
                self.progress.position,
                self.procedures.depth()
            );
        }
        self.drop_job(JobCommand::Abort);
    }

    /// End of the active file while printing: resume the innermost caller,
    /// or finish the job.
    pub fn file_has_finished(&mut self) -> Result<FinishOutcome, MediaError> {
        if !self.is_printing() {
            return Err(MediaError::NotOpen);
        }
        if !self.procedures.is_empty() {
            if let Err(err) = self.return_from_call() {
                log::warn!("card: return_failed reason={}", err.label());
                self.abort_now();
                return Err(err);
            }
            return Ok(FinishOutcome::ReturnedToCaller);
        }
        if let Some(file) = self.job_file.take() {
            self.volume.close(file);
        }
        self.progress.position = self.progress.size;
        self.job.apply(JobCommand::ReachedEnd);
        log::info!("card: print_done path={} size={}", self.job_path, self.progress.size);
        Ok(FinishOutcome::PrintDone)
    }

    /// Next byte of the job while printing, stepping out of finished
    /// subroutine files on the way. `None` once the print is over or paused.
    pub fn next_print_byte(&mut self) -> Result<Option<u8>, MediaError> {
        while self.is_printing() {
            if let Some(byte) = self.get()? {
                return Ok(Some(byte));
            }
            if let FinishOutcome::PrintDone = self.file_has_finished()? {
                break;
            }
        }
        Ok(None)
    }

    pub fn get(&mut self) -> Result<Option<u8>, MediaError> {
        let mut byte = [0u8; 1];
        match self.read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, MediaError> {
        let file = self.job_file.as_mut().ok_or(MediaError::NotOpen)?;
        let count = self.volume.read(file, buf)?;
        self.progress.position = self.volume.position(file);
        Ok(count)
    }

    pub fn write(&mut self, data: &[u8]) -> Result<usize, MediaError> {
        let file = self.job_file.as_mut().ok_or(MediaError::NotOpen)?;
        let count = self.volume.write(file, data)?;
        self.progress.position = self.volume.position(file);
        self.progress.size = self.progress.size.max(self.progress.position);
        Ok(count)
    }

    pub fn set_index(&mut self, position: u32) -> Result<(), MediaError> {
        let file = self.job_file.as_mut().ok_or(MediaError::NotOpen)?;
        self.volume.seek(file, position)?;
        self.progress.position = position;
        Ok(())
    }

    pub fn eof(&self) -> bool {
        self.progress.at_end()
    }

    pub fn file_size(&self) -> u32 {
        self.progress.size
    }

    pub fn index(&self) -> u32 {
        self.progress.position
    }

    pub(super) fn end_job(&mut self) {
        self.drop_job(JobCommand::Close);
    }

    fn drop_job(&mut self, command: JobCommand) {
        if let Some(file) = self.job_file.take() {
            self.volume.close(file);
        }
        self.procedures.clear();
        self.progress = JobProgress::default();
        self.job_path.clear();
        self.job.apply(command);
    }

    /// Dives to `path` and opens its leaf as a file.
    pub(super) fn open_path(
        &mut self,
        path: &str,
        mode: OpenMode,
        update_cwd: bool,
    ) -> Result<OpenedFile<V::File>, MediaError> {
        dive(
            &mut self.workdir,
            &mut self.volume,
            path,
            update_cwd,
            |volume, dir, landing| {
                let file = open_file(volume, dir, landing.leaf, mode)?;
                let key = match find_entry(volume, dir, landing.leaf) {
                    Ok(entry) => entry.map(|entry| SortKey::from_entry(0, &entry)),
                    Err(err) => {
                        volume.close(file);
                        return Err(err);
                    }
                };
                let name = match key.as_ref() {
                    Some(key) => key.short_name.as_str(),
                    None => landing.leaf,
                };
                if landing.dir_path.len() + name.len() > MAX_PATH_LEN {
                    volume.close(file);
                    return Err(MediaError::NameTooLong);
                }
                let mut full = landing.dir_path.clone();
                push_truncated(&mut full, name);
                Ok(OpenedFile {
                    file,
                    path: full,
                    key,
                    in_work_dir: landing.in_work_dir,
                })
            },
        )
    }

    pub(super) fn install_job_file(&mut self, opened: OpenedFile<V::File>) -> u32 {
        let size = self.volume.size(&opened.file);
        let position = self.volume.position(&opened.file);
        if let Some(previous) = self.job_file.replace(opened.file) {
            self.volume.close(previous);
        }
        self.progress = JobProgress { size, position };
        self.job_path = opened.path;
        if let Some(key) = opened.key {
            self.record_selection(key);
        }
        size
    }
}
