mod autostart;
mod call;
mod job;
mod listing;
mod navigate;
mod recovery;
mod select;
mod status;

pub use job::FinishOutcome;
pub use status::StatusReporter;

use crate::config::CardConfig;
use crate::error::MediaError;
use crate::job::{JobEngine, JobPhase, JobProgress, JobSnapshot};
use crate::media::{MediaDetect, MediaVolume, Visibility};
use crate::sort::{SortCache, SortCacheState, SortKey, SortStrategy};
use crate::subcall::ProcedureStack;
use crate::types::{CardFlags, MediaPath};
use crate::workdir::WorkDir;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaChange {
    Inserted,
    Removed,
}

impl MediaChange {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inserted => "inserted",
            Self::Removed => "removed",
        }
    }
}

/// The one mounted-volume and print-job context.
///
/// Owns the volume, every open handle (root, working-directory levels, the
/// job file and the recovery file), the sort cache and the job state. The
/// command layer drives it; nothing here is shared or global.
pub struct CardReader<V: MediaVolume, S, D> {
    volume: V,
    detect: D,
    config: CardConfig,
    flags: CardFlags,
    workdir: WorkDir<V::File>,
    sort: SortCache<S>,
    job: JobEngine,
    job_file: Option<V::File>,
    progress: JobProgress,
    job_path: MediaPath,
    selected: Option<SortKey>,
    procedures: ProcedureStack,
    recovery: Option<V::File>,
    reporter: StatusReporter,
    autostart: Option<u8>,
    presence: Option<bool>,
}

impl<V: MediaVolume, S: SortStrategy, D: MediaDetect> CardReader<V, S, D> {
    pub fn new(volume: V, strategy: S, detect: D, config: CardConfig) -> Self {
        let config = config.sanitized();
        Self {
            volume,
            detect,
            flags: CardFlags {
                work_dir_is_root: true,
                ..CardFlags::default()
            },
            workdir: WorkDir::new(),
            sort: SortCache::new(strategy, config.sort, config.folders),
            job: JobEngine::new(),
            job_file: None,
            progress: JobProgress::default(),
            job_path: MediaPath::new(),
            selected: None,
            procedures: ProcedureStack::new(config.subcall_depth),
            recovery: None,
            reporter: StatusReporter::new(config.status_interval_ms),
            autostart: None,
            presence: None,
            config,
        }
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn flags(&self) -> CardFlags {
        self.flags
    }

    pub fn volume(&self) -> &V {
        &self.volume
    }

    pub fn volume_mut(&mut self) -> &mut V {
        &mut self.volume
    }

    pub fn job(&self) -> JobSnapshot {
        self.job.snapshot()
    }

    pub fn phase(&self) -> JobPhase {
        self.job.snapshot().phase
    }

    pub fn progress(&self) -> JobProgress {
        self.progress
    }

    pub fn sort_state(&self) -> SortCacheState {
        self.sort.state()
    }

    pub fn sort_strategy(&self) -> &S {
        self.sort.strategy()
    }

    pub fn selected(&self) -> Option<&SortKey> {
        self.selected.as_ref()
    }

    /// Absolute path of the active job file, empty when none is open.
    pub fn job_path(&self) -> &str {
        &self.job_path
    }

    pub fn call_depth(&self) -> usize {
        self.procedures.depth()
    }

    pub fn work_dir_depth(&self) -> usize {
        self.workdir.depth()
    }

    pub fn is_mounted(&self) -> bool {
        self.flags.mounted
    }

    pub fn is_file_open(&self) -> bool {
        self.job_file.is_some()
    }

    pub fn is_printing(&self) -> bool {
        self.job().printing()
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.phase(), JobPhase::Paused)
    }

    pub fn is_saving(&self) -> bool {
        self.job().saving()
    }

    pub fn is_logging(&self) -> bool {
        self.job().logging()
    }

    pub fn is_print_done(&self) -> bool {
        self.job().print_done()
    }

    pub fn abort_requested(&self) -> bool {
        self.flags.abort_requested
    }

    /// Samples and clears the abort request for the host loop.
    pub fn take_abort_request(&mut self) -> bool {
        core::mem::take(&mut self.flags.abort_requested)
    }

    pub fn percent_done(&self) -> u8 {
        if self.is_print_done() {
            return 100;
        }
        if self.job_file.is_none() {
            return 0;
        }
        self.progress.percent()
    }

    pub fn permyriad_done(&self) -> u16 {
        if self.is_print_done() {
            return 10_000;
        }
        if self.job_file.is_none() {
            return 0;
        }
        self.progress.permyriad()
    }

    pub fn mount(&mut self) -> Result<(), MediaError> {
        let stale = self.job_file.is_some() || self.recovery.is_some();
        if self.flags.mounted || self.workdir.has_root() || stale {
            self.release();
        }
        let root = match self.volume.mount() {
            Ok(root) => root,
            Err(err) => {
                log::warn!("card: mount_failed reason={}", err.label());
                return Err(err);
            }
        };
        if let Some(stale) = self.workdir.attach_root(root) {
            self.volume.close(stale);
        }
        self.flags.mounted = true;
        self.after_navigation();
        log::info!("card: mounted");
        Ok(())
    }

    pub fn release(&mut self) {
        self.end_job();
        self.close_job_recovery_file();
        self.unmount_volume();
        self.selected = None;
        self.autostart = None;
        log::info!("card: released");
    }

    /// Polls media presence and reacts to a change since the last poll.
    ///
    /// Removal while a job file is open only raises the abort request and
    /// drops the directories; the host closes the job through `abort_now`.
    pub fn manage_media(&mut self) -> Result<Option<MediaChange>, MediaError> {
        let inserted = self.detect.is_inserted();
        let previous = self.presence.replace(inserted);
        if previous == Some(inserted) {
            return Ok(None);
        }
        if inserted {
            log::info!("card: media_change state={}", MediaChange::Inserted.label());
            self.mount()?;
            if previous.is_none() && self.config.autostart {
                self.autofile_begin()?;
            }
            return Ok(Some(MediaChange::Inserted));
        }
        if previous.is_none() {
            return Ok(None);
        }
        log::info!("card: media_change state={}", MediaChange::Removed.label());
        if self.job_file.is_some() {
            self.flags.abort_requested = true;
            log::warn!(
                "card: media_removed_mid_job path={} pos={}",
                self.job_path,
                self.progress.position
            );
            self.close_job_recovery_file();
            self.unmount_volume();
        } else {
            self.release();
        }
        Ok(Some(MediaChange::Removed))
    }

    pub fn set_status_interval(&mut self, interval_ms: u32) {
        self.config.status_interval_ms = interval_ms;
        self.reporter.set_interval(interval_ms);
    }

    fn unmount_volume(&mut self) {
        self.workdir.detach(&mut self.volume);
        if self.flags.mounted {
            self.volume.unmount();
        }
        self.flags.mounted = false;
        self.flags.work_dir_is_root = true;
        self.sort.flush();
    }

    fn require_mounted(&self) -> Result<(), MediaError> {
        if self.flags.mounted {
            Ok(())
        } else {
            Err(MediaError::NotMounted)
        }
    }

    fn visibility(&self) -> Visibility {
        Visibility {
            gcode_only: self.config.gcode_only,
            bin_files: self.config.list_bin_files,
        }
    }

    fn after_navigation(&mut self) {
        self.flags.work_dir_is_root = self.workdir.is_root();
        self.sort.invalidate();
    }

    fn record_selection(&mut self, key: SortKey) -> SortKey {
        self.flags.filename_is_dir = key.is_dir;
        self.flags.filename_is_bin = key.is_bin;
        self.selected = Some(key.clone());
        key
    }
}
