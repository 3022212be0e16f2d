use core::fmt::{self, Write as _};

use embassy_time::{Duration, Instant};

use super::CardReader;
use crate::media::{MediaDetect, MediaVolume};
use crate::sort::SortStrategy;
use crate::types::{push_truncated, StatusLine};

/// Paces the periodic job status report. A zero interval disables it.
#[derive(Clone, Copy, Debug)]
pub struct StatusReporter {
    interval: Duration,
    next: Option<Instant>,
}

impl StatusReporter {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval: Duration::from_millis(u64::from(interval_ms)),
            next: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn enabled(&self) -> bool {
        self.interval.as_ticks() != 0
    }

    pub fn set_interval(&mut self, interval_ms: u32) {
        self.interval = Duration::from_millis(u64::from(interval_ms));
        self.next = None;
    }

    /// True at most once per interval; the first poll after (re)arming is
    /// always due.
    pub fn due(&mut self, now: Instant) -> bool {
        if !self.enabled() {
            return false;
        }
        match self.next {
            Some(next) if now < next => false,
            _ => {
                self.next = Some(now + self.interval);
                true
            }
        }
    }
}

impl<V: MediaVolume, S: SortStrategy, D: MediaDetect> CardReader<V, S, D> {
    pub fn report_status<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        if self.is_printing() {
            writeln!(
                out,
                "SD printing byte {}/{}",
                self.progress.position, self.progress.size
            )
        } else {
            out.write_str("Not SD printing\n")
        }
    }

    /// `NAME PCT%` for the current or just finished job.
    pub fn status_line(&self) -> StatusLine {
        let mut line = StatusLine::new();
        let name = match self.selected.as_ref() {
            Some(selected) if !self.job_path.is_empty() => selected.name(),
            _ => self.job_path.rsplit('/').next().unwrap_or(""),
        };
        push_truncated(&mut line, name);
        let mut percent: heapless::String<6> = heapless::String::new();
        let _ = write!(percent, " {}%", self.percent_done());
        push_truncated(&mut line, &percent);
        line
    }

    /// Writes the status report when the auto-report interval has elapsed.
    /// Returns whether anything was written.
    pub fn auto_report<W: fmt::Write>(
        &mut self,
        now: Instant,
        out: &mut W,
    ) -> Result<bool, fmt::Error> {
        if !self.reporter.due(now) {
            return Ok(false);
        }
        self.report_status(out)?;
        Ok(true)
    }
}
