use crate::types::{FolderSort, SortFlag};

pub const MAX_DIR_DEPTH: usize = 10;
pub const MAX_DIR_NAME_LEN: usize = 8;
pub const SHORT_NAME_MAX: usize = 12;
pub const LONG_NAME_MAX: usize = 64;
// "/" + depth * ("DIRNAME/") + "FILENAME.EXT", rounded up
pub const MAX_PATH_LEN: usize = 112;
pub const SUBCALL_DEPTH_MAX: usize = 10;
pub const SUBCALL_DEPTH_DEFAULT: u8 = 1;
pub const SORT_LIMIT_DEFAULT: usize = 40;
pub const STATUS_LINE_MAX: usize = 96;

pub const JOB_RECOVERY_FILE: &str = "/PLR";
pub const AUTOSTART_PREFIX: &str = "/auto";
pub const AUTOSTART_SUFFIX: &str = ".g";
pub const AUTOSTART_MAX_FILES: u8 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardConfig {
    pub sort: SortFlag,
    pub folders: FolderSort,
    pub gcode_only: bool,
    pub list_bin_files: bool,
    pub subcall_depth: u8,
    pub status_interval_ms: u32,
    pub autostart: bool,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            sort: SortFlag::Forward,
            folders: FolderSort::Before,
            gcode_only: true,
            list_bin_files: false,
            subcall_depth: SUBCALL_DEPTH_DEFAULT,
            status_interval_ms: 0,
            autostart: false,
        }
    }
}

impl CardConfig {
    pub fn sanitized(mut self) -> Self {
        self.subcall_depth = self.subcall_depth.clamp(1, SUBCALL_DEPTH_MAX as u8);
        self.sort = self.sort.normalized();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_clamps_subcall_depth() {
        let zero = CardConfig {
            subcall_depth: 0,
            ..CardConfig::default()
        }
        .sanitized();
        assert_eq!(zero.subcall_depth, 1);

        let huge = CardConfig {
            subcall_depth: 200,
            ..CardConfig::default()
        }
        .sanitized();
        assert_eq!(huge.subcall_depth as usize, SUBCALL_DEPTH_MAX);
    }

    #[test]
    fn sanitized_folds_also_reverse() {
        let config = CardConfig {
            sort: SortFlag::AlsoReverse,
            ..CardConfig::default()
        }
        .sanitized();
        assert_eq!(config.sort, SortFlag::Reverse);
    }
}
