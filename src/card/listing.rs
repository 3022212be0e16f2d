use core::fmt;

use super::CardReader;
use crate::config::MAX_DIR_DEPTH;
use crate::error::MediaError;
use crate::media::{open_dir, DirEntry, MediaDetect, MediaVolume, Visibility};
use crate::sort::SortStrategy;
use crate::types::{ListingFlags, MediaPath};

impl<V: MediaVolume, S: SortStrategy, D: MediaDetect> CardReader<V, S, D> {
    /// Writes the working directory's visible files, recursing into
    /// subdirectories, one `PATH/NAME SIZE` line each.
    pub fn ls<W: fmt::Write>(
        &mut self,
        flags: ListingFlags,
        out: &mut W,
    ) -> Result<(), MediaError> {
        self.require_mounted()?;
        let mut visibility = self.visibility();
        visibility.bin_files |= flags.only_bin;
        let budget = MAX_DIR_DEPTH - self.workdir.depth();
        let dir = self.workdir.current().ok_or(MediaError::NotMounted)?;
        let prefix = MediaPath::new();
        let mut listing = Listing {
            visibility,
            flags,
            out,
            files: 0,
        };
        listing.print(&mut self.volume, dir, &prefix, budget)?;
        log::debug!("card: ls files={} dir={}", listing.files, self.workdir.path());
        Ok(())
    }
}

struct Listing<'w, W> {
    visibility: Visibility,
    flags: ListingFlags,
    out: &'w mut W,
    files: usize,
}

impl<W: fmt::Write> Listing<'_, W> {
    fn print<V: MediaVolume>(
        &mut self,
        volume: &mut V,
        dir: &V::File,
        prefix: &MediaPath,
        budget: usize,
    ) -> Result<(), MediaError> {
        let mut index = 0u16;
        while let Some(entry) = volume.dir_entry(dir, index)? {
            index = match index.checked_add(1) {
                Some(next) => next,
                None => break,
            };
            if !self.visibility.accepts(&entry) {
                continue;
            }
            if entry.is_dir() {
                if budget == 0 {
                    continue;
                }
                let mut sub_prefix = prefix.clone();
                if sub_prefix.push_str(&entry.short_name).is_err()
                    || sub_prefix.push('/').is_err()
                {
                    continue;
                }
                let sub = open_dir(volume, dir, &entry.short_name)?;
                let listed = self.print(volume, &sub, &sub_prefix, budget - 1);
                volume.close(sub);
                listed?;
                continue;
            }
            if self.flags.only_bin && !entry.is_bin() {
                continue;
            }
            self.line(prefix, &entry).map_err(|_| MediaError::Io)?;
            self.files += 1;
        }
        Ok(())
    }

    fn line(&mut self, prefix: &str, entry: &DirEntry) -> fmt::Result {
        write!(self.out, "{}{} {}", prefix, entry.short_name, entry.size)?;
        if self.flags.timestamp {
            write!(self.out, " 0x{:08X}", entry.modified)?;
        }
        if self.flags.long_filename {
            write!(self.out, " {}", entry.display_name())?;
        }
        self.out.write_str("\n")
    }
}
