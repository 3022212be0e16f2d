mod detect;

pub use detect::{AlwaysInserted, DetectLevel, DetectPin, MediaDetect};

use crate::error::MediaError;
use crate::types::{LongName, ShortName};

pub const ATTR_READ_ONLY: u8 = 0x01;
pub const ATTR_HIDDEN: u8 = 0x02;
pub const ATTR_SYSTEM: u8 = 0x04;
pub const ATTR_VOLUME: u8 = 0x08;
pub const ATTR_DIRECTORY: u8 = 0x10;
pub const ATTR_ARCHIVE: u8 = 0x20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    // create if missing, truncate if present
    Write,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    pub short_name: ShortName,
    pub long_name: LongName,
    pub attributes: u8,
    pub size: u32,
    // FAT packed date in the high half, time in the low half
    pub modified: u32,
}

impl DirEntry {
    pub fn is_dir(&self) -> bool {
        (self.attributes & ATTR_DIRECTORY) != 0
    }

    pub fn is_hidden(&self) -> bool {
        (self.attributes & (ATTR_HIDDEN | ATTR_SYSTEM | ATTR_VOLUME)) != 0
    }

    pub fn display_name(&self) -> &str {
        if self.long_name.is_empty() {
            self.short_name.as_str()
        } else {
            self.long_name.as_str()
        }
    }

    pub fn extension(&self) -> &str {
        match self.short_name.rsplit_once('.') {
            Some((_, ext)) => ext,
            None => "",
        }
    }

    pub fn is_bin(&self) -> bool {
        !self.is_dir() && self.extension().eq_ignore_ascii_case("BIN")
    }

    // *.G* files that are not editor backups (*.G~)
    pub fn is_gcode(&self) -> bool {
        let ext = self.extension().as_bytes();
        !self.is_dir()
            && !ext.is_empty()
            && ext[0].eq_ignore_ascii_case(&b'G')
            && ext.get(1) != Some(&b'~')
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.short_name.eq_ignore_ascii_case(name)
            || (!self.long_name.is_empty() && self.long_name.eq_ignore_ascii_case(name))
    }
}

/// The filesystem/volume parser the card reader drives.
///
/// `File` is an owned handle to one open file or directory. Handles are never
/// cloned; every handle obtained from `mount` or `open` must be returned
/// through `close`.
pub trait MediaVolume {
    type File;

    fn mount(&mut self) -> Result<Self::File, MediaError>;
    fn unmount(&mut self);

    fn open(
        &mut self,
        parent: &Self::File,
        name: &str,
        mode: OpenMode,
    ) -> Result<Self::File, MediaError>;
    fn close(&mut self, file: Self::File);

    fn read(&mut self, file: &mut Self::File, buf: &mut [u8]) -> Result<usize, MediaError>;
    fn write(&mut self, file: &mut Self::File, data: &[u8]) -> Result<usize, MediaError>;
    fn seek(&mut self, file: &mut Self::File, position: u32) -> Result<(), MediaError>;

    fn position(&self, file: &Self::File) -> u32;
    fn size(&self, file: &Self::File) -> u32;
    fn is_directory(&self, file: &Self::File) -> bool;

    /// Raw directory enumeration, hidden and system entries included.
    /// Returns `None` past the last entry.
    fn dir_entry(&mut self, dir: &Self::File, index: u16) -> Result<Option<DirEntry>, MediaError>;

    fn remove(&mut self, parent: &Self::File, name: &str) -> Result<(), MediaError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visibility {
    pub gcode_only: bool,
    pub bin_files: bool,
}

impl Visibility {
    pub fn accepts(self, entry: &DirEntry) -> bool {
        if entry.is_hidden() || entry.short_name.starts_with('.') {
            return false;
        }
        if entry.is_dir() || !self.gcode_only {
            return true;
        }
        entry.is_gcode() || (self.bin_files && entry.is_bin())
    }
}

pub(crate) fn open_dir<V: MediaVolume>(
    volume: &mut V,
    parent: &V::File,
    name: &str,
) -> Result<V::File, MediaError> {
    let dir = volume.open(parent, name, OpenMode::Read)?;
    if !volume.is_directory(&dir) {
        volume.close(dir);
        return Err(MediaError::NotADirectory);
    }
    Ok(dir)
}

pub(crate) fn open_file<V: MediaVolume>(
    volume: &mut V,
    parent: &V::File,
    name: &str,
    mode: OpenMode,
) -> Result<V::File, MediaError> {
    if name.is_empty() {
        return Err(MediaError::IsADirectory);
    }
    let file = volume.open(parent, name, mode)?;
    if volume.is_directory(&file) {
        volume.close(file);
        return Err(MediaError::IsADirectory);
    }
    Ok(file)
}

pub(crate) fn find_entry<V: MediaVolume>(
    volume: &mut V,
    dir: &V::File,
    name: &str,
) -> Result<Option<DirEntry>, MediaError> {
    let mut index = 0u16;
    while let Some(entry) = volume.dir_entry(dir, index)? {
        if entry.matches_name(name) {
            return Ok(Some(entry));
        }
        index = index.saturating_add(1);
        if index == u16::MAX {
            break;
        }
    }
    Ok(None)
}
