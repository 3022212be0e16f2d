#[cfg(test)]
mod tests;

use crate::config::MAX_DIR_DEPTH;
use crate::error::MediaError;
use crate::media::{find_entry, open_dir, MediaVolume};
use crate::types::{push_truncated, str_truncated, MediaPath, ShortName};

pub(crate) struct Level<F> {
    pub(crate) file: F,
    pub(crate) name: ShortName,
}

/// Open directory handles from the volume root down to the working directory.
///
/// Depth counts the levels below root and never exceeds [`MAX_DIR_DEPTH`].
/// Every level owns its handle; ascending or resetting closes the handles it
/// leaves behind.
pub struct WorkDir<F> {
    root: Option<F>,
    levels: heapless::Vec<Level<F>, MAX_DIR_DEPTH>,
}

impl<F> Default for WorkDir<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> WorkDir<F> {
    pub const fn new() -> Self {
        Self {
            root: None,
            levels: heapless::Vec::new(),
        }
    }

    pub fn attach_root(&mut self, root: F) -> Option<F> {
        self.root.replace(root)
    }

    pub fn has_root(&self) -> bool {
        self.root.is_some()
    }

    pub fn root(&self) -> Option<&F> {
        self.root.as_ref()
    }

    pub fn current(&self) -> Option<&F> {
        match self.levels.last() {
            Some(level) => Some(&level.file),
            None => self.root.as_ref(),
        }
    }

    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn is_root(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn current_name(&self) -> ShortName {
        match self.levels.last() {
            Some(level) => level.name.clone(),
            None => str_truncated("/"),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|level| level.name.as_str())
    }

    /// Absolute path of the working directory, always ending in `/`.
    pub fn path(&self) -> MediaPath {
        let mut out = MediaPath::new();
        push_truncated(&mut out, "/");
        for level in self.levels.iter() {
            push_truncated(&mut out, &level.name);
            push_truncated(&mut out, "/");
        }
        out
    }

    pub fn reset<V: MediaVolume<File = F>>(&mut self, volume: &mut V) {
        while let Some(level) = self.levels.pop() {
            volume.close(level.file);
        }
    }

    pub fn detach<V: MediaVolume<File = F>>(&mut self, volume: &mut V) {
        self.reset(volume);
        if let Some(root) = self.root.take() {
            volume.close(root);
        }
    }

    pub fn descend<V: MediaVolume<File = F>>(
        &mut self,
        volume: &mut V,
        name: &str,
    ) -> Result<(), MediaError> {
        if self.levels.is_full() {
            return Err(MediaError::PathTooDeep);
        }
        let parent = self.current().ok_or(MediaError::NotMounted)?;
        let level = open_level(volume, parent, name)?;
        if let Err(level) = self.levels.push(level) {
            volume.close(level.file);
            return Err(MediaError::PathTooDeep);
        }
        Ok(())
    }

    /// Pops one level; at root this does nothing. Returns the new depth.
    pub fn ascend<V: MediaVolume<File = F>>(&mut self, volume: &mut V) -> usize {
        if let Some(level) = self.levels.pop() {
            volume.close(level.file);
        }
        self.levels.len()
    }

    pub(crate) fn extend<V: MediaVolume<File = F>>(
        &mut self,
        volume: &mut V,
        levels: heapless::Vec<Level<F>, MAX_DIR_DEPTH>,
    ) -> Result<(), MediaError> {
        let mut overflow = false;
        for level in levels {
            if overflow {
                volume.close(level.file);
                continue;
            }
            if let Err(level) = self.levels.push(level) {
                volume.close(level.file);
                overflow = true;
            }
        }
        if overflow {
            Err(MediaError::PathTooDeep)
        } else {
            Ok(())
        }
    }
}

pub(crate) fn open_level<V: MediaVolume>(
    volume: &mut V,
    parent: &V::File,
    name: &str,
) -> Result<Level<V::File>, MediaError> {
    let file = open_dir(volume, parent, name)?;
    let short = match find_entry(volume, parent, name) {
        Ok(Some(entry)) => entry.short_name,
        Ok(None) => level_name(name),
        Err(err) => {
            volume.close(file);
            return Err(err);
        }
    };
    Ok(Level { file, name: short })
}

fn level_name(name: &str) -> ShortName {
    let mut out = ShortName::new();
    for ch in name.chars() {
        if out.push(ch.to_ascii_uppercase()).is_err() {
            break;
        }
    }
    out
}
