use crate::error::MediaError;
use crate::media::{DirEntry, MediaVolume, OpenMode, ATTR_ARCHIVE, ATTR_DIRECTORY, ATTR_HIDDEN};
use crate::types::str_truncated;

struct Node {
    short: String,
    long: String,
    attributes: u8,
    parent: Option<usize>,
    children: Vec<usize>,
    data: Vec<u8>,
    modified: u32,
}

#[derive(Debug)]
pub(crate) struct MemFile {
    node: usize,
    pos: u32,
}

pub(crate) struct MemVolume {
    nodes: Vec<Node>,
    pub(crate) open_handles: usize,
    pub(crate) fail_mount: bool,
    pub(crate) fail_io: bool,
    pub(crate) mounts: usize,
}

fn short_name_for(name: &str) -> String {
    let upper = name.to_ascii_uppercase();
    let (stem, ext) = match upper.rsplit_once('.') {
        Some((stem, ext)) => (stem.to_string(), ext.to_string()),
        None => (upper.clone(), String::new()),
    };
    let fits = stem.len() <= 8 && ext.len() <= 3 && !stem.contains(' ');
    let stem = if fits {
        stem
    } else {
        let base: String = stem.chars().filter(|c| *c != ' ').take(6).collect();
        format!("{}~1", base)
    };
    let ext: String = ext.chars().take(3).collect();
    if ext.is_empty() {
        stem
    } else {
        format!("{}.{}", stem, ext)
    }
}

impl MemVolume {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![Node {
                short: String::from("/"),
                long: String::new(),
                attributes: ATTR_DIRECTORY,
                parent: None,
                children: Vec::new(),
                data: Vec::new(),
                modified: 0,
            }],
            open_handles: 0,
            fail_mount: false,
            fail_io: false,
            mounts: 0,
        }
    }

    fn lookup(&self, path: &str) -> usize {
        let mut node = 0usize;
        for part in path.split('/').filter(|part| !part.is_empty()) {
            node = self
                .child(node, part)
                .unwrap_or_else(|| panic!("missing test node {}", path));
        }
        node
    }

    fn child(&self, parent: usize, name: &str) -> Option<usize> {
        self.nodes[parent].children.iter().copied().find(|&idx| {
            let node = &self.nodes[idx];
            node.short.eq_ignore_ascii_case(name)
                || (!node.long.is_empty() && node.long.eq_ignore_ascii_case(name))
        })
    }

    fn insert(&mut self, parent: usize, name: &str, attributes: u8, data: Vec<u8>) -> usize {
        let short = short_name_for(name);
        let long = if short == name {
            String::new()
        } else {
            String::from(name)
        };
        let idx = self.nodes.len();
        self.nodes.push(Node {
            short,
            long,
            attributes,
            parent: Some(parent),
            children: Vec::new(),
            data,
            modified: 0x5A21_6000 + idx as u32,
        });
        self.nodes[parent].children.push(idx);
        idx
    }

    fn split_parent(path: &str) -> (&str, &str) {
        match path.trim_end_matches('/').rsplit_once('/') {
            Some((parent, name)) => (parent, name),
            None => ("", path),
        }
    }

    pub(crate) fn dir(mut self, path: &str) -> Self {
        let (parent, name) = Self::split_parent(path);
        let parent = self.lookup(parent);
        self.insert(parent, name, ATTR_DIRECTORY, Vec::new());
        self
    }

    pub(crate) fn file(mut self, path: &str, data: &[u8]) -> Self {
        let (parent, name) = Self::split_parent(path);
        let parent = self.lookup(parent);
        self.insert(parent, name, ATTR_ARCHIVE, data.to_vec());
        self
    }

    pub(crate) fn hidden(mut self, path: &str) -> Self {
        let (parent, name) = Self::split_parent(path);
        let parent = self.lookup(parent);
        self.insert(parent, name, ATTR_ARCHIVE | ATTR_HIDDEN, Vec::new());
        self
    }

    pub(crate) fn exists(&self, path: &str) -> bool {
        let mut node = 0usize;
        for part in path.split('/').filter(|part| !part.is_empty()) {
            match self.child(node, part) {
                Some(next) => node = next,
                None => return false,
            }
        }
        true
    }

    pub(crate) fn contents(&self, path: &str) -> Vec<u8> {
        self.nodes[self.lookup(path)].data.clone()
    }

    pub(crate) fn remove_path(&mut self, path: &str) {
        let node = self.lookup(path);
        if let Some(parent) = self.nodes[node].parent {
            self.nodes[parent].children.retain(|&idx| idx != node);
        }
    }

    fn check_io(&self) -> Result<(), MediaError> {
        if self.fail_io {
            Err(MediaError::Io)
        } else {
            Ok(())
        }
    }

    fn handle(&mut self, node: usize) -> MemFile {
        self.open_handles += 1;
        MemFile { node, pos: 0 }
    }
}

impl MediaVolume for MemVolume {
    type File = MemFile;

    fn mount(&mut self) -> Result<MemFile, MediaError> {
        if self.fail_mount {
            return Err(MediaError::Io);
        }
        self.mounts += 1;
        Ok(self.handle(0))
    }

    fn unmount(&mut self) {}

    fn open(
        &mut self,
        parent: &MemFile,
        name: &str,
        mode: OpenMode,
    ) -> Result<MemFile, MediaError> {
        self.check_io()?;
        if (self.nodes[parent.node].attributes & ATTR_DIRECTORY) == 0 {
            return Err(MediaError::NotADirectory);
        }
        if name == "." {
            return Ok(self.handle(parent.node));
        }
        if name == ".." {
            let up = self.nodes[parent.node].parent.unwrap_or(0);
            return Ok(self.handle(up));
        }
        match (self.child(parent.node, name), mode) {
            (Some(node), OpenMode::Read) => Ok(self.handle(node)),
            (Some(node), OpenMode::Write) => {
                if (self.nodes[node].attributes & ATTR_DIRECTORY) != 0 {
                    return Err(MediaError::IsADirectory);
                }
                self.nodes[node].data.clear();
                Ok(self.handle(node))
            }
            (None, OpenMode::Read) => Err(MediaError::NotFound),
            (None, OpenMode::Write) => {
                let node = self.insert(parent.node, name, ATTR_ARCHIVE, Vec::new());
                Ok(self.handle(node))
            }
        }
    }

    fn close(&mut self, _file: MemFile) {
        self.open_handles -= 1;
    }

    fn read(&mut self, file: &mut MemFile, buf: &mut [u8]) -> Result<usize, MediaError> {
        self.check_io()?;
        let data = &self.nodes[file.node].data;
        let start = (file.pos as usize).min(data.len());
        let count = buf.len().min(data.len() - start);
        buf[..count].copy_from_slice(&data[start..start + count]);
        file.pos += count as u32;
        Ok(count)
    }

    fn write(&mut self, file: &mut MemFile, bytes: &[u8]) -> Result<usize, MediaError> {
        self.check_io()?;
        let data = &mut self.nodes[file.node].data;
        let start = file.pos as usize;
        if data.len() < start + bytes.len() {
            data.resize(start + bytes.len(), 0);
        }
        data[start..start + bytes.len()].copy_from_slice(bytes);
        file.pos += bytes.len() as u32;
        Ok(bytes.len())
    }

    fn seek(&mut self, file: &mut MemFile, position: u32) -> Result<(), MediaError> {
        self.check_io()?;
        if position as usize > self.nodes[file.node].data.len() {
            return Err(MediaError::Io);
        }
        file.pos = position;
        Ok(())
    }

    fn position(&self, file: &MemFile) -> u32 {
        file.pos
    }

    fn size(&self, file: &MemFile) -> u32 {
        self.nodes[file.node].data.len() as u32
    }

    fn is_directory(&self, file: &MemFile) -> bool {
        (self.nodes[file.node].attributes & ATTR_DIRECTORY) != 0
    }

    fn dir_entry(&mut self, dir: &MemFile, index: u16) -> Result<Option<DirEntry>, MediaError> {
        self.check_io()?;
        let Some(&child) = self.nodes[dir.node].children.get(index as usize) else {
            return Ok(None);
        };
        let node = &self.nodes[child];
        Ok(Some(DirEntry {
            short_name: str_truncated(&node.short),
            long_name: str_truncated(&node.long),
            attributes: node.attributes,
            size: node.data.len() as u32,
            modified: node.modified,
        }))
    }

    fn remove(&mut self, parent: &MemFile, name: &str) -> Result<(), MediaError> {
        self.check_io()?;
        let node = self.child(parent.node, name).ok_or(MediaError::NotFound)?;
        if !self.nodes[node].children.is_empty() {
            return Err(MediaError::Io);
        }
        self.nodes[parent.node].children.retain(|&idx| idx != node);
        Ok(())
    }
}

pub(crate) fn sample_volume() -> MemVolume {
    MemVolume::new()
        .file("/b.gco", b"G1 X1\n")
        .dir("/A")
        .file("/a.gco", b"G28\nG1 Y2\n")
        .file("/notes.txt", b"not gcode")
        .hidden("/secret.gco")
        .dir("/A/SUB")
        .file("/A/part.gcode", b"M104 S200\n")
        .file("/A/SUB/deep.g", b"G4 P1\n")
        .file("/fw.bin", b"\x7fELF")
}
