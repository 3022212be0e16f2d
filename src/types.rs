use crate::config::{LONG_NAME_MAX, MAX_PATH_LEN, SHORT_NAME_MAX, STATUS_LINE_MAX};

pub type ShortName = heapless::String<SHORT_NAME_MAX>;
pub type LongName = heapless::String<LONG_NAME_MAX>;
pub type MediaPath = heapless::String<MAX_PATH_LEN>;
pub type StatusLine = heapless::String<STATUS_LINE_MAX>;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SortFlag {
    Reverse,
    Off,
    Forward,
    AlsoReverse,
}

impl SortFlag {
    pub const fn normalized(self) -> Self {
        match self {
            Self::AlsoReverse => Self::Reverse,
            other => other,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Reverse | Self::AlsoReverse => "reverse",
            Self::Off => "off",
            Self::Forward => "forward",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum FolderSort {
    Before,
    Mixed,
    After,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ListingFlags {
    pub long_filename: bool,
    pub only_bin: bool,
    pub timestamp: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CardFlags {
    pub mounted: bool,
    pub abort_requested: bool,
    pub filename_is_dir: bool,
    pub filename_is_bin: bool,
    pub work_dir_is_root: bool,
}

pub(crate) fn push_truncated<const N: usize>(out: &mut heapless::String<N>, text: &str) {
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
}

pub(crate) fn str_truncated<const N: usize>(text: &str) -> heapless::String<N> {
    let mut out = heapless::String::new();
    push_truncated(&mut out, text);
    out
}
