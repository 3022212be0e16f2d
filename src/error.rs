use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaError {
    NotMounted,
    NotFound,
    NotADirectory,
    IsADirectory,
    PathTooDeep,
    CallDepthExceeded,
    IndexOutOfRange,
    NameTooLong,
    NotOpen,
    Io,
}

impl MediaError {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotMounted => "not_mounted",
            Self::NotFound => "not_found",
            Self::NotADirectory => "not_a_directory",
            Self::IsADirectory => "is_a_directory",
            Self::PathTooDeep => "path_too_deep",
            Self::CallDepthExceeded => "call_depth_exceeded",
            Self::IndexOutOfRange => "index_out_of_range",
            Self::NameTooLong => "name_too_long",
            Self::NotOpen => "not_open",
            Self::Io => "io",
        }
    }
}

impl fmt::Display for MediaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NotMounted => "No media mounted",
            Self::NotFound => "No such file or directory",
            Self::NotADirectory => "Not a directory",
            Self::IsADirectory => "Is a directory",
            Self::PathTooDeep => "Folder nesting too deep",
            Self::CallDepthExceeded => "Too many nested file calls",
            Self::IndexOutOfRange => "No item at that index",
            Self::NameTooLong => "Name too long",
            Self::NotOpen => "No file open",
            Self::Io => "Media read/write error",
        };
        f.write_str(message)
    }
}
