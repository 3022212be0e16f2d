#![cfg_attr(not(test), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod card;
pub mod config;
pub mod error;
pub mod job;
pub mod media;
pub mod path;
pub mod sort;
pub mod subcall;
#[cfg(test)]
mod testing;
pub mod types;
pub mod workdir;

pub use card::{CardReader, FinishOutcome, MediaChange, StatusReporter};
pub use config::CardConfig;
pub use error::MediaError;
pub use job::{JobApplyResult, JobApplyStatus, JobPhase, JobProgress, JobSnapshot};
pub use media::{
    AlwaysInserted, DetectLevel, DetectPin, DirEntry, MediaDetect, MediaVolume, OpenMode,
};
#[cfg(feature = "alloc")]
pub use sort::HeapSortCache;
pub use sort::{ArraySortCache, DefaultSortCache, SortCacheState, SortKey, SortStrategy, StackSort};
pub use types::{CardFlags, FolderSort, ListingFlags, SortFlag};
