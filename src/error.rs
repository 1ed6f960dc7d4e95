//! Error types shared by the catalog, queue, engine and controller.
//!
//! Each component reports its own error enum; `PlayerError` is the flat
//! taxonomy the controller hands to callers.

use std::path::PathBuf;

use thiserror::Error;

use crate::audio::{EngineError, OutputError, QueueError};
use crate::library::{CatalogError, TagError};

/// One or more indices fell outside `[0, len)`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid indices: {}; valid range is {}", join_indices(.indices), valid_range(*.len))]
pub struct IndexOutOfRange {
    /// Every offending index, in the order the caller supplied them.
    pub indices: Vec<usize>,
    /// Length of the collection the indices were checked against.
    pub len: usize,
}

impl IndexOutOfRange {
    /// Check `indices` against `len`, collecting every offender.
    pub fn check(indices: &[usize], len: usize) -> std::result::Result<(), Self> {
        let invalid: Vec<usize> = indices.iter().copied().filter(|&i| i >= len).collect();
        if invalid.is_empty() {
            Ok(())
        } else {
            Err(Self {
                indices: invalid,
                len,
            })
        }
    }
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn valid_range(len: usize) -> String {
    if len == 0 {
        "empty".to_string()
    } else {
        format!("0 - {}", len - 1)
    }
}

/// Errors surfaced by `Player` and `PlayerController`.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("directory '{}' does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("directory '{}' contains no playable files", .0.display())]
    EmptyCatalog(PathBuf),

    #[error("failed to load track '{}': {source}", .path.display())]
    TrackLoadFailed {
        path: PathBuf,
        #[source]
        source: TagError,
    },

    #[error(transparent)]
    IndexOutOfRange(#[from] IndexOutOfRange),

    #[error("no current track")]
    NoCurrentTrack,

    #[error("no next track")]
    NoNextTrack,

    #[error("no previous track")]
    NoPreviousTrack,

    #[error("no track is playing")]
    NoActiveTrack,

    #[error("failed to open '{}': {source}", .path.display())]
    TrackOpenFailed {
        path: PathBuf,
        #[source]
        source: OutputError,
    },

    #[error("invalid seek position '{0}'; expected seconds, MM:SS or HH:MM:SS")]
    InvalidSeekFormat(String),

    /// The output backend failed while operating on an already open handle.
    #[error("audio output error: {0}")]
    Output(OutputError),

    #[error("player thread is not running")]
    Disconnected,
}

impl From<CatalogError> for PlayerError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::DirectoryNotFound(p) => Self::DirectoryNotFound(p),
            CatalogError::EmptyCatalog(p) => Self::EmptyCatalog(p),
            CatalogError::TrackLoadFailed { path, source } => Self::TrackLoadFailed { path, source },
            CatalogError::IndexOutOfRange(e) => Self::IndexOutOfRange(e),
        }
    }
}

impl From<QueueError> for PlayerError {
    fn from(e: QueueError) -> Self {
        match e {
            QueueError::IndexOutOfRange(e) => Self::IndexOutOfRange(e),
            QueueError::NoCurrentTrack => Self::NoCurrentTrack,
            QueueError::NoNextTrack => Self::NoNextTrack,
            QueueError::NoPreviousTrack => Self::NoPreviousTrack,
        }
    }
}

impl From<EngineError> for PlayerError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Queue(q) => q.into(),
            EngineError::NoActiveTrack => Self::NoActiveTrack,
            EngineError::TrackOpenFailed { path, source } => Self::TrackOpenFailed { path, source },
            EngineError::Output(o) => Self::Output(o),
        }
    }
}

/// Result type for controller operations.
pub type Result<T> = std::result::Result<T, PlayerError>;
