//! The decode/output seam the engine drives.

use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use super::types::HandleId;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot open file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot decode: {0}")]
    Decode(String),

    #[error("seek failed: {0}")]
    Seek(String),

    #[error("no audio output device: {0}")]
    Device(String),

    #[error("unknown output handle {0}")]
    UnknownHandle(HandleId),
}

/// A backend that decodes files and plays them on an output device.
///
/// `open` returns a paused handle. Completions for a handle are reported
/// through the notifier the backend was built with, at most once, and never
/// after `close` has been called for it.
pub trait AudioOutput {
    fn open(&mut self, path: &Path) -> Result<HandleId, OutputError>;
    fn play(&mut self, handle: HandleId) -> Result<(), OutputError>;
    fn pause(&mut self, handle: HandleId) -> Result<(), OutputError>;
    fn seek(&mut self, handle: HandleId, position: Duration) -> Result<(), OutputError>;
    /// Elapsed playback time of `handle`.
    fn position(&self, handle: HandleId) -> Option<Duration>;
    /// Total length reported by the decoder, when it knows it.
    fn duration(&self, handle: HandleId) -> Option<Duration>;
    /// Stop output and release the device and file behind `handle`.
    fn close(&mut self, handle: HandleId);
}
