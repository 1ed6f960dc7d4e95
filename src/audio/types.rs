//! Audio-related small types and handles.
//!
//! This module defines the playback state, output handle identifiers and the
//! completion notification the output raises when a track drains on its own.

use std::fmt;
use std::sync::Arc;

/// The playback state of the engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Identifies one opened decoder/output handle. Never reused by a backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct HandleId(pub u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a handle stopped producing audio.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The stream reached its end cleanly.
    EndOfStream,
    /// The device or decoder failed mid-stream.
    Failed(String),
}

/// Raised by the output when a handle finishes without being told to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub handle: HandleId,
    pub outcome: Outcome,
}

/// Callback the output uses to report completions. Safe to call from any
/// thread; the receiving side decides where the completion is applied.
#[derive(Clone)]
pub struct CompletionNotifier(Arc<dyn Fn(Completion) + Send + Sync>);

impl CompletionNotifier {
    pub fn new(f: impl Fn(Completion) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn notify(&self, completion: Completion) {
        (self.0)(completion);
    }
}

impl fmt::Debug for CompletionNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CompletionNotifier")
    }
}
