//! Playback events
//!
//! Emitted after the state they describe has been applied, so subscribers
//! can refresh their view (current-track highlight, transport buttons,
//! queue listing) straight from the event or from a fresh snapshot.

use crate::library::Track;

use super::types::PlaybackState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// A new handle was bound to the track at `index` in the queue.
    TrackChanged { index: usize, track: Track },

    /// The engine moved between stopped, playing and paused.
    StateChanged(PlaybackState),

    /// Tracks were added, removed, shuffled or cleared.
    QueueChanged { len: usize },

    /// The last queued track finished on its own.
    PlaybackFinished,

    /// Playback stopped because the track at `index` could not be opened
    /// while moving onto it with no caller to report to. The cursor stays
    /// on that track, so skipping it is safe.
    TrackOpenFailed { index: usize, message: String },

    /// Playback stopped because of a device or decoder failure on the live
    /// handle. Nothing was advanced.
    PlaybackError { message: String },
}
