//! The playback state machine.
//!
//! `PlaybackEngine` owns the output backend and at most one live handle. A
//! handle exists exactly while the state is `Playing` or `Paused`; every path
//! back to `Stopped` closes it first. Switching tracks always closes the old
//! handle and opens a new one.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::library::Track;

use super::events::PlaybackEvent;
use super::output::{AudioOutput, OutputError};
use super::queue::{PlaybackQueue, QueueError};
use super::types::{Completion, HandleId, Outcome, PlaybackState};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error("no track is playing")]
    NoActiveTrack,

    #[error("failed to open '{}': {source}", .path.display())]
    TrackOpenFailed {
        path: PathBuf,
        #[source]
        source: OutputError,
    },

    #[error(transparent)]
    Output(OutputError),
}

#[derive(Debug)]
struct LiveHandle {
    id: HandleId,
    track: Track,
}

pub struct PlaybackEngine<O: AudioOutput> {
    output: O,
    state: PlaybackState,
    live: Option<LiveHandle>,
    events: Vec<PlaybackEvent>,
}

impl<O: AudioOutput> PlaybackEngine<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            state: PlaybackState::Stopped,
            live: None,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// The handle currently bound, if any.
    pub fn live_handle(&self) -> Option<HandleId> {
        self.live.as_ref().map(|l| l.id)
    }

    /// Events produced since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start or resume playback of the queue's current track.
    pub fn play(&mut self, queue: &mut PlaybackQueue) -> Result<(), EngineError> {
        match (self.state, self.live.as_ref()) {
            (PlaybackState::Playing, Some(_)) => Ok(()),
            (PlaybackState::Paused, Some(live)) => {
                let id = live.id;
                self.output.play(id).map_err(EngineError::Output)?;
                debug!(handle = %id, "resumed");
                self.set_state(PlaybackState::Playing);
                Ok(())
            }
            _ => {
                let index = queue
                    .rewind_if_released()
                    .ok_or(QueueError::NoCurrentTrack)?;
                self.start(queue, index)
            }
        }
    }

    /// Suspend output, keeping the handle open.
    pub fn pause(&mut self) -> Result<(), EngineError> {
        let Some(live) = self.live.as_ref() else {
            return Err(EngineError::NoActiveTrack);
        };
        if self.state == PlaybackState::Paused {
            return Ok(());
        }
        let id = live.id;
        self.output.pause(id).map_err(EngineError::Output)?;
        debug!(handle = %id, "paused");
        self.set_state(PlaybackState::Paused);
        Ok(())
    }

    /// Release the handle and go to `Stopped`. The queue cursor is untouched.
    pub fn stop(&mut self) {
        self.release();
        self.set_state(PlaybackState::Stopped);
    }

    /// Move to the next queued track and play it.
    pub fn next(&mut self, queue: &mut PlaybackQueue) -> Result<(), EngineError> {
        let index = queue.next()?;
        self.release();
        self.start(queue, index)
    }

    /// Move to the previous queued track and play it.
    pub fn prev(&mut self, queue: &mut PlaybackQueue) -> Result<(), EngineError> {
        let index = queue.prev()?;
        self.release();
        self.start(queue, index)
    }

    /// Re-sync with a queue that changed under the live handle (its track was
    /// removed, or the queue was cleared). Playback continues with the new
    /// current track only if the engine was playing.
    pub fn rebind(&mut self, queue: &mut PlaybackQueue) -> Result<(), EngineError> {
        let resume = self.state == PlaybackState::Playing;
        self.stop();
        match queue.current_index() {
            Some(index) if resume => self.start(queue, index),
            _ => Ok(()),
        }
    }

    /// Jump to `position`, clamped to the track length.
    pub fn seek(&mut self, position: Duration) -> Result<Duration, EngineError> {
        let Some(live) = self.live.as_ref() else {
            return Err(EngineError::NoActiveTrack);
        };
        let id = live.id;
        let target = match live.track.duration.or_else(|| self.output.duration(id)) {
            Some(total) => position.min(total),
            None => position,
        };
        self.output.seek(id, target).map_err(EngineError::Output)?;
        debug!(handle = %id, position_ms = target.as_millis() as u64, "seeked");
        Ok(target)
    }

    pub fn fast_forward(&mut self, offset: Duration) -> Result<Duration, EngineError> {
        let now = self.position().ok_or(EngineError::NoActiveTrack)?;
        self.seek(now.saturating_add(offset))
    }

    pub fn rewind(&mut self, offset: Duration) -> Result<Duration, EngineError> {
        let now = self.position().ok_or(EngineError::NoActiveTrack)?;
        self.seek(now.saturating_sub(offset))
    }

    /// Elapsed time of the live handle.
    pub fn position(&self) -> Option<Duration> {
        let live = self.live.as_ref()?;
        Some(self.output.position(live.id).unwrap_or(Duration::ZERO))
    }

    /// Length of the bound track, falling back to what the decoder reports.
    pub fn duration(&self) -> Option<Duration> {
        let live = self.live.as_ref()?;
        live.track.duration.or_else(|| self.output.duration(live.id))
    }

    /// Apply a completion reported by the output.
    ///
    /// Completions for anything but the live handle are stale and ignored.
    /// A clean end advances the queue; running off the end stops playback,
    /// releases the cursor and reports `PlaybackFinished` instead of failing.
    pub fn on_completion(
        &mut self,
        completion: Completion,
        queue: &mut PlaybackQueue,
    ) -> Result<(), EngineError> {
        if self.live_handle() != Some(completion.handle) {
            debug!(handle = %completion.handle, "ignoring completion from a released handle");
            return Ok(());
        }

        self.release();

        match completion.outcome {
            Outcome::Failed(message) => {
                warn!(handle = %completion.handle, %message, "playback failed");
                self.set_state(PlaybackState::Stopped);
                self.events.push(PlaybackEvent::PlaybackError { message });
                Ok(())
            }
            Outcome::EndOfStream => match queue.next() {
                Ok(index) => self.start(queue, index),
                Err(_) => {
                    info!("reached the end of the queue");
                    queue.release_cursor();
                    self.set_state(PlaybackState::Stopped);
                    self.events.push(PlaybackEvent::PlaybackFinished);
                    Ok(())
                }
            },
        }
    }

    /// Open the track at `index` and start it. On failure nothing stays open
    /// and the engine is `Stopped`.
    fn start(&mut self, queue: &PlaybackQueue, index: usize) -> Result<(), EngineError> {
        self.release();

        let Some(track) = queue.get(index).cloned() else {
            self.set_state(PlaybackState::Stopped);
            return Err(QueueError::NoCurrentTrack.into());
        };

        let id = match self.output.open(&track.path) {
            Ok(id) => id,
            Err(source) => {
                warn!(path = %track.path.display(), error = %source, "cannot open track");
                self.set_state(PlaybackState::Stopped);
                return Err(EngineError::TrackOpenFailed {
                    path: track.path,
                    source,
                });
            }
        };

        if let Err(e) = self.output.play(id) {
            self.output.close(id);
            self.set_state(PlaybackState::Stopped);
            return Err(EngineError::Output(e));
        }

        info!(handle = %id, index, track = %track, "now playing");
        self.live = Some(LiveHandle {
            id,
            track: track.clone(),
        });
        self.events.push(PlaybackEvent::TrackChanged { index, track });
        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    fn release(&mut self) {
        if let Some(live) = self.live.take() {
            debug!(handle = %live.id, "releasing handle");
            self.output.close(live.id);
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.events.push(PlaybackEvent::StateChanged(state));
        }
    }
}

impl<O: AudioOutput> Drop for PlaybackEngine<O> {
    fn drop(&mut self) {
        self.release();
    }
}
