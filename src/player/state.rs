//! `Player`: catalog, queue and engine behind one synchronous API.
//!
//! Every method runs to completion, including the events it causes, before
//! returning. `PlayerController` serializes calls onto one thread; tests
//! drive a `Player` directly.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audio::{
    AudioOutput, Completion, EngineError, PlaybackEngine, PlaybackEvent, PlaybackQueue,
    PlaybackState,
};
use crate::config::Settings;
use crate::error::Result;
use crate::library::{LoftyTagReader, TagReader, Track, TrackCatalog};

use super::seek::parse_position;

/// Read-only view of the player at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub current_index: Option<usize>,
    pub current_track: Option<Track>,
    pub position: Option<Duration>,
    pub duration: Option<Duration>,
    pub queue_len: usize,
}

pub struct Player<O: AudioOutput> {
    catalog: TrackCatalog,
    queue: PlaybackQueue,
    engine: PlaybackEngine<O>,
    tags: Box<dyn TagReader + Send>,
    settings: Settings,
    subscribers: Vec<Sender<PlaybackEvent>>,
}

impl<O: AudioOutput> Player<O> {
    pub fn new(output: O, settings: Settings) -> Self {
        Self::with_tag_reader(output, settings, Box::new(LoftyTagReader))
    }

    pub fn with_tag_reader(output: O, settings: Settings, tags: Box<dyn TagReader + Send>) -> Self {
        Self {
            catalog: TrackCatalog::new(),
            queue: PlaybackQueue::new(),
            engine: PlaybackEngine::new(output),
            tags,
            settings,
            subscribers: Vec::new(),
        }
    }

    /// Load `dir` (or the configured default directory) into the catalog.
    pub fn load_songs(&mut self, dir: Option<&Path>) -> Result<usize> {
        let default_dir;
        let dir = match dir {
            Some(d) => d,
            None => {
                default_dir = self.settings.library.resolve_default_dir();
                debug!(dir = %default_dir.display(), "no directory given, using default");
                &default_dir
            }
        };
        let added = self
            .catalog
            .load(dir, &self.settings.library, self.tags.as_ref())?;
        Ok(added)
    }

    pub fn buffer(&self) -> &[Track] {
        self.catalog.tracks()
    }

    pub fn queue(&self) -> &[Track] {
        self.queue.tracks()
    }

    /// Append the catalog entries at `indices` to the queue, in that order.
    pub fn add_tracks_to_queue_by_indices(&mut self, indices: &[usize]) -> Result<()> {
        let tracks = self.catalog.tracks_by_indices(indices)?;
        for track in tracks {
            self.queue.add_track(track);
        }
        self.queue_changed();
        Ok(())
    }

    /// Remove queue entries. When the playing track goes, playback moves on
    /// to the track that took its place.
    pub fn remove_tracks_from_queue_by_indices(&mut self, indices: &[usize]) -> Result<()> {
        let removed_current = self.queue.remove_by_indices(indices)?;
        if removed_current && self.engine.live_handle().is_some() {
            if let Err(e) = self.engine.rebind(&mut self.queue) {
                self.report_failure(&e);
            }
        }
        self.flush();
        self.queue_changed();
        Ok(())
    }

    pub fn shuffle_queue(&mut self) {
        self.queue.shuffle();
        self.queue_changed();
    }

    pub fn clear_buffer(&mut self) {
        self.catalog.clear();
        info!("catalog cleared");
    }

    /// Stop playback and empty the queue.
    pub fn clear_queue(&mut self) {
        self.engine.stop();
        self.queue.clear();
        self.flush();
        self.queue_changed();
    }

    pub fn play_track(&mut self) -> Result<()> {
        self.drive(|engine, queue| engine.play(queue))
    }

    pub fn pause_track(&mut self) -> Result<()> {
        self.drive(|engine, _| engine.pause())
    }

    pub fn stop_track(&mut self) {
        self.engine.stop();
        self.flush();
    }

    pub fn next_track(&mut self) -> Result<()> {
        self.drive(|engine, queue| engine.next(queue))
    }

    pub fn prev_track(&mut self) -> Result<()> {
        self.drive(|engine, queue| engine.prev(queue))
    }

    /// Seek to a position typed by the user; see [`parse_position`].
    pub fn seek_track(&mut self, input: &str) -> Result<Duration> {
        let position = parse_position(input)?;
        self.seek_to(position)
    }

    pub fn seek_to(&mut self, position: Duration) -> Result<Duration> {
        self.drive(|engine, _| engine.seek(position))
    }

    pub fn fast_forward(&mut self, offset: Duration) -> Result<Duration> {
        self.drive(|engine, _| engine.fast_forward(offset))
    }

    pub fn rewind(&mut self, offset: Duration) -> Result<Duration> {
        self.drive(|engine, _| engine.rewind(offset))
    }

    /// Fast-forward by `playback.seek_step_secs`.
    pub fn skip_forward(&mut self) -> Result<Duration> {
        self.fast_forward(self.seek_step())
    }

    /// Rewind by `playback.seek_step_secs`.
    pub fn skip_backward(&mut self) -> Result<Duration> {
        self.rewind(self.seek_step())
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.queue.current()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.queue.current_index()
    }

    pub fn position(&self) -> Option<Duration> {
        self.engine.position()
    }

    pub fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            state: self.engine.state(),
            current_index: self.queue.current_index(),
            current_track: self.queue.current().cloned(),
            position: self.engine.position(),
            duration: self.engine.duration(),
            queue_len: self.queue.len(),
        }
    }

    /// Receive every event from now on. Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<PlaybackEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Apply a completion reported by the output backend.
    pub fn handle_completion(&mut self, completion: Completion) {
        if let Err(e) = self.engine.on_completion(completion, &mut self.queue) {
            self.report_failure(&e);
        }
        self.flush();
    }

    fn drive<T>(
        &mut self,
        op: impl FnOnce(&mut PlaybackEngine<O>, &mut PlaybackQueue) -> std::result::Result<T, EngineError>,
    ) -> Result<T> {
        let result = op(&mut self.engine, &mut self.queue);
        self.flush();
        Ok(result?)
    }

    fn seek_step(&self) -> Duration {
        Duration::from_secs(self.settings.playback.seek_step_secs)
    }

    /// A failure with no caller waiting on it.
    fn report_failure(&mut self, e: &EngineError) {
        warn!(error = %e, "playback stopped");
        self.flush();
        let message = e.to_string();
        let event = match (e, self.queue.current_index()) {
            (EngineError::TrackOpenFailed { .. }, Some(index)) => {
                PlaybackEvent::TrackOpenFailed { index, message }
            }
            _ => PlaybackEvent::PlaybackError { message },
        };
        self.emit(event);
    }

    fn queue_changed(&mut self) {
        let len = self.queue.len();
        self.emit(PlaybackEvent::QueueChanged { len });
    }

    fn flush(&mut self) {
        for event in self.engine.take_events() {
            self.emit(event);
        }
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
