//! `PlayerController`: a `Player` on its own thread.
//!
//! Commands and output completions share one channel, so the player sees
//! them strictly one at a time and no state is shared across threads.

use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error, info};

use crate::audio::{
    AudioOutput, CompletionNotifier, OutputError, PlaybackEvent, RodioOutput,
};
use crate::config::Settings;
use crate::error::{PlayerError, Result};
use crate::library::Track;

use super::commands::{Message, PlayerCmd};
use super::state::{PlaybackStatus, Player};

pub struct PlayerController {
    tx: Sender<Message>,
    worker: Option<JoinHandle<()>>,
}

impl PlayerController {
    /// Spawn the player thread with the default `rodio` output device.
    pub fn with_rodio(settings: Settings) -> Result<Self> {
        let playback = settings.playback.clone();
        Self::spawn(settings, move |notifier| {
            RodioOutput::open_default(notifier, &playback)
        })
    }

    /// Spawn the player thread. `make_output` runs on that thread, so the
    /// output it builds never has to be `Send`.
    pub fn spawn<O, F>(settings: Settings, make_output: F) -> Result<Self>
    where
        O: AudioOutput + 'static,
        F: FnOnce(CompletionNotifier) -> std::result::Result<O, OutputError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Message>();
        let (ready_tx, ready_rx) = mpsc::channel::<std::result::Result<(), OutputError>>();
        let completions = tx.clone();

        let worker = thread::Builder::new()
            .name("allegro-player".into())
            .spawn(move || {
                let notifier = CompletionNotifier::new(move |completion| {
                    let _ = completions.send(Message::Completed(completion));
                });
                let output = match make_output(notifier) {
                    Ok(output) => output,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));
                run(Player::new(output, settings), rx);
            })
            .map_err(|e| PlayerError::Output(OutputError::Io(e)))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!("player thread started");
                Ok(Self {
                    tx,
                    worker: Some(worker),
                })
            }
            Ok(Err(e)) => {
                let _ = worker.join();
                Err(PlayerError::Output(e))
            }
            Err(_) => {
                let _ = worker.join();
                Err(PlayerError::Disconnected)
            }
        }
    }

    pub fn load_songs(&self, dir: Option<PathBuf>) -> Result<usize> {
        self.request(|reply| PlayerCmd::LoadSongs { dir, reply })?
    }

    /// Snapshot of the catalog.
    pub fn buffer(&self) -> Result<Vec<Track>> {
        self.request(PlayerCmd::Buffer)
    }

    /// Snapshot of the queue.
    pub fn queue(&self) -> Result<Vec<Track>> {
        self.request(PlayerCmd::Queue)
    }

    pub fn add_tracks_to_queue_by_indices(&self, indices: &[usize]) -> Result<()> {
        let indices = indices.to_vec();
        self.request(|reply| PlayerCmd::AddToQueue { indices, reply })?
    }

    pub fn remove_tracks_from_queue_by_indices(&self, indices: &[usize]) -> Result<()> {
        let indices = indices.to_vec();
        self.request(|reply| PlayerCmd::RemoveFromQueue { indices, reply })?
    }

    pub fn shuffle_queue(&self) -> Result<()> {
        self.request(PlayerCmd::Shuffle)
    }

    pub fn clear_buffer(&self) -> Result<()> {
        self.request(PlayerCmd::ClearBuffer)
    }

    pub fn clear_queue(&self) -> Result<()> {
        self.request(PlayerCmd::ClearQueue)
    }

    pub fn play_track(&self) -> Result<()> {
        self.request(PlayerCmd::Play)?
    }

    pub fn pause_track(&self) -> Result<()> {
        self.request(PlayerCmd::Pause)?
    }

    pub fn stop_track(&self) -> Result<()> {
        self.request(PlayerCmd::Stop)
    }

    pub fn next_track(&self) -> Result<()> {
        self.request(PlayerCmd::Next)?
    }

    pub fn prev_track(&self) -> Result<()> {
        self.request(PlayerCmd::Prev)?
    }

    /// Seek to `input`: seconds, `MM:SS` or `HH:MM:SS`.
    pub fn seek_track(&self, input: &str) -> Result<Duration> {
        let input = input.to_string();
        self.request(|reply| PlayerCmd::SeekText { input, reply })?
    }

    pub fn seek_to(&self, position: Duration) -> Result<Duration> {
        self.request(|reply| PlayerCmd::SeekTo { position, reply })?
    }

    pub fn fast_forward(&self, offset: Duration) -> Result<Duration> {
        self.request(|reply| PlayerCmd::FastForward { offset, reply })?
    }

    pub fn rewind(&self, offset: Duration) -> Result<Duration> {
        self.request(|reply| PlayerCmd::Rewind { offset, reply })?
    }

    pub fn skip_forward(&self) -> Result<Duration> {
        self.request(PlayerCmd::SkipForward)?
    }

    pub fn skip_backward(&self) -> Result<Duration> {
        self.request(PlayerCmd::SkipBackward)?
    }

    pub fn current_track(&self) -> Result<Option<Track>> {
        self.request(PlayerCmd::CurrentTrack)
    }

    pub fn current_index(&self) -> Result<Option<usize>> {
        self.request(PlayerCmd::CurrentIndex)
    }

    pub fn position(&self) -> Result<Option<Duration>> {
        self.request(PlayerCmd::Position)
    }

    pub fn status(&self) -> Result<PlaybackStatus> {
        self.request(PlayerCmd::Status)
    }

    pub fn subscribe(&self) -> Result<Receiver<PlaybackEvent>> {
        self.request(PlayerCmd::Subscribe)
    }

    /// Stop playback and join the player thread.
    pub fn shutdown(mut self) {
        self.stop_worker();
    }

    fn request<T>(&self, make: impl FnOnce(Sender<T>) -> PlayerCmd) -> Result<T> {
        let (reply, answer) = mpsc::channel();
        self.tx
            .send(Message::Command(make(reply)))
            .map_err(|_| PlayerError::Disconnected)?;
        answer.recv().map_err(|_| PlayerError::Disconnected)
    }

    fn stop_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            let _ = self.tx.send(Message::Command(PlayerCmd::Shutdown));
            if worker.join().is_err() {
                error!("player thread panicked");
            }
        }
    }
}

impl Drop for PlayerController {
    fn drop(&mut self) {
        self.stop_worker();
    }
}

fn run<O: AudioOutput>(mut player: Player<O>, rx: Receiver<Message>) {
    // The output keeps a sender alive, so this ends on `Shutdown`.
    while let Ok(message) = rx.recv() {
        match message {
            Message::Completed(completion) => player.handle_completion(completion),
            Message::Command(PlayerCmd::Shutdown) => break,
            Message::Command(cmd) => cmd.apply(&mut player),
        }
    }
    player.stop_track();
    debug!("player thread exiting");
}
