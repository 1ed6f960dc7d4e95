use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use crate::audio::{AudioOutput, Completion, PlaybackEvent};
use crate::error::Result;
use crate::library::Track;

use super::state::{PlaybackStatus, Player};

type Reply<T> = Sender<Result<T>>;

/// Everything the player thread receives.
#[derive(Debug)]
pub(super) enum Message {
    Command(PlayerCmd),
    Completed(Completion),
}

#[derive(Debug)]
pub(super) enum PlayerCmd {
    LoadSongs { dir: Option<PathBuf>, reply: Reply<usize> },
    Buffer(Sender<Vec<Track>>),
    Queue(Sender<Vec<Track>>),
    AddToQueue { indices: Vec<usize>, reply: Reply<()> },
    RemoveFromQueue { indices: Vec<usize>, reply: Reply<()> },
    Shuffle(Sender<()>),
    ClearBuffer(Sender<()>),
    ClearQueue(Sender<()>),
    Play(Reply<()>),
    Pause(Reply<()>),
    Stop(Sender<()>),
    Next(Reply<()>),
    Prev(Reply<()>),
    SeekText { input: String, reply: Reply<Duration> },
    SeekTo { position: Duration, reply: Reply<Duration> },
    FastForward { offset: Duration, reply: Reply<Duration> },
    Rewind { offset: Duration, reply: Reply<Duration> },
    SkipForward(Reply<Duration>),
    SkipBackward(Reply<Duration>),
    CurrentTrack(Sender<Option<Track>>),
    CurrentIndex(Sender<Option<usize>>),
    Position(Sender<Option<Duration>>),
    Status(Sender<PlaybackStatus>),
    Subscribe(Sender<Receiver<PlaybackEvent>>),
    Shutdown,
}

impl PlayerCmd {
    /// Run the command against `player` and answer its caller. A caller
    /// that stopped waiting is not an error.
    pub(super) fn apply<O: AudioOutput>(self, player: &mut Player<O>) {
        match self {
            PlayerCmd::LoadSongs { dir, reply } => {
                let _ = reply.send(player.load_songs(dir.as_deref()));
            }
            PlayerCmd::Buffer(reply) => {
                let _ = reply.send(player.buffer().to_vec());
            }
            PlayerCmd::Queue(reply) => {
                let _ = reply.send(player.queue().to_vec());
            }
            PlayerCmd::AddToQueue { indices, reply } => {
                let _ = reply.send(player.add_tracks_to_queue_by_indices(&indices));
            }
            PlayerCmd::RemoveFromQueue { indices, reply } => {
                let _ = reply.send(player.remove_tracks_from_queue_by_indices(&indices));
            }
            PlayerCmd::Shuffle(reply) => {
                player.shuffle_queue();
                let _ = reply.send(());
            }
            PlayerCmd::ClearBuffer(reply) => {
                player.clear_buffer();
                let _ = reply.send(());
            }
            PlayerCmd::ClearQueue(reply) => {
                player.clear_queue();
                let _ = reply.send(());
            }
            PlayerCmd::Play(reply) => {
                let _ = reply.send(player.play_track());
            }
            PlayerCmd::Pause(reply) => {
                let _ = reply.send(player.pause_track());
            }
            PlayerCmd::Stop(reply) => {
                player.stop_track();
                let _ = reply.send(());
            }
            PlayerCmd::Next(reply) => {
                let _ = reply.send(player.next_track());
            }
            PlayerCmd::Prev(reply) => {
                let _ = reply.send(player.prev_track());
            }
            PlayerCmd::SeekText { input, reply } => {
                let _ = reply.send(player.seek_track(&input));
            }
            PlayerCmd::SeekTo { position, reply } => {
                let _ = reply.send(player.seek_to(position));
            }
            PlayerCmd::FastForward { offset, reply } => {
                let _ = reply.send(player.fast_forward(offset));
            }
            PlayerCmd::Rewind { offset, reply } => {
                let _ = reply.send(player.rewind(offset));
            }
            PlayerCmd::SkipForward(reply) => {
                let _ = reply.send(player.skip_forward());
            }
            PlayerCmd::SkipBackward(reply) => {
                let _ = reply.send(player.skip_backward());
            }
            PlayerCmd::CurrentTrack(reply) => {
                let _ = reply.send(player.current_track().cloned());
            }
            PlayerCmd::CurrentIndex(reply) => {
                let _ = reply.send(player.current_index());
            }
            PlayerCmd::Position(reply) => {
                let _ = reply.send(player.position());
            }
            PlayerCmd::Status(reply) => {
                let _ = reply.send(player.status());
            }
            PlayerCmd::Subscribe(reply) => {
                let _ = reply.send(player.subscribe());
            }
            // Handled by the thread loop.
            PlayerCmd::Shutdown => {}
        }
    }
}
