//! The `allegro` binary: play a directory from top to bottom.

use std::env;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{PlayerError, Result};
use crate::player::{PlaybackEvent, PlayerController};

mod logging;
mod settings;

pub fn run() -> Result<()> {
    let (settings, problem) = settings::load_settings();
    logging::init(&settings.logging);
    if let Some(problem) = problem {
        warn!("{problem}");
    }

    let args: Vec<String> = env::args().skip(1).collect();
    let shuffle = args.iter().any(|a| a == "--shuffle");
    let dir = args.iter().find(|a| !a.starts_with("--")).map(PathBuf::from);

    let controller = PlayerController::with_rodio(settings)?;
    let added = controller.load_songs(dir)?;
    info!(added, "library loaded");

    let all: Vec<usize> = (0..controller.buffer()?.len()).collect();
    controller.add_tracks_to_queue_by_indices(&all)?;
    if shuffle {
        controller.shuffle_queue()?;
    }

    let events = controller.subscribe()?;
    match controller.play_track() {
        Ok(()) => {}
        Err(e @ PlayerError::TrackOpenFailed { .. }) => {
            eprintln!("allegro: {e}");
            if !skip_unplayable(&controller) {
                controller.shutdown();
                return Ok(());
            }
        }
        Err(e) => return Err(e),
    }

    for event in events.iter() {
        match event {
            PlaybackEvent::TrackChanged { index, track } => {
                println!("[{}/{}] {track}", index + 1, all.len());
            }
            PlaybackEvent::PlaybackFinished => break,
            PlaybackEvent::TrackOpenFailed { message, .. } => {
                eprintln!("allegro: {message}");
                if !skip_unplayable(&controller) {
                    break;
                }
            }
            PlaybackEvent::PlaybackError { message } => {
                eprintln!("allegro: {message}");
                break;
            }
            PlaybackEvent::StateChanged(_) | PlaybackEvent::QueueChanged { .. } => {}
        }
    }

    controller.shutdown();
    Ok(())
}

/// Advance past tracks that fail to open. Returns whether something is
/// playing afterwards.
fn skip_unplayable(controller: &PlayerController) -> bool {
    loop {
        match controller.next_track() {
            Ok(()) => return true,
            Err(e @ PlayerError::TrackOpenFailed { .. }) => eprintln!("allegro: {e}"),
            Err(_) => return false,
        }
    }
}
