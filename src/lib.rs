//! Music playback engine: a deduplicated track catalog, a playback queue
//! with a cursor, and a single-threaded player driving an audio output.

pub mod audio;
pub mod config;
pub mod error;
pub mod library;
pub mod player;
pub mod runtime;

pub use error::{PlayerError, Result};
