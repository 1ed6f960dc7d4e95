//! Player layer: the synchronous `Player` core and the threaded
//! `PlayerController` facade in front of it.

mod commands;
mod controller;
mod seek;
mod state;

pub use controller::PlayerController;
pub use seek::parse_position;
pub use state::{PlaybackStatus, Player};

pub use crate::audio::PlaybackEvent;
