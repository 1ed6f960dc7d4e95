//! Audio layer: the playback queue, the output seam and the engine that
//! drives one live handle at a time.

mod engine;
mod events;
mod output;
mod queue;
mod sink;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use engine::{EngineError, PlaybackEngine};
pub use events::PlaybackEvent;
pub use output::{AudioOutput, OutputError};
pub use queue::{PlaybackQueue, QueueError};
pub use sink::RodioOutput;
pub use types::{Completion, CompletionNotifier, HandleId, Outcome, PlaybackState};
