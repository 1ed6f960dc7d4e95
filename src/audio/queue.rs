//! The ordered playback queue and its cursor.
//!
//! The cursor is `None` whenever the queue is empty. It can also be `None`
//! on a non-empty queue after the last track has finished; the next play
//! then starts from the top.

use rand::Rng;
use rand::seq::SliceRandom;
use rand::thread_rng;
use thiserror::Error;
use tracing::debug;

use crate::error::IndexOutOfRange;
use crate::library::Track;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error(transparent)]
    IndexOutOfRange(#[from] IndexOutOfRange),

    #[error("no current track")]
    NoCurrentTrack,

    #[error("no next track")]
    NoNextTrack,

    #[error("no previous track")]
    NoPreviousTrack,
}

#[derive(Debug, Default, Clone)]
pub struct PlaybackQueue {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `track`; the first track added to an empty queue becomes current.
    pub fn add_track(&mut self, track: Track) {
        let was_empty = self.tracks.is_empty();
        self.tracks.push(track);
        if was_empty {
            self.current = Some(0);
        }
    }

    /// Remove every position in `indices` in one step.
    ///
    /// All indices are validated before anything changes. The cursor keeps
    /// pointing at the same track when it survives; when it was removed it
    /// lands on the first surviving track after it, clamped to the end.
    /// Returns whether the current track was among the removed ones.
    pub fn remove_by_indices(&mut self, indices: &[usize]) -> Result<bool, QueueError> {
        IndexOutOfRange::check(indices, self.tracks.len())?;
        if indices.is_empty() {
            return Ok(false);
        }

        let mut doomed = vec![false; self.tracks.len()];
        for &i in indices {
            doomed[i] = true;
        }

        let current_removed = self.current.is_some_and(|c| doomed[c]);
        // Survivors before the old cursor is the new index of the current
        // track, or of the first survivor after it when it was removed.
        let shifted = self
            .current
            .map(|c| doomed[..c].iter().filter(|&&d| !d).count());

        let mut pos = 0;
        self.tracks.retain(|_| {
            let keep = !doomed[pos];
            pos += 1;
            keep
        });

        self.current = match (shifted, self.tracks.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => None,
        };

        debug!(
            removed = indices.len(),
            remaining = self.tracks.len(),
            current = ?self.current,
            current_removed,
            "queue entries removed"
        );
        Ok(current_removed)
    }

    /// Advance the cursor. A queue whose cursor was released starts over at 0.
    pub fn next(&mut self) -> Result<usize, QueueError> {
        if self.tracks.is_empty() {
            return Err(QueueError::NoCurrentTrack);
        }
        let next = match self.current {
            Some(c) if c + 1 < self.tracks.len() => c + 1,
            Some(_) => return Err(QueueError::NoNextTrack),
            None => 0,
        };
        self.current = Some(next);
        Ok(next)
    }

    /// Move the cursor back by one.
    pub fn prev(&mut self) -> Result<usize, QueueError> {
        if self.tracks.is_empty() {
            return Err(QueueError::NoCurrentTrack);
        }
        match self.current {
            Some(c) if c > 0 => {
                self.current = Some(c - 1);
                Ok(c - 1)
            }
            _ => Err(QueueError::NoPreviousTrack),
        }
    }

    pub fn has_next(&self) -> bool {
        match self.current {
            Some(c) => c + 1 < self.tracks.len(),
            None => !self.tracks.is_empty(),
        }
    }

    pub fn has_prev(&self) -> bool {
        self.current.is_some_and(|c| c > 0)
    }

    /// Point the cursor at the first track when it was released.
    /// Returns the current index, or `None` for an empty queue.
    pub fn rewind_if_released(&mut self) -> Option<usize> {
        if self.current.is_none() && !self.tracks.is_empty() {
            self.current = Some(0);
        }
        self.current
    }

    /// Forget the current position without touching the tracks.
    pub fn release_cursor(&mut self) {
        self.current = None;
    }

    /// Shuffle the queue, anchoring the current track at position 0.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut thread_rng());
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match self.current {
            Some(c) => {
                let current = self.tracks.remove(c);
                let rest = permute(std::mem::take(&mut self.tracks), rng);
                self.tracks.reserve(rest.len() + 1);
                self.tracks.push(current);
                self.tracks.extend(rest);
                self.current = Some(0);
            }
            None => {
                self.tracks = permute(std::mem::take(&mut self.tracks), rng);
            }
        }
        debug!(len = self.tracks.len(), "queue shuffled");
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current = None;
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|c| self.tracks.get(c))
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Randomly reorder `items` by position. With two or more items the result
/// never keeps every item in place, even when items compare equal.
fn permute<T, R: Rng + ?Sized>(items: Vec<T>, rng: &mut R) -> Vec<T> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    // Redraw the identity; any other order is equally likely.
    loop {
        order.shuffle(rng);
        if order.len() < 2 || order.iter().enumerate().any(|(i, &o)| i != o) {
            break;
        }
    }

    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}
