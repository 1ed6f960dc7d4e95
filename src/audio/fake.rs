//! Scriptable in-memory `AudioOutput` for tests.
//!
//! Clones share state, so a test keeps one clone as a probe while the engine
//! owns the other.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use super::output::{AudioOutput, OutputError};
use super::types::{Completion, CompletionNotifier, HandleId, Outcome};

#[derive(Debug, Default)]
struct FakeHandle {
    path: PathBuf,
    playing: bool,
    position: Duration,
}

#[derive(Debug, Default)]
struct FakeState {
    next_id: u64,
    open: HashMap<HandleId, FakeHandle>,
    opened: Vec<(HandleId, PathBuf)>,
    closed: Vec<HandleId>,
    failing: HashSet<PathBuf>,
    decoder_duration: Option<Duration>,
    notifier: Option<CompletionNotifier>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeOutput {
    state: Arc<Mutex<FakeState>>,
}

impl FakeOutput {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Route `finish`/`fail` through `notifier`, like a real backend would.
    pub(crate) fn attach(&self, notifier: CompletionNotifier) {
        self.lock().notifier = Some(notifier);
    }

    /// Make every later `open` of `path` fail with a decode error.
    pub(crate) fn fail_on(&self, path: impl Into<PathBuf>) {
        self.lock().failing.insert(path.into());
    }

    pub(crate) fn set_decoder_duration(&self, duration: Option<Duration>) {
        self.lock().decoder_duration = duration;
    }

    pub(crate) fn set_position(&self, handle: HandleId, position: Duration) {
        if let Some(h) = self.lock().open.get_mut(&handle) {
            h.position = position;
        }
    }

    pub(crate) fn opened_paths(&self) -> Vec<PathBuf> {
        self.lock().opened.iter().map(|(_, p)| p.clone()).collect()
    }

    pub(crate) fn opened_handles(&self) -> Vec<HandleId> {
        self.lock().opened.iter().map(|(h, _)| *h).collect()
    }

    pub(crate) fn closed(&self) -> Vec<HandleId> {
        self.lock().closed.clone()
    }

    /// Handles opened and not yet closed.
    pub(crate) fn open_handles(&self) -> Vec<HandleId> {
        let mut open: Vec<HandleId> = self.lock().open.keys().copied().collect();
        open.sort_by_key(|h| h.0);
        open
    }

    pub(crate) fn is_playing(&self, handle: HandleId) -> bool {
        self.lock().open.get(&handle).is_some_and(|h| h.playing)
    }

    pub(crate) fn path_of(&self, handle: HandleId) -> Option<PathBuf> {
        self.lock().open.get(&handle).map(|h| h.path.clone())
    }

    /// Report a clean end for `handle`, even one that was already closed.
    pub(crate) fn finish(&self, handle: HandleId) {
        self.report(handle, Outcome::EndOfStream);
    }

    pub(crate) fn fail(&self, handle: HandleId, message: &str) {
        self.report(handle, Outcome::Failed(message.to_string()));
    }

    fn report(&self, handle: HandleId, outcome: Outcome) {
        let notifier = self.lock().notifier.clone();
        if let Some(notifier) = notifier {
            notifier.notify(Completion { handle, outcome });
        }
    }
}

impl AudioOutput for FakeOutput {
    fn open(&mut self, path: &Path) -> Result<HandleId, OutputError> {
        let mut state = self.lock();
        if state.failing.contains(path) {
            return Err(OutputError::Decode(format!("unsupported: {}", path.display())));
        }
        let handle = HandleId(state.next_id);
        state.next_id += 1;
        state.opened.push((handle, path.to_path_buf()));
        state.open.insert(
            handle,
            FakeHandle {
                path: path.to_path_buf(),
                ..FakeHandle::default()
            },
        );
        Ok(handle)
    }

    fn play(&mut self, handle: HandleId) -> Result<(), OutputError> {
        let mut state = self.lock();
        let h = state
            .open
            .get_mut(&handle)
            .ok_or(OutputError::UnknownHandle(handle))?;
        h.playing = true;
        Ok(())
    }

    fn pause(&mut self, handle: HandleId) -> Result<(), OutputError> {
        let mut state = self.lock();
        let h = state
            .open
            .get_mut(&handle)
            .ok_or(OutputError::UnknownHandle(handle))?;
        h.playing = false;
        Ok(())
    }

    fn seek(&mut self, handle: HandleId, position: Duration) -> Result<(), OutputError> {
        let mut state = self.lock();
        let h = state
            .open
            .get_mut(&handle)
            .ok_or(OutputError::UnknownHandle(handle))?;
        h.position = position;
        Ok(())
    }

    fn position(&self, handle: HandleId) -> Option<Duration> {
        self.lock().open.get(&handle).map(|h| h.position)
    }

    fn duration(&self, handle: HandleId) -> Option<Duration> {
        let state = self.lock();
        state.open.get(&handle).and(state.decoder_duration)
    }

    fn close(&mut self, handle: HandleId) {
        let mut state = self.lock();
        if state.open.remove(&handle).is_some() {
            state.closed.push(handle);
        }
    }
}
