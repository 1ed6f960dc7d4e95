//! `rodio` backend for `AudioOutput`.
//!
//! Each handle is one `Sink` on the shared output stream. A small watcher
//! thread per handle polls the sink and reports when it drains on its own.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::{debug, trace, warn};

use crate::config::PlaybackSettings;

use super::output::{AudioOutput, OutputError};
use super::types::{Completion, CompletionNotifier, HandleId, Outcome};

struct OpenSink {
    sink: Arc<Sink>,
    total: Option<Duration>,
    /// Set once the handle is closed or has reported; the watcher stops then.
    done: Arc<AtomicBool>,
}

pub struct RodioOutput {
    stream: OutputStream,
    sinks: HashMap<HandleId, OpenSink>,
    next_id: u64,
    notifier: CompletionNotifier,
    poll_interval: Duration,
}

impl RodioOutput {
    /// Open the default output device.
    ///
    /// `OutputStream` must stay on the thread that created it, so this is
    /// called from the player thread.
    pub fn open_default(
        notifier: CompletionNotifier,
        settings: &PlaybackSettings,
    ) -> Result<Self, OutputError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| OutputError::Device(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sinks: HashMap::new(),
            next_id: 0,
            notifier,
            poll_interval: Duration::from_millis(settings.poll_interval_ms.max(1)),
        })
    }

    fn sink(&self, handle: HandleId) -> Result<&OpenSink, OutputError> {
        self.sinks
            .get(&handle)
            .ok_or(OutputError::UnknownHandle(handle))
    }

    fn watch(&self, handle: HandleId, sink: Arc<Sink>, done: Arc<AtomicBool>) {
        let notifier = self.notifier.clone();
        let interval = self.poll_interval;
        let spawned = thread::Builder::new()
            .name(format!("allegro-watch-{}", handle.0))
            .spawn(move || {
                loop {
                    thread::sleep(interval);
                    if done.load(Ordering::Acquire) {
                        return;
                    }
                    if sink.empty() {
                        // Whoever flips the flag first owns the handle's end.
                        if !done.swap(true, Ordering::AcqRel) {
                            trace!(handle = %handle, "sink drained");
                            notifier.notify(Completion {
                                handle,
                                outcome: Outcome::EndOfStream,
                            });
                        }
                        return;
                    }
                }
            });
        if let Err(e) = spawned {
            warn!(handle = %handle, error = %e, "cannot start sink watcher");
        }
    }
}

impl AudioOutput for RodioOutput {
    fn open(&mut self, path: &Path) -> Result<HandleId, OutputError> {
        let file = File::open(path)?;
        let source =
            Decoder::new(BufReader::new(file)).map_err(|e| OutputError::Decode(e.to_string()))?;
        let total = source.total_duration();

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();

        let handle = HandleId(self.next_id);
        self.next_id += 1;

        let sink = Arc::new(sink);
        let done = Arc::new(AtomicBool::new(false));
        self.watch(handle, Arc::clone(&sink), Arc::clone(&done));
        self.sinks.insert(handle, OpenSink { sink, total, done });

        debug!(handle = %handle, path = %path.display(), "opened sink");
        Ok(handle)
    }

    fn play(&mut self, handle: HandleId) -> Result<(), OutputError> {
        self.sink(handle)?.sink.play();
        Ok(())
    }

    fn pause(&mut self, handle: HandleId) -> Result<(), OutputError> {
        self.sink(handle)?.sink.pause();
        Ok(())
    }

    fn seek(&mut self, handle: HandleId, position: Duration) -> Result<(), OutputError> {
        self.sink(handle)?
            .sink
            .try_seek(position)
            .map_err(|e| OutputError::Seek(e.to_string()))
    }

    fn position(&self, handle: HandleId) -> Option<Duration> {
        self.sinks.get(&handle).map(|s| s.sink.get_pos())
    }

    fn duration(&self, handle: HandleId) -> Option<Duration> {
        self.sinks.get(&handle).and_then(|s| s.total)
    }

    fn close(&mut self, handle: HandleId) {
        if let Some(open) = self.sinks.remove(&handle) {
            open.done.store(true, Ordering::Release);
            open.sink.stop();
            debug!(handle = %handle, "closed sink");
        }
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        for (_, open) in self.sinks.drain() {
            open.done.store(true, Ordering::Release);
            open.sink.stop();
        }
    }
}
