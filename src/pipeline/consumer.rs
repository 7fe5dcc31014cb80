//! Consumer worker for draining the shared buffer into a sink
//!
//! Each consumer owns one sink and one worker thread. The worker polls the
//! buffer with a short timeout so the stop flag is re-checked periodically,
//! transforms each record, appends it to the sink under the consumer's
//! exclusive sink lock, and tracks local counts. On retrieving the
//! end-of-stream marker it re-broadcasts the marker once for sibling
//! consumers and exits. Worker failures are logged and end the worker
//! without propagating.

use crate::buffer::{BoundedBuffer, BufferError};
use crate::core::sync::handle_mutex_poison;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::types::{Item, Transform, POLL_INTERVAL, STOP_TIMEOUT};
use crate::records::LineSink;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Worker that drains the shared buffer into a sink
pub struct Consumer {
    name: String,
    sink_path: PathBuf,
    sink: Arc<dyn LineSink>,
    buffer: Arc<BoundedBuffer<Item>>,
    transform: Transform,
    stop_requested: Arc<AtomicBool>,
    consumed: Arc<AtomicU64>,
    /// Serialises sink appends against external readers of this sink
    sink_lock: Arc<Mutex<()>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Consumer {
    pub(crate) fn new(
        name: String,
        sink: Arc<dyn LineSink>,
        sink_path: PathBuf,
        buffer: Arc<BoundedBuffer<Item>>,
        transform: Transform,
    ) -> Self {
        Self {
            name,
            sink_path,
            sink,
            buffer,
            transform,
            stop_requested: Arc::new(AtomicBool::new(false)),
            consumed: Arc::new(AtomicU64::new(0)),
            sink_lock: Arc::new(Mutex::new(())),
            handle: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sink_path(&self) -> &Path {
        &self.sink_path
    }

    /// Truncate the sink and spawn the worker thread
    ///
    /// Truncation at start means a re-run yields fresh output rather than
    /// appended duplicates. Fails with [`PipelineError::AlreadyRunning`]
    /// while a previous worker is still live.
    pub fn start(&self) -> PipelineResult<()> {
        let mut handle = handle_mutex_poison(self.handle.lock(), |message| {
            PipelineError::Sync { message }
        })?;
        if let Some(existing) = handle.as_ref() {
            if !existing.is_finished() {
                return Err(PipelineError::AlreadyRunning {
                    name: self.name.clone(),
                });
            }
        }

        self.stop_requested.store(false, Ordering::SeqCst);
        self.sink.truncate(&self.sink_path)?;

        let name = self.name.clone();
        let sink = Arc::clone(&self.sink);
        let sink_path = self.sink_path.clone();
        let buffer = Arc::clone(&self.buffer);
        let transform = Arc::clone(&self.transform);
        let stop_requested = Arc::clone(&self.stop_requested);
        let consumed = Arc::clone(&self.consumed);
        let sink_lock = Arc::clone(&self.sink_lock);

        *handle = Some(thread::spawn(move || {
            run_worker(
                &name,
                &*sink,
                &sink_path,
                &buffer,
                &*transform,
                &stop_requested,
                &consumed,
                &sink_lock,
            );
        }));
        Ok(())
    }

    /// Request cooperative stop, then wait bounded for worker exit
    pub fn stop(&self) {
        self.request_stop();
        if !self.join_timeout(STOP_TIMEOUT) {
            log::warn!("[{}] worker did not exit within {:?}", self.name, STOP_TIMEOUT);
        }
    }

    /// Set the stop flag without waiting
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    pub fn stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::SeqCst)
    }

    /// Wait unbounded for the worker thread to exit
    pub fn join(&self) {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }

    /// Whether the worker thread is currently live
    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cumulative records consumed (synchronized read)
    pub fn consumed_count(&self) -> u64 {
        self.consumed.load(Ordering::SeqCst)
    }

    fn join_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            {
                let mut guard = self
                    .handle
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                match guard.as_ref() {
                    None => return true,
                    Some(handle) if handle.is_finished() => {
                        if let Some(handle) = guard.take() {
                            let _ = handle.join();
                        }
                        return true;
                    }
                    Some(_) => {}
                }
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_worker(
    name: &str,
    sink: &dyn LineSink,
    sink_path: &Path,
    buffer: &BoundedBuffer<Item>,
    transform: &(dyn Fn(&str) -> String + Send + Sync),
    stop_requested: &AtomicBool,
    consumed: &AtomicU64,
    sink_lock: &Mutex<()>,
) {
    while !stop_requested.load(Ordering::SeqCst) {
        let item = match buffer.get_timeout(POLL_INTERVAL) {
            Ok(item) => item,
            // Timed out waiting: loop around and re-check the stop flag
            Err(BufferError::Empty) => continue,
            Err(err) => {
                log::error!("[{}] unexpected buffer error: {}", name, err);
                break;
            }
        };

        match item {
            Item::End => {
                buffer.mark_processed();
                // Re-broadcast the marker once so a sibling consumer still
                // waiting can also observe termination; a Full failure is
                // swallowed since the forced-stop fallback covers it
                if let Err(err) = buffer.try_put(Item::End) {
                    log::debug!("[{}] end marker re-broadcast dropped: {}", name, err);
                }
                log::info!("[{}] end of stream", name);
                break;
            }
            Item::Record(line) => {
                let processed = (transform)(&line);
                let write_result = {
                    let _guard = sink_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                    sink.append_line(sink_path, &processed)
                };
                match write_result {
                    Ok(()) => {
                        // Count before marking processed so a drain waiter
                        // woken by the final mark sees the full tally
                        consumed.fetch_add(1, Ordering::SeqCst);
                        buffer.mark_processed();
                        log::debug!("[{}] consumed: {} -> {}", name, line, processed);
                    }
                    Err(err) => {
                        // Worker-boundary failure: log and exit cleanly
                        log::error!("[{}] failed to write record: {}", name, err);
                        buffer.mark_processed();
                        break;
                    }
                }
            }
        }
    }

    log::info!(
        "[{}] finished, consumed {} records",
        name,
        consumed.load(Ordering::SeqCst)
    );
}
