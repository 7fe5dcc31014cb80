//! Producer worker for feeding records into the shared buffer
//!
//! Each producer owns one source and one worker thread. The worker reads
//! the full record sequence, pushes every record through the buffer's
//! blocking put (the backpressure point), then emits exactly one
//! best-effort end-of-stream marker. Producer failures are isolated: a
//! missing source is logged and the worker still proceeds to the marker
//! step, never crashing sibling workers or the orchestrator.

use crate::buffer::BoundedBuffer;
use crate::core::sync::handle_mutex_poison;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::types::{Item, POLL_INTERVAL, STOP_TIMEOUT};
use crate::records::LineSource;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Worker that reads a finite record sequence and feeds the shared buffer
pub struct Producer {
    name: String,
    source_path: PathBuf,
    source: Arc<dyn LineSource>,
    buffer: Arc<BoundedBuffer<Item>>,
    stop_requested: Arc<AtomicBool>,
    produced: Arc<AtomicU64>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Producer {
    pub(crate) fn new(
        name: String,
        source: Arc<dyn LineSource>,
        source_path: PathBuf,
        buffer: Arc<BoundedBuffer<Item>>,
    ) -> Self {
        Self {
            name,
            source_path,
            source,
            buffer,
            stop_requested: Arc::new(AtomicBool::new(false)),
            produced: Arc::new(AtomicU64::new(0)),
            handle: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Spawn the worker thread
    ///
    /// Fails with [`PipelineError::AlreadyRunning`] while a previous worker
    /// is still live.
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

        let name = self.name.clone();
        let source = Arc::clone(&self.source);
        let source_path = self.source_path.clone();
        let buffer = Arc::clone(&self.buffer);
        let stop_requested = Arc::clone(&self.stop_requested);
        let produced = Arc::clone(&self.produced);

        *handle = Some(thread::spawn(move || {
            run_worker(&name, &*source, &source_path, &buffer, &stop_requested, &produced);
        }));
        Ok(())
    }

    /// Request cooperative abandonment, then wait bounded for worker exit
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

    /// Cumulative records produced (synchronized read)
    pub fn produced_count(&self) -> u64 {
        self.produced.load(Ordering::SeqCst)
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

fn run_worker(
    name: &str,
    source: &dyn LineSource,
    source_path: &Path,
    buffer: &BoundedBuffer<Item>,
    stop_requested: &AtomicBool,
    produced: &AtomicU64,
) {
    let lines = match source.read_lines(source_path) {
        Ok(lines) => lines,
        Err(err) => {
            // Isolated failure: log it and fall through to the end marker
            log::error!("[{}] {}", name, err);
            Vec::new()
        }
    };

    log::info!("[{}] producing {} records", name, lines.len());

    'records: for line in lines {
        if stop_requested.load(Ordering::SeqCst) {
            log::info!("[{}] stop requested, abandoning remaining records", name);
            break;
        }

        // Blocking put with periodic stop checks so a requested stop is
        // observed within one poll interval even under full-buffer
        // backpressure
        loop {
            match buffer.put_timeout(Item::Record(line.clone()), POLL_INTERVAL) {
                Ok(()) => break,
                Err(_) => {
                    if stop_requested.load(Ordering::SeqCst) {
                        log::info!("[{}] stop requested while buffer full", name);
                        break 'records;
                    }
                }
            }
        }

        produced.fetch_add(1, Ordering::SeqCst);
        log::debug!("[{}] produced: {}", name, line);
    }

    // Exactly one best-effort end marker; a full buffer drops it and the
    // orchestrator's forced-stop fallback covers termination
    if let Err(err) = buffer.try_put(Item::End) {
        log::debug!("[{}] end marker dropped: {}", name, err);
    }
    log::info!(
        "[{}] finished, produced {} records",
        name,
        produced.load(Ordering::SeqCst)
    );
}
