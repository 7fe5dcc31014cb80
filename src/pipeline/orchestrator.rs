//! Orchestrator - lifecycle driver for the pipeline
//!
//! The orchestrator owns the shared buffer and the worker collections and
//! drives a run to a clean, fully-drained stop:
//!
//! 1. start every consumer (readers first, so records never pile up for
//!    want of a reader)
//! 2. start every producer
//! 3. join every producer
//! 4. drain wait: block on the buffer's completion counter, bounded by the
//!    grace period
//! 5. forced-stop fallback: unconditionally signal every consumer to stop,
//!    guaranteeing termination even if end-marker delivery failed
//! 6. join every consumer
//!
//! # Thread Safety
//!
//! The orchestrator is fully thread-safe and can be shared across threads
//! using `Arc<Orchestrator>`. Worker registration is only valid before
//! `run()`; the collections are immutable once a run has started.

use crate::buffer::BoundedBuffer;
use crate::core::sync::handle_mutex_poison;
use crate::pipeline::consumer::Consumer;
use crate::pipeline::error::{PipelineError, PipelineResult};
use crate::pipeline::producer::Producer;
use crate::pipeline::types::{Item, PipelineStats, Transform};
use crate::records::{FsLineSink, FsLineSource, LineSink, LineSource};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Default grace period between producer completion and forced consumer stop
const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(500);

/// Granularity of the drain wait within the grace period
const DRAIN_SLICE: Duration = Duration::from_millis(25);

/// Central coordinator wiring N producers and M consumers to one buffer
pub struct Orchestrator {
    buffer: Arc<BoundedBuffer<Item>>,
    producers: Mutex<Vec<Arc<Producer>>>,
    consumers: Mutex<Vec<Arc<Consumer>>>,
    source: Arc<dyn LineSource>,
    sink: Arc<dyn LineSink>,
    grace_period: Duration,
    started: AtomicBool,
}

impl Orchestrator {
    /// Create an orchestrator around a fresh buffer of the given capacity
    ///
    /// Fails with [`crate::buffer::BufferError::InvalidCapacity`] for a
    /// zero capacity.
    pub fn new(capacity: usize) -> PipelineResult<Self> {
        Self::with_collaborators(capacity, Arc::new(FsLineSource), Arc::new(FsLineSink))
    }

    /// Create an orchestrator with custom source/sink collaborators
    pub fn with_collaborators(
        capacity: usize,
        source: Arc<dyn LineSource>,
        sink: Arc<dyn LineSink>,
    ) -> PipelineResult<Self> {
        Ok(Self {
            buffer: Arc::new(BoundedBuffer::new(capacity)?),
            producers: Mutex::new(Vec::new()),
            consumers: Mutex::new(Vec::new()),
            source,
            sink,
            grace_period: DEFAULT_GRACE_PERIOD,
            started: AtomicBool::new(false),
        })
    }

    /// Override the drain deadline between producer completion and forced stop
    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = grace_period;
        self
    }

    /// Register a producer reading from `source_path`
    ///
    /// Unnamed producers are auto-named by ordinal (`producer-1`, ...).
    /// Fails with [`PipelineError::RegistrationClosed`] once `run()` has
    /// begun.
    pub fn add_producer(
        &self,
        source_path: impl Into<PathBuf>,
        name: Option<String>,
    ) -> PipelineResult<Arc<Producer>> {
        if self.started.load(Ordering::SeqCst) {
            return Err(PipelineError::RegistrationClosed);
        }

        let mut producers = handle_mutex_poison(self.producers.lock(), |message| {
            PipelineError::Sync { message }
        })?;
        let name = name.unwrap_or_else(|| format!("producer-{}", producers.len() + 1));
        let producer = Arc::new(Producer::new(
            name,
            Arc::clone(&self.source),
            source_path.into(),
            Arc::clone(&self.buffer),
        ));
        producers.push(Arc::clone(&producer));
        Ok(producer)
    }

    /// Register a consumer writing to `sink_path` with the default
    /// uppercase transform
    pub fn add_consumer(
        &self,
        sink_path: impl Into<PathBuf>,
        name: Option<String>,
    ) -> PipelineResult<Arc<Consumer>> {
        self.add_consumer_with_transform(sink_path, name, |line| line.to_uppercase())
    }

    /// Register a consumer with a custom record transform
    pub fn add_consumer_with_transform(
        &self,
        sink_path: impl Into<PathBuf>,
        name: Option<String>,
        transform: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> PipelineResult<Arc<Consumer>> {
        if self.started.load(Ordering::SeqCst) {
            return Err(PipelineError::RegistrationClosed);
        }

        let mut consumers = handle_mutex_poison(self.consumers.lock(), |message| {
            PipelineError::Sync { message }
        })?;
        let name = name.unwrap_or_else(|| format!("consumer-{}", consumers.len() + 1));
        let transform: Transform = Arc::new(transform);
        let consumer = Arc::new(Consumer::new(
            name,
            Arc::clone(&self.sink),
            sink_path.into(),
            Arc::clone(&self.buffer),
            transform,
        ));
        consumers.push(Arc::clone(&consumer));
        Ok(consumer)
    }

    /// Drive all workers to completion
    ///
    /// Consumers start before producers; producers are joined, the buffer
    /// is drained (completion-counter wait bounded by the grace period),
    /// then every consumer is unconditionally stopped and joined. A second
    /// `run()` on the same orchestrator fails with
    /// [`PipelineError::AlreadyRunning`]; workers are not reused across
    /// runs.
    pub fn run(&self) -> PipelineResult<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(PipelineError::AlreadyRunning {
                name: "pipeline".to_string(),
            });
        }

        let producers = self.producer_handles()?;
        let consumers = self.consumer_handles()?;
        log::info!(
            "pipeline starting: {} producers, {} consumers, buffer capacity {}",
            producers.len(),
            consumers.len(),
            self.buffer.capacity()
        );

        for consumer in &consumers {
            consumer.start()?;
        }
        for producer in &producers {
            producer.start()?;
        }

        for producer in &producers {
            producer.join();
        }
        log::info!("all producers finished, draining buffer");

        // Drain wait: pending hitting zero proves every enqueued record was
        // processed (producers are already joined); the grace period is a
        // hard deadline preserving bounded run time. A re-broadcast end
        // marker with no reader left keeps pending above zero, so the wait
        // also ends once every consumer has wound down on its own.
        let deadline = Instant::now() + self.grace_period;
        loop {
            if self.buffer.await_all_processed(Some(DRAIN_SLICE)) {
                log::info!("buffer fully drained");
                break;
            }
            if consumers.iter().all(|consumer| !consumer.is_running()) {
                log::debug!(
                    "all consumers exited with {} residual markers pending",
                    self.buffer.pending()
                );
                break;
            }
            if Instant::now() >= deadline {
                log::warn!(
                    "drain deadline ({:?}) reached with {} items pending, forcing stop",
                    self.grace_period,
                    self.buffer.pending()
                );
                break;
            }
        }

        // Forced-stop fallback: termination must not depend on end-marker
        // delivery
        for consumer in &consumers {
            consumer.request_stop();
        }
        for consumer in &consumers {
            consumer.join();
        }

        log::info!("pipeline complete: {:?}", self.stats());
        Ok(())
    }

    /// Aggregate statistics snapshot
    ///
    /// Sums per-worker synchronized reads; safe to call mid-run for a live
    /// snapshot or after `run()` for the final tally.
    pub fn stats(&self) -> PipelineStats {
        let producers = self
            .producers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let consumers = self
            .consumers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        PipelineStats {
            total_produced: producers.iter().map(|p| p.produced_count()).sum(),
            total_consumed: consumers.iter().map(|c| c.consumed_count()).sum(),
            queue_size: self.buffer.size(),
            producers: producers.len(),
            consumers: consumers.len(),
        }
    }

    /// Shared buffer handle (introspection)
    pub fn buffer(&self) -> &BoundedBuffer<Item> {
        &self.buffer
    }

    fn producer_handles(&self) -> PipelineResult<Vec<Arc<Producer>>> {
        let producers = handle_mutex_poison(self.producers.lock(), |message| {
            PipelineError::Sync { message }
        })?;
        Ok(producers.clone())
    }

    fn consumer_handles(&self) -> PipelineResult<Vec<Arc<Consumer>>> {
        let consumers = handle_mutex_poison(self.consumers.lock(), |message| {
            PipelineError::Sync { message }
        })?;
        Ok(consumers.clone())
    }
}
