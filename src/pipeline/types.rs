//! Type definitions for the pipeline system
//!
//! This module contains the item type flowing through the shared buffer,
//! the aggregate statistics snapshot, and the timing constants governing
//! cooperative shutdown.

use std::sync::Arc;
use std::time::Duration;

/// A unit of work flowing through the shared buffer
///
/// `End` is the end-of-stream sentinel: disjoint from every valid record by
/// construction, emitted exactly once per producer after all of that
/// producer's records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// One opaque line of text
    Record(String),
    /// End-of-stream marker
    End,
}

/// Record transform applied by a consumer before writing to its sink
///
/// A replaceable policy, not a hard contract; the default uppercases the
/// record text.
pub type Transform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Aggregate production/consumption statistics
///
/// Computed by summing per-worker synchronized reads; valid as a live
/// snapshot mid-run or as the final tally after `run()` completes.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PipelineStats {
    /// Sum of records produced across all producers
    pub total_produced: u64,
    /// Sum of records consumed across all consumers
    pub total_consumed: u64,
    /// Buffer occupancy at snapshot time
    pub queue_size: usize,
    /// Number of registered producers
    pub producers: usize,
    /// Number of registered consumers
    pub consumers: usize,
}

/// Interval at which blocked workers re-check their stop flag
///
/// A cooperative stop is observed no later than one such interval after it
/// is requested.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Bound on how long `stop()` waits for a worker thread to exit
pub(crate) const STOP_TIMEOUT: Duration = Duration::from_secs(5);
