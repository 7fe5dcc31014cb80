//! Concurrent Line Pipeline
//!
//! Moves discrete text records from sources to sinks through one shared
//! [`crate::buffer::BoundedBuffer`], using a thread per worker on both the
//! producing and consuming sides.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐          ┌─────────────────────┐          ┌────────────┐
//! │ Producer 1 │──┐       │    Orchestrator     │       ┌─►│ Consumer 1 │──► sink 1
//! └────────────┘  │  put  │  ┌───────────────┐  │  get  │  └────────────┘
//! ┌────────────┐  ├──────►│  │ BoundedBuffer │  │───────┤  ┌────────────┐
//! │ Producer N │──┘       │  └───────────────┘  │       └─►│ Consumer M │──► sink M
//! └────────────┘          └─────────────────────┘          └────────────┘
//! ```
//!
//! Each producer pushes its records in source order followed by exactly one
//! end-of-stream marker. Consumers poll with a short timeout (so stop
//! requests are observed), transform each record, and append it to their
//! own sink. Termination is two-layered: the cooperative end marker, and
//! the orchestrator's grace-bounded drain followed by a forced stop.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use linepipe::pipeline::Orchestrator;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Orchestrator::new(10)?;
//! pipeline.add_producer("input.txt", None)?;
//! pipeline.add_consumer("output.txt", None)?;
//! pipeline.run()?;
//!
//! let stats = pipeline.stats();
//! println!("moved {} records", stats.total_consumed);
//! # Ok(())
//! # }
//! ```

mod consumer;
mod error;
mod orchestrator;
mod producer;
mod types;

pub use consumer::Consumer;
pub use error::{PipelineError, PipelineResult};
pub use orchestrator::Orchestrator;
pub use producer::Producer;
pub use types::{Item, PipelineStats, Transform};

#[cfg(test)]
mod tests;
