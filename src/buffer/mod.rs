//! Bounded Buffer Component
//!
//! A fixed-capacity, thread-safe FIFO channel with blocking, timed and
//! non-blocking put/get operations. The buffer is the single shared resource
//! between producer and consumer workers and enforces backpressure: a `put`
//! against a full buffer suspends the caller until a `get` frees a slot.
//!
//! # Overview
//!
//! Key properties:
//!
//! - **Bounded**: capacity is fixed at construction; the buffer never holds
//!   more than `capacity` items
//! - **FIFO**: items are removed in insertion order
//! - **Multi-producer / multi-consumer**: all operations are safe from any
//!   number of concurrent threads; no item is lost, duplicated, or observed
//!   by two `get` callers
//! - **Completion tracking**: every successful `put` increments a pending
//!   counter; [`BoundedBuffer::mark_processed`] decrements it and
//!   [`BoundedBuffer::await_all_processed`] blocks until it reaches zero
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   put    ┌─────────────────────┐   get    ┌────────────┐
//! │ Producer A │ ───────► │    BoundedBuffer    │ ───────► │ Consumer A │
//! └────────────┘          │  ┌───┬───┬───┬───┐  │          └────────────┘
//! ┌────────────┐          │  │ 1 │ 2 │ 3 │ 4 │  │          ┌────────────┐
//! │ Producer B │ ───────► │  └───┴───┴───┴───┘  │ ───────► │ Consumer B │
//! └────────────┘  blocks  │   (capacity = 4)    │  blocks  └────────────┘
//!                 if full └─────────────────────┘  if empty
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use linepipe::buffer::BoundedBuffer;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let buffer: BoundedBuffer<String> = BoundedBuffer::new(4)?;
//!
//! buffer.put("hello".to_string());
//! assert_eq!(buffer.size(), 1);
//!
//! let item = buffer.get_timeout(Duration::from_millis(10))?;
//! assert_eq!(item, "hello");
//! # Ok(())
//! # }
//! ```

mod error;
mod internal;

pub use error::{BufferError, BufferResult};
pub use internal::BoundedBuffer;
