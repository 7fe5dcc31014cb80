//! Pipeline test suite
//!
//! Tests are organized by functionality:
//! - `lifecycle` - worker start/stop/join state machine and registration rules
//! - `concurrent` - multi-producer/multi-consumer runs and backpressure
//! - `integration` - end-to-end runs against real temp files

mod integration;
