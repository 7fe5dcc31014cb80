//! Record Source and Sink Collaborators
//!
//! The pipeline core moves opaque text records; this module owns the two
//! boundary contracts it depends on: reading a line-oriented record source
//! and appending processed records to a sink. Both are trait seams so tests
//! and embedders can substitute their own storage; the filesystem
//! implementations back the CLI.

mod error;
mod sink;
mod source;

pub use error::{RecordError, RecordResult};
pub use sink::{FsLineSink, LineSink};
pub use source::{FsLineSource, LineSource};
