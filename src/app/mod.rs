//! Application layer: CLI parsing and startup wiring

pub mod cli;
pub mod startup;
