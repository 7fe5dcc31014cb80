//! Core services and infrastructure

pub mod logging;
pub mod sync;
pub mod version;
