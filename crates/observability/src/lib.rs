//! `orgdir-observability` — logging initialization for embedding processes.

pub mod tracing;

pub use tracing::init;
