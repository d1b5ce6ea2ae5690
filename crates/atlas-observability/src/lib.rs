//! # atlas-observability
//!
//! Tracing subscriber setup and named structured events emitted by the pipeline stages.

pub mod tracing_setup;

pub use tracing_setup::events;
pub use tracing_setup::{build_filter, init_tracing, init_tracing_with_filter};
