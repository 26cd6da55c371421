//! CLI library components for the case linkage job.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
