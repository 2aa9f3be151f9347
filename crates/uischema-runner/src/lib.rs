//! Folder-level orchestration: configuration, loading data points from disk,
//! validating them and writing tiered batch reports.

pub mod config;
pub mod datapoint;
pub mod report;
pub mod runner;

pub use config::*;
pub use datapoint::*;
pub use report::*;
pub use runner::*;
