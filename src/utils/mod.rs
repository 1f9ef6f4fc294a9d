//! Utility functions and types

pub mod data_loader;
mod metrics;

pub use data_loader::DataLoader;
pub use metrics::Timer;
