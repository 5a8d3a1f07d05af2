//! Utility functions shared by the binary.
//!
//! - [`app_data`] - application data directory and JSON configuration
//! - [`logging`] - `tracing` subscriber setup

pub mod app_data;
pub mod logging;

pub use app_data::*;
