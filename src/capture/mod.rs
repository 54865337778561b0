//! Sensor capture pipeline
//!
//! This module provides functionality for:
//! - Filtering raw serial lines down to valid sensor readings
//! - Appending accepted readings to a CSV file
//! - The blocking read loop that ties the two together

pub mod filter;
pub mod monitor;
pub mod writer;

pub use monitor::{run_capture, CaptureMonitor};
pub use writer::CsvLogger;
