//! Serial port communication module
//!
//! This module provides functionality for:
//! - Listing available serial ports (USB-to-serial adapters)
//! - Reading newline-delimited sensor output with a bounded timeout

pub mod port;

pub use port::{PortConfig, SerialConnection};
