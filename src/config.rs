//! Session configuration resolution
//!
//! Combines command-line flags with interactive prompts into an immutable
//! [`SessionConfig`]. Resolution is decoupled from terminal I/O: prompts
//! read from and write to injected handles, so the whole step is testable
//! without a terminal.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

use crate::serial::port::PortInfo;

/// Default baud rate when the prompt is answered with an empty line
pub const DEFAULT_BAUD: u32 = 115_200;

/// Errors from configuration resolution; all are fatal at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no serial ports available; connect a device or pass one with --port")]
    NoPortsAvailable,

    #[error("invalid port selection: {0:?} (expected a number)")]
    InvalidSelection(String),

    #[error("port selection {selected} is out of range (1-{available})")]
    SelectionOutOfRange { selected: usize, available: usize },

    #[error("invalid baud rate: {0:?}")]
    InvalidBaud(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolved session settings, immutable for the process lifetime
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Serial port path (e.g., /dev/ttyUSB0)
    pub port: String,
    /// Baud rate
    pub baud: u32,
    /// CSV output path; `None` disables all file writing
    pub file: Option<PathBuf>,
    /// Suppress console echo of raw lines
    pub suppress_echo: bool,
    /// Prepend a capture timestamp to each CSV row
    pub timestamp: bool,
}

/// Resolve a full session configuration from flags and interactive input.
///
/// `ports` is only consulted when no `--port` flag was given; callers may
/// pass an empty slice otherwise.
#[allow(clippy::too_many_arguments)]
pub fn resolve<R: BufRead, W: Write>(
    port_flag: Option<String>,
    baud_flag: Option<u32>,
    file: Option<PathBuf>,
    suppress_echo: bool,
    timestamp: bool,
    ports: &[PortInfo],
    input: &mut R,
    output: &mut W,
) -> Result<SessionConfig, ConfigError> {
    let port = select_port(port_flag, ports, input, output)?;
    let baud = select_baud(baud_flag, input, output)?;

    Ok(SessionConfig {
        port,
        baud,
        file,
        suppress_echo,
        timestamp,
    })
}

/// Pick the serial port: flag value verbatim, or a 1-indexed interactive
/// selection from the enumerated ports.
pub fn select_port<R: BufRead, W: Write>(
    flag: Option<String>,
    ports: &[PortInfo],
    input: &mut R,
    output: &mut W,
) -> Result<String, ConfigError> {
    if let Some(port) = flag {
        return Ok(port);
    }

    if ports.is_empty() {
        return Err(ConfigError::NoPortsAvailable);
    }

    writeln!(output, "Available serial ports:")?;
    for (i, port) in ports.iter().enumerate() {
        match port.product {
            Some(ref product) => writeln!(output, "{}. {} ({})", i + 1, port.path, product)?,
            None => writeln!(output, "{}. {}", i + 1, port.path)?,
        }
    }
    write!(output, "Enter the number of the serial port you want to use: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();

    let selected: usize = answer
        .parse()
        .map_err(|_| ConfigError::InvalidSelection(answer.to_string()))?;
    if selected == 0 || selected > ports.len() {
        return Err(ConfigError::SelectionOutOfRange {
            selected,
            available: ports.len(),
        });
    }

    Ok(ports[selected - 1].path.clone())
}

/// Pick the baud rate: flag value, or a prompt defaulting to 115200 on
/// empty input.
pub fn select_baud<R: BufRead, W: Write>(
    flag: Option<u32>,
    input: &mut R,
    output: &mut W,
) -> Result<u32, ConfigError> {
    if let Some(baud) = flag {
        return Ok(baud);
    }

    write!(output, "Enter the baud rate (default is {}): ", DEFAULT_BAUD)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    // Only a truly empty answer takes the default; whitespace-only input
    // is a parse error like any other non-numeric answer.
    let answer = line.trim_end_matches(['\r', '\n']);
    if answer.is_empty() {
        return Ok(DEFAULT_BAUD);
    }

    answer
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidBaud(answer.to_string()))
}
