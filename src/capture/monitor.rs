//! Blocking capture loop
//!
//! Reads newline-delimited sensor output, echoes raw lines to the
//! console, and routes label-stripped lines through the filter into the
//! CSV writer. The loop checks a shutdown flag each iteration so the
//! port and file are released cleanly on Ctrl+C instead of relying on
//! OS-level cleanup.

use anyhow::{Context, Result};
use colored::Colorize;
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::capture::{filter, CsvLogger};
use crate::serial::{PortConfig, SerialConnection};

/// Sensor capture loop with clean-shutdown support
pub struct CaptureMonitor {
    suppress_echo: bool,
    connection: Option<SerialConnection>,
    logger: Option<CsvLogger>,
    line_count: usize,
    record_count: usize,
    running: Arc<AtomicBool>,
}

impl CaptureMonitor {
    /// Create a new monitor. `logger` is `None` when no output file was
    /// requested; readings are then echo-only.
    ///
    /// The running flag starts set, so a SIGINT delivered between handler
    /// registration and [`start`](Self::start) is not lost.
    pub fn new(suppress_echo: bool, logger: Option<CsvLogger>) -> Self {
        Self {
            suppress_echo,
            connection: None,
            logger,
            line_count: 0,
            record_count: 0,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Get a clone of the running flag for signal handling
    pub fn get_running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Lines seen so far
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Records written so far
    pub fn record_count(&self) -> usize {
        self.record_count
    }

    /// Open the serial port
    pub fn connect(&mut self, port_config: PortConfig) -> Result<()> {
        let connection = SerialConnection::open(port_config)?;

        println!(
            "{} Serial port opened: {} at {} baud",
            "[OK]".green().bold(),
            connection.config().port_path.white().bold(),
            connection.config().baud_rate
        );

        self.connection = Some(connection);
        Ok(())
    }

    /// Run the capture loop until the running flag is cleared.
    ///
    /// Transport and decode errors are fatal and propagate. A read
    /// timeout yields an empty raw line that flows through echo and
    /// filter like any other; the timeout paces the loop, so no extra
    /// sleep is needed.
    pub fn start(&mut self) -> Result<()> {
        println!("{}", "Press Ctrl+C to stop".yellow());

        while self.running.load(Ordering::SeqCst) {
            let Some(conn) = self.connection.as_mut() else {
                break;
            };
            let read = conn.read_line()?;
            self.handle_read(read)?;
        }

        self.print_summary();
        Ok(())
    }

    /// Stop the capture loop
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Handle one read result. A timed-out read is an empty raw line:
    /// it is echoed and counted like any other and simply fails the
    /// filter.
    fn handle_read(&mut self, read: Option<String>) -> Result<()> {
        let line = read.unwrap_or_default();
        let line = line.trim().to_string();
        self.process_line(&line)
    }

    /// Process a single whitespace-trimmed line
    fn process_line(&mut self, line: &str) -> Result<()> {
        self.line_count += 1;

        if !self.suppress_echo {
            println!("{}", line);
        }

        let data = filter::strip_labels(line);

        if let Some(ref logger) = self.logger {
            if filter::is_sensor_reading(&data) {
                logger.append(&data)?;
                self.record_count += 1;
            } else {
                debug!("skipping non-matching line: {:?}", data);
            }
        }

        Ok(())
    }

    /// Print capture statistics
    fn print_summary(&self) {
        println!();
        println!("{}", "--- Capture Summary ---".cyan().bold());
        println!("Lines read: {}", self.line_count);
        println!("Records written: {}", self.record_count);
        if let Some(ref logger) = self.logger {
            println!("Log saved to: {}", logger.path().display());
        }
    }
}

/// Run the capture loop with Ctrl+C handling
pub fn run_capture(
    port_config: PortConfig,
    logger: Option<CsvLogger>,
    suppress_echo: bool,
) -> Result<()> {
    let mut monitor = CaptureMonitor::new(suppress_echo, logger);

    let running = monitor.get_running_flag();
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .with_context(|| "Failed to set Ctrl+C handler")?;

    monitor.connect(port_config)?;
    monitor.start()
}
