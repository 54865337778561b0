//! HTU31D Serial Logger
//!
//! Logs sensor readings streamed as text lines over a serial connection
//! from an ESP32-C3 running the HTU31D logging firmware. Each reading is
//! a `temperature, humidity` pair; accepted readings are appended to a
//! CSV file while raw lines are echoed to the console.
//!
//! # Usage
//!
//! ```bash
//! # List available serial ports
//! htu31d-logger --list
//!
//! # Log to CSV with timestamps
//! htu31d-logger -p /dev/ttyUSB0 -b 115200 -f readings.csv -t
//!
//! # No flags: prompts for port and baud rate interactively
//! htu31d-logger
//! ```

mod capture;
mod config;
mod serial;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::io;
use std::path::PathBuf;

use capture::CsvLogger;
use serial::PortConfig;

/// HTU31D Serial Logger
///
/// Logging utility for serial output from an HTU31D sensor connected to an ESP32-C3
#[derive(Parser, Debug)]
#[command(name = "htu31d-logger")]
#[command(version)]
#[command(about = "Logging utility for serial output from an HTU31D sensor connected to an ESP32-C3")]
struct Args {
    /// Serial port to read from
    #[arg(short, long)]
    port: Option<String>,

    /// Baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// List available serial ports and exit
    #[arg(short, long)]
    list: bool,

    /// Log data to CSV file with the specified name
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Suppress raw output
    #[arg(short, long)]
    suppress: bool,

    /// Include timestamp in CSV output
    #[arg(short, long)]
    timestamp: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.list {
        for port in serial::port::list_ports()? {
            println!("{}", port.path);
        }
        return Ok(());
    }

    // Ports are only enumerated for the interactive prompt; a port given
    // via --port is used verbatim without an existence check.
    let ports = if args.port.is_none() {
        serial::port::list_ports()?
    } else {
        Vec::new()
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let session = config::resolve(
        args.port,
        args.baud,
        args.file,
        args.suppress,
        args.timestamp,
        &ports,
        &mut input,
        &mut output,
    )?;

    let logger = match session.file {
        Some(ref path) => {
            let logger = CsvLogger::new(path.clone(), session.timestamp);
            logger.write_header()?;
            println!(
                "{} Output file opened: {}",
                "[OK]".green().bold(),
                path.display().to_string().white()
            );
            Some(logger)
        }
        None => None,
    };

    let port_config = PortConfig::new(&session.port).with_baud_rate(session.baud);
    capture::run_capture(port_config, logger, session.suppress_echo)
}
