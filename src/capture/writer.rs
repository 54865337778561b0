//! CSV record writer
//!
//! Appends accepted sensor readings to the output file, one CSV row per
//! reading. The header is written once at startup; each record reopens
//! the file in append mode, writes, and closes, so every accepted row
//! reaches disk immediately.
//!
//! Fields come from splitting the accepted line on `,` with no whitespace
//! trimming, so the humidity field keeps its leading space. The field
//! count is not validated against the header.

use anyhow::{Context, Result};
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Capture timestamp format for the optional leading CSV column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// CSV logger for accepted sensor readings
#[derive(Debug, Clone)]
pub struct CsvLogger {
    path: PathBuf,
    timestamp: bool,
}

impl CsvLogger {
    /// Create a logger for the given output path. Nothing is written
    /// until [`write_header`](Self::write_header).
    pub fn new(path: PathBuf, timestamp: bool) -> Self {
        Self { path, timestamp }
    }

    /// Output file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the output file and write the header row, matching the
    /// timestamp flag.
    pub fn write_header(&self) -> Result<()> {
        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create output file: {}", self.path.display()))?;
        let mut writer = csv::Writer::from_writer(file);

        if self.timestamp {
            writer.write_record(["Timestamp", "Temperature (C)", "Humidity (%)"])?;
        } else {
            writer.write_record(["Temperature (C)", "Humidity (%)"])?;
        }
        writer.flush()?;

        Ok(())
    }

    /// Append one accepted reading as a CSV row, prepending the capture
    /// time when timestamping is enabled.
    pub fn append(&self, line: &str) -> Result<()> {
        let row = if self.timestamp {
            format!("{},{}", Local::now().format(TIMESTAMP_FORMAT), line)
        } else {
            line.to_string()
        };

        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open output file: {}", self.path.display()))?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(row.split(','))?;
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use tempfile::tempdir;

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }

    #[test]
    fn test_header_without_timestamp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let logger = CsvLogger::new(path.clone(), false);
        logger.write_header().unwrap();

        assert_eq!(read_lines(&path), vec!["Temperature (C),Humidity (%)"]);
    }

    #[test]
    fn test_header_with_timestamp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let logger = CsvLogger::new(path.clone(), true);
        logger.write_header().unwrap();

        assert_eq!(
            read_lines(&path),
            vec!["Timestamp,Temperature (C),Humidity (%)"]
        );
    }

    #[test]
    fn test_record_round_trip_preserves_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let logger = CsvLogger::new(path.clone(), false);
        logger.write_header().unwrap();
        logger.append("23.45, 56.78").unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        // Second field keeps its leading space, byte-for-byte
        assert_eq!(lines[1], "23.45, 56.78");
        let fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(fields, vec!["23.45", " 56.78"]);
    }

    #[test]
    fn test_trailing_text_produces_extra_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let logger = CsvLogger::new(path.clone(), false);
        logger.write_header().unwrap();
        logger.append("23.45, 56.78, 90.12").unwrap();

        let lines = read_lines(&path);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(lines[1].as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        // Three fields against a two-column header; the mismatch is not
        // validated
        assert_eq!(record.len(), 3);
        assert_eq!(&record[1], " 56.78");
        assert_eq!(&record[2], " 90.12");
    }

    #[test]
    fn test_timestamped_record_has_leading_datetime() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let logger = CsvLogger::new(path.clone(), true);
        logger.write_header().unwrap();
        logger.append("23.45, 56.78").unwrap();

        let lines = read_lines(&path);
        let fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(fields.len(), 3);
        assert!(NaiveDateTime::parse_from_str(fields[0], TIMESTAMP_FORMAT).is_ok());
        assert_eq!(fields[1], "23.45");
        assert_eq!(fields[2], " 56.78");
    }

    #[test]
    fn test_append_accumulates_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let logger = CsvLogger::new(path.clone(), false);
        logger.write_header().unwrap();
        logger.append("23.45, 56.78").unwrap();
        logger.append("24.01, 55.90").unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "24.01, 55.90");
    }

    #[test]
    fn test_append_without_header_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        let logger = CsvLogger::new(path, false);
        assert!(logger.append("23.45, 56.78").is_err());
    }
}
