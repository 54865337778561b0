//! Sensor reading line filter
//!
//! The firmware emits lines of the form
//! `Temperature (C):23.45, Relative Humidity (%):56.78` interleaved with
//! arbitrary boot and status text. After the labels are stripped, a line
//! is a valid reading iff it starts with two two-digit decimals separated
//! by a comma and a space. Anything else (empty lines, partial reads,
//! firmware chatter) is silently dropped by the caller.

use once_cell::sync::Lazy;
use regex::Regex;

/// Temperature field label emitted by the firmware
pub const TEMPERATURE_LABEL: &str = "Temperature (C):";

/// Humidity field label emitted by the firmware
pub const HUMIDITY_LABEL: &str = "Relative Humidity (%):";

// Prefix match only: trailing text after the pair does not affect the
// decision, and the whole line is still split for CSV emission.
static READING_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}\.\d{2}, \d{2}\.\d{2}").expect("valid reading pattern"));

/// Remove the firmware's field labels, leaving the numeric payload.
pub fn strip_labels(line: &str) -> String {
    line.replace(TEMPERATURE_LABEL, "")
        .replace(HUMIDITY_LABEL, "")
}

/// Check whether a label-stripped line starts with a `DD.DD, DD.DD` pair.
pub fn is_sensor_reading(line: &str) -> bool {
    READING_PATTERN.is_match(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_reading_matches() {
        assert!(is_sensor_reading("23.45, 56.78"));
    }

    #[test]
    fn test_labeled_reading_matches_after_stripping() {
        let line = "Temperature (C):23.45, Relative Humidity (%):56.78";
        let stripped = strip_labels(line);
        assert_eq!(stripped, "23.45, 56.78");
        assert!(is_sensor_reading(&stripped));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(!is_sensor_reading("garbage"));
        assert!(!is_sensor_reading("rst:0x1 (POWERON_RESET),boot:0x13"));
    }

    #[test]
    fn test_empty_line_rejected() {
        assert!(!is_sensor_reading(""));
    }

    #[test]
    fn test_trailing_text_still_matches() {
        // Prefix-only match: an unmatched suffix is irrelevant
        assert!(is_sensor_reading("23.45, 56.78 extra"));
        assert!(is_sensor_reading("23.45, 56.78, 90.12"));
    }

    #[test]
    fn test_partial_reading_rejected() {
        // Truncated on disconnect
        assert!(!is_sensor_reading("23.45, 5"));
        assert!(!is_sensor_reading("23.45"));
    }

    #[test]
    fn test_single_digit_fields_rejected() {
        assert!(!is_sensor_reading("3.45, 56.78"));
        assert!(!is_sensor_reading("23.45, 6.78"));
    }

    #[test]
    fn test_match_requires_line_start() {
        assert!(!is_sensor_reading("reading: 23.45, 56.78"));
    }

    #[test]
    fn test_strip_labels_leaves_other_text_alone() {
        assert_eq!(strip_labels("HTU31D ready"), "HTU31D ready");
    }
}
