//! Timeframe label normalization
//!
//! Labels follow the `<integer><unit>` grammar with unit `m`, `h` or `d`
//! (case-insensitive). Normalizing to minutes gives every configured
//! timeframe a common granularity for sorting and for picking the entry
//! (shortest) and bias (longest) series.

use crate::error::EngineError;
use regex::Regex;

/// Convert a timeframe label such as `"15m"`, `"4h"` or `"1d"` into
/// minutes. Anything outside the grammar is a configuration error, never
/// a silent default.
pub fn parse_timeframe_minutes(timeframe: &str) -> Result<u32, EngineError> {
    let re = Regex::new(r"^(?i)([0-9]+)([mhd])$").unwrap();
    let caps = re
        .captures(timeframe)
        .ok_or_else(|| EngineError::InvalidTimeframe(timeframe.to_string()))?;

    let value: u32 = caps[1]
        .parse()
        .map_err(|_| EngineError::InvalidTimeframe(timeframe.to_string()))?;

    let minutes = match caps[2].to_ascii_lowercase().as_str() {
        "m" => value,
        "h" => value * 60,
        "d" => value * 60 * 24,
        _ => return Err(EngineError::InvalidTimeframe(timeframe.to_string())),
    };

    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_timeframe_minutes("15m").unwrap(), 15);
        assert_eq!(parse_timeframe_minutes("1m").unwrap(), 1);
    }

    #[test]
    fn test_parse_hours_and_days() {
        assert_eq!(parse_timeframe_minutes("1h").unwrap(), 60);
        assert_eq!(parse_timeframe_minutes("4h").unwrap(), 240);
        assert_eq!(parse_timeframe_minutes("1d").unwrap(), 1440);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse_timeframe_minutes("4H").unwrap(), 240);
        assert_eq!(parse_timeframe_minutes("1D").unwrap(), 1440);
    }

    #[test]
    fn test_parse_rejects_malformed_labels() {
        for label in ["abc", "15x", "m", "15", "", "h4", "1.5h"] {
            let err = parse_timeframe_minutes(label).unwrap_err();
            assert!(matches!(err, EngineError::InvalidTimeframe(_)), "{label}");
        }
    }
}
