//! Value parsers for CLI arguments.

use crate::constants::confidence;

fn parse_in_range(s: &str, min: f64, max: f64, name: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !(min..=max).contains(&value) {
        return Err(format!("{name} must be between {min} and {max}, got {value}"));
    }

    Ok(value)
}

/// Acceptance threshold, 0.0 to 1.0 inclusive.
#[allow(clippy::cast_possible_truncation)]
pub fn parse_threshold(s: &str) -> Result<f32, String> {
    parse_in_range(
        s,
        f64::from(confidence::MIN),
        f64::from(confidence::MAX),
        "threshold",
    )
    .map(|v| v as f32)
}

/// Latitude, -90.0 to 90.0.
pub fn parse_latitude(s: &str) -> Result<f64, String> {
    parse_in_range(s, -90.0, 90.0, "latitude")
}

/// Longitude, -180.0 to 180.0.
pub fn parse_longitude(s: &str) -> Result<f64, String> {
    parse_in_range(s, -180.0, 180.0, "longitude")
}

/// Pin label: surrounding whitespace trimmed, must not be empty.
pub fn parse_label(s: &str) -> Result<String, String> {
    let label = s.trim();
    if label.is_empty() {
        return Err("label must not be empty".to_string());
    }
    Ok(label.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_threshold() {
        assert_eq!(parse_threshold("0.4").unwrap(), 0.4);
        assert_eq!(parse_threshold("0").unwrap(), 0.0);
        assert_eq!(parse_threshold("1.0").unwrap(), 1.0);
        assert!(parse_threshold("1.01").is_err());
        assert!(parse_threshold("-0.1").is_err());
        assert!(parse_threshold("high").is_err());
        assert!(parse_threshold("NaN").is_err());
    }

    #[test]
    fn test_parse_latitude() {
        assert_eq!(parse_latitude("52.1").unwrap(), 52.1);
        assert_eq!(parse_latitude("-90").unwrap(), -90.0);
        assert!(parse_latitude("90.5").is_err());
        assert!(parse_latitude("north").is_err());
    }

    #[test]
    fn test_parse_longitude() {
        assert_eq!(parse_longitude("21.0").unwrap(), 21.0);
        assert_eq!(parse_longitude("180").unwrap(), 180.0);
        assert!(parse_longitude("-180.1").is_err());
    }

    #[test]
    fn test_range_error_message() {
        let err = parse_latitude("100").unwrap_err();
        assert!(err.contains("latitude must be between -90 and 90"));
    }

    #[test]
    fn test_parse_label() {
        assert_eq!(parse_label("  Rose ").unwrap(), "Rose");
        assert!(parse_label("   ").is_err());
    }
}
