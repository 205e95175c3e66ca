use crate::registration::UNKNOWN;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%d %H:%M:%S%z"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y.%m.%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%b-%Y", "%Y.%m.%d", "%Y/%m/%d"];

/// Formats a registry date as `YYYY-MM-DD HH:MM:SS` (UTC)
///
/// Accepts RFC 3339, ISO-like timestamps with or without offset and plain
/// dates. Anything else is returned unchanged; blank input becomes "Unknown".
pub fn format_registry_date(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return UNKNOWN.to_string();
    }

    // WHOIS servers append zone names like "(UTC)" or " UTC"
    let candidate = raw
        .trim_end_matches("(UTC)")
        .trim_end_matches("UTC")
        .trim_end();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(candidate) {
        return parsed.with_timezone(&Utc).format(OUTPUT_FORMAT).to_string();
    }

    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(candidate, format) {
            return parsed.with_timezone(&Utc).format(OUTPUT_FORMAT).to_string();
        }
    }

    for format in NAIVE_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(candidate, format) {
            return parsed.format(OUTPUT_FORMAT).to_string();
        }
    }

    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(candidate, format) {
            return parsed.format("%Y-%m-%d 00:00:00").to_string();
        }
    }

    raw.to_string()
}

/// Formats Unix seconds as `YYYY-MM-DD HH:MM:SS` (UTC)
pub fn format_unix_seconds(seconds: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(seconds, 0).map(|dt| dt.format(OUTPUT_FORMAT).to_string())
}

/// Formats a JSON date that may be a string, Unix seconds or a list of either
///
/// Lists contribute their first element.
pub fn format_json_date(value: Option<&Value>) -> String {
    match first_element(value) {
        Some(Value::String(s)) => format_registry_date(s),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .filter(|secs| *secs > 0)
            .and_then(format_unix_seconds)
            .unwrap_or_else(|| UNKNOWN.to_string()),
        _ => UNKNOWN.to_string(),
    }
}

/// Reads a JSON string that may be wrapped in a list
pub fn json_text(value: Option<&Value>) -> Option<String> {
    match first_element(value) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn first_element(value: Option<&Value>) -> Option<&Value> {
    match value {
        Some(Value::Array(items)) => items.first(),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rfc3339_is_normalized_to_utc() {
        assert_eq!(format_registry_date("2020-01-01T00:00:00Z"), "2020-01-01 00:00:00");
        assert_eq!(
            format_registry_date("1995-08-14T04:00:00-04:00"),
            "1995-08-14 08:00:00"
        );
        assert_eq!(
            format_registry_date("2024-08-13T07:01:34.123Z"),
            "2024-08-13 07:01:34"
        );
    }

    #[test]
    fn test_compact_offset() {
        assert_eq!(
            format_registry_date("2024-08-13T07:01:34+0000"),
            "2024-08-13 07:01:34"
        );
    }

    #[test]
    fn test_naive_and_date_only() {
        assert_eq!(format_registry_date("2011-02-03 04:05:06"), "2011-02-03 04:05:06");
        assert_eq!(format_registry_date("2011-02-03"), "2011-02-03 00:00:00");
        assert_eq!(format_registry_date("12-Jan-2005"), "2005-01-12 00:00:00");
        assert_eq!(
            format_registry_date("1997-09-15 04:00:00 UTC"),
            "1997-09-15 04:00:00"
        );
    }

    #[test]
    fn test_unrecognized_passes_through() {
        assert_eq!(format_registry_date("before 2001"), "before 2001");
        assert_eq!(format_registry_date("   "), "Unknown");
    }

    #[test]
    fn test_json_dates() {
        assert_eq!(format_json_date(Some(&json!(1577836800))), "2020-01-01 00:00:00");
        assert_eq!(
            format_json_date(Some(&json!([1577836800, 1577923200]))),
            "2020-01-01 00:00:00"
        );
        assert_eq!(
            format_json_date(Some(&json!(["2020-01-01T00:00:00Z"]))),
            "2020-01-01 00:00:00"
        );
        assert_eq!(format_json_date(Some(&json!(null))), "Unknown");
        assert_eq!(format_json_date(Some(&json!([]))), "Unknown");
        assert_eq!(format_json_date(None), "Unknown");
    }

    #[test]
    fn test_json_text() {
        assert_eq!(json_text(Some(&json!("  MarkMonitor Inc. "))).as_deref(), Some("MarkMonitor Inc."));
        assert_eq!(json_text(Some(&json!(["First", "Second"]))).as_deref(), Some("First"));
        assert_eq!(json_text(Some(&json!(""))), None);
        assert_eq!(json_text(Some(&json!(42))), None);
    }
}
