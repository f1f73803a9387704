//! Common validation utilities.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use validator::ValidationError;

/// Accepted naive date-time layouts, interpreted as UTC.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Validates that a string has at least one non-whitespace character.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("This field is required".into());
        Err(err)
    } else {
        Ok(())
    }
}

/// Parses an event date.
///
/// Accepts RFC 3339 (`2025-01-01T19:00:00-05:00`), naive date-times
/// (`2025-01-01T19:00[:00]`, taken as UTC) and plain dates (`2025-01-01`,
/// midnight UTC).
pub fn parse_event_date(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    let mut err = ValidationError::new("date_format");
    err.message = Some("Enter a valid date/time".into());
    Err(err)
}
