//! Due date parsing.

use super::TaskDomainError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Parses an ISO 8601 due date.
///
/// Accepts RFC 3339 timestamps with an offset, naive timestamps (taken as
/// UTC) and plain calendar dates (midnight UTC).
///
/// # Errors
///
/// Returns [`TaskDomainError::InvalidDueDate`] when the input matches none of
/// the accepted forms.
pub fn parse_due_date(raw: &str) -> Result<DateTime<Utc>, TaskDomainError> {
    let value = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| TaskDomainError::InvalidDueDate(raw.to_owned()))
}
