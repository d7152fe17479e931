use chrono::{DateTime, Utc};

use super::DecodeError;
use crate::domain::Timestamp;

/// Parse a timestamp field. The service uses RFC 2822 (`Sat, 04 Aug 2018 03:35:27 +0000`)
/// on resources and RFC 3339 (`2016-09-20T22:59:57Z`) in a few newer places.
///
/// `null`, missing and empty values are all "not set", never the epoch.
pub(super) fn parse_timestamp(
    field: &'static str,
    value: Option<String>,
) -> Result<Option<Timestamp>, DecodeError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    DateTime::parse_from_rfc2822(trimmed)
        .or_else(|_| DateTime::parse_from_rfc3339(trimmed))
        .map(|parsed| Some(parsed.with_timezone(&Utc)))
        .map_err(|_| DecodeError::InvalidField {
            field,
            reason: format!("unrecognized timestamp {trimmed:?}"),
        })
}
