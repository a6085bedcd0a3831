// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Text encoding for timestamps and dates stored in `SQLite`.
//!
//! All instants are stored as ISO 8601 text in UTC; day buckets are
//! stored as `YYYY-MM-DD` so day-scoped queries can filter on an
//! indexed column.

use time::format_description::well_known::Iso8601;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::error::PersistenceError;

/// Formats an instant for storage, normalized to UTC.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be formatted.
pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, PersistenceError> {
    timestamp
        .to_offset(UtcOffset::UTC)
        .format(&Iso8601::DEFAULT)
        .map_err(|e| PersistenceError::Other(format!("Failed to format timestamp: {e}")))
}

/// Parses a stored instant back into a UTC `OffsetDateTime`.
///
/// # Errors
///
/// Returns `PersistenceError::TimestampCorrupt` if the stored text is
/// not valid ISO 8601.
pub fn parse_timestamp(stored: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(stored, &Iso8601::DEFAULT)
        .map(|timestamp| timestamp.to_offset(UtcOffset::UTC))
        .map_err(|_| PersistenceError::TimestampCorrupt(stored.to_string()))
}

/// Formats a day bucket for storage as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn format_date(date: Date) -> Result<String, PersistenceError> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    date.format(&format)
        .map_err(|e| PersistenceError::Other(format!("Failed to format date: {e}")))
}
