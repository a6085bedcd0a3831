// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use time::OffsetDateTime;
use timeclock_domain::{
    ClockEvent, PunchType, day_bucket, last_punch_of_day, validate_client_timestamp,
    validate_no_duplicate, validate_punch_sequence,
};

/// Resolves the effective timestamp of a new punch.
///
/// A missing client timestamp resolves to the server's `now`. A supplied
/// timestamp is checked against the accepted drift window and normalized
/// to UTC.
///
/// # Arguments
///
/// * `client_timestamp` - The timestamp supplied by the client, if any
/// * `now` - The server's current instant
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` when the client timestamp lies
/// outside the accepted window.
pub fn resolve_timestamp(
    client_timestamp: Option<OffsetDateTime>,
    now: OffsetDateTime,
) -> Result<OffsetDateTime, CoreError> {
    match client_timestamp {
        None => Ok(now.to_offset(time::UtcOffset::UTC)),
        Some(timestamp) => {
            validate_client_timestamp(timestamp, now)?;
            Ok(timestamp.to_offset(time::UtcOffset::UTC))
        }
    }
}

/// Validates a new punch against the user's existing events for its day
/// bucket.
///
/// Runs the sequencing rule against the chronologically last event of
/// the day, then the duplicate guard against every event of the day.
/// The caller must ensure no other punch for the same user is admitted
/// between this check and the write that follows it.
///
/// # Arguments
///
/// * `day_events` - The user's existing events in the punch's UTC day
///   bucket
/// * `punch_type` - The kind of punch being recorded
/// * `timestamp` - The resolved UTC instant of the punch
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` carrying the first rule the
/// punch breaks.
pub fn validate_punch(
    day_events: &[ClockEvent],
    punch_type: PunchType,
    timestamp: OffsetDateTime,
) -> Result<(), CoreError> {
    let last: Option<PunchType> = last_punch_of_day(day_events, day_bucket(timestamp));
    validate_punch_sequence(last, punch_type)?;
    validate_no_duplicate(day_events, timestamp)?;
    Ok(())
}
