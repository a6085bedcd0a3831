// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{ClockEvent, PunchType, day_bucket};
use time::{Date, Duration, OffsetDateTime};

/// Two punches closer together than this window are treated as duplicates.
pub const DUPLICATE_PUNCH_WINDOW: Duration = Duration::seconds(60);

/// How far into the future a client-supplied timestamp may drift.
pub const FUTURE_PUNCH_GRACE: Duration = Duration::minutes(5);

/// How far into the past a client-supplied timestamp may reach.
pub const PAST_PUNCH_WINDOW: Duration = Duration::days(7);

/// Maximum page size accepted by paged listings.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum page number accepted by paged listings. Bounded so that the
/// row offset `(page - 1) * page_size` always fits in an `i64`.
pub const MAX_PAGE: i64 = i64::MAX / MAX_PAGE_SIZE;

/// Validates that a new punch type is a legal successor of the day's
/// last punch.
///
/// The rules form a simple state machine over the day bucket:
/// clock-in is legal unless the user is already clocked in, clock-out
/// and break-start require an open clock-in, and break-end requires an
/// open break.
///
/// # Arguments
///
/// * `last` - The punch type of the chronologically last event in the
///   same day bucket, or `None` for an empty day
/// * `new` - The punch type being recorded
///
/// # Errors
///
/// Returns the sequencing violation describing why the punch is
/// rejected.
pub fn validate_punch_sequence(
    last: Option<PunchType>,
    new: PunchType,
) -> Result<(), DomainError> {
    match new {
        PunchType::ClockIn => {
            if last == Some(PunchType::ClockIn) {
                return Err(DomainError::AlreadyClockedIn);
            }
        }
        PunchType::ClockOut => {
            if last != Some(PunchType::ClockIn) {
                return Err(DomainError::MustClockInFirst);
            }
        }
        PunchType::BreakStart => {
            if last != Some(PunchType::ClockIn) {
                return Err(DomainError::MustBeClockedInForBreak);
            }
        }
        PunchType::BreakEnd => {
            if last != Some(PunchType::BreakStart) {
                return Err(DomainError::MustStartBreakFirst);
            }
        }
    }
    Ok(())
}

/// Validates that a new punch is not a near-duplicate of an existing
/// punch on the same day.
///
/// Any existing punch strictly less than [`DUPLICATE_PUNCH_WINDOW`]
/// away (in either direction) rejects the new punch, regardless of
/// punch type.
///
/// # Arguments
///
/// * `day_events` - The existing events in the new punch's day bucket
/// * `timestamp` - The instant of the new punch
///
/// # Errors
///
/// Returns `DomainError::DuplicatePunch` when a conflicting punch
/// exists.
pub fn validate_no_duplicate(
    day_events: &[ClockEvent],
    timestamp: OffsetDateTime,
) -> Result<(), DomainError> {
    for event in day_events {
        let gap: Duration = (event.timestamp - timestamp).abs();
        if gap < DUPLICATE_PUNCH_WINDOW {
            return Err(DomainError::DuplicatePunch {
                window_seconds: DUPLICATE_PUNCH_WINDOW.whole_seconds(),
            });
        }
    }
    Ok(())
}

/// Validates a client-supplied punch timestamp against the server
/// clock.
///
/// Accepts timestamps within [`PAST_PUNCH_WINDOW`] of the past and
/// [`FUTURE_PUNCH_GRACE`] of the future, inclusive.
///
/// # Errors
///
/// Returns `DomainError::TimestampOutOfRange` when the timestamp lies
/// outside the accepted window.
pub fn validate_client_timestamp(
    timestamp: OffsetDateTime,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    if timestamp < now - PAST_PUNCH_WINDOW || timestamp > now + FUTURE_PUNCH_GRACE {
        return Err(DomainError::TimestampOutOfRange {
            timestamp: timestamp.to_string(),
        });
    }
    Ok(())
}

/// Validates pagination bounds.
///
/// Pages are one-based and capped at [`MAX_PAGE`]; page sizes are
/// capped at [`MAX_PAGE_SIZE`].
///
/// # Errors
///
/// Returns `DomainError::InvalidPage` or `DomainError::InvalidPageSize`
/// for out-of-range values.
pub fn validate_page_bounds(page: i64, page_size: i64) -> Result<(), DomainError> {
    if !(1..=MAX_PAGE).contains(&page) {
        return Err(DomainError::InvalidPage { page });
    }
    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(DomainError::InvalidPageSize { page_size });
    }
    Ok(())
}

/// Validates an optional date-range filter.
///
/// Rejects inverted ranges and dates in the future relative to the
/// server's UTC today. Either bound may be absent.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateRange` when `start > end`, or
/// `DomainError::DateInFuture` when either bound lies beyond `today`.
pub fn validate_date_range(
    start: Option<Date>,
    end: Option<Date>,
    today: Date,
) -> Result<(), DomainError> {
    if let (Some(start_date), Some(end_date)) = (start, end)
        && start_date > end_date
    {
        return Err(DomainError::InvalidDateRange {
            start: start_date.to_string(),
            end: end_date.to_string(),
        });
    }
    for bound in [start, end].into_iter().flatten() {
        if bound > today {
            return Err(DomainError::DateInFuture {
                date: bound.to_string(),
            });
        }
    }
    Ok(())
}

/// Returns the punch type of the chronologically last event in a day
/// bucket, breaking timestamp ties by store insertion order.
#[must_use]
pub fn last_punch_of_day(day_events: &[ClockEvent], date: Date) -> Option<PunchType> {
    day_events
        .iter()
        .filter(|event| day_bucket(event.timestamp) == date)
        .max_by_key(|event| (event.timestamp, event.event_id))
        .map(|event| event.punch_type)
}
