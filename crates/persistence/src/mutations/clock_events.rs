// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Clock event mutations.
//!
//! The event log is append-and-delete only; stored events are never
//! updated.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::codec;
use crate::diesel_schema::clock_events;
use crate::error::PersistenceError;
use crate::sqlite;
use timeclock_domain::{ClockEvent, day_bucket};

/// Inserts a new clock event and returns its assigned ID.
///
/// The event's day bucket is derived from its UTC timestamp at write
/// time so day-scoped queries stay consistent with the timestamp
/// column.
///
/// # Errors
///
/// Returns an error if the insert fails or the timestamps cannot be
/// encoded.
pub fn insert_clock_event(
    conn: &mut SqliteConnection,
    event: &ClockEvent,
) -> Result<i64, PersistenceError> {
    let timestamp: String = codec::format_timestamp(event.timestamp)?;
    let bucket: String = codec::format_date(day_bucket(event.timestamp))?;
    let created_at: String = codec::format_timestamp(event.created_at)?;

    info!(
        user_id = event.user_id.value(),
        punch_type = event.punch_type.as_str(),
        timestamp = %timestamp,
        "Recording clock event"
    );

    diesel::insert_into(clock_events::table)
        .values((
            clock_events::user_id.eq(event.user_id.value()),
            clock_events::timestamp.eq(&timestamp),
            clock_events::day_bucket.eq(&bucket),
            clock_events::punch_type.eq(event.punch_type.as_str()),
            clock_events::description.eq(event
                .description
                .as_ref()
                .map(timeclock_domain::Description::value)),
            clock_events::created_at.eq(&created_at),
        ))
        .execute(conn)?;

    let event_id: i64 = sqlite::get_last_insert_rowid(conn)?;

    info!(event_id, "Clock event recorded");
    Ok(event_id)
}

/// Deletes a clock event owned by the given user.
///
/// # Errors
///
/// Returns `PersistenceError::EventNotFound` if no such event exists
/// for this user, including when the event belongs to someone else.
pub fn delete_clock_event(
    conn: &mut SqliteConnection,
    user_id: i64,
    event_id: i64,
) -> Result<(), PersistenceError> {
    debug!(event_id, user_id, "Deleting clock event");

    let deleted: usize = diesel::delete(
        clock_events::table
            .filter(clock_events::event_id.eq(event_id))
            .filter(clock_events::user_id.eq(user_id)),
    )
    .execute(conn)?;

    if deleted == 0 {
        return Err(PersistenceError::EventNotFound(event_id));
    }

    info!(event_id, user_id, "Clock event deleted");
    Ok(())
}
