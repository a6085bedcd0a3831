// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Clock event queries.
//!
//! All queries are scoped by `user_id`; an event belonging to another
//! user is indistinguishable from a missing one.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::Date;
use tracing::debug;

use crate::codec;
use crate::data_models::EventFilter;
use crate::diesel_schema::clock_events;
use crate::error::PersistenceError;
use std::str::FromStr;
use timeclock_domain::{ClockEvent, Description, PunchType, UserId};

/// Diesel Queryable struct for clock event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = clock_events)]
struct ClockEventRow {
    event_id: i64,
    user_id: i64,
    timestamp: String,
    day_bucket: String,
    punch_type: String,
    description: Option<String>,
    created_at: String,
}

impl ClockEventRow {
    fn into_domain(self) -> Result<ClockEvent, PersistenceError> {
        let punch_type: PunchType = PunchType::from_str(&self.punch_type)
            .map_err(|_| PersistenceError::PunchTypeCorrupt(self.punch_type.clone()))?;
        let description: Option<Description> = match self.description {
            None => None,
            Some(text) => Some(
                Description::new(&text)
                    .map_err(|e| PersistenceError::Other(e.to_string()))?,
            ),
        };
        Ok(ClockEvent {
            event_id: Some(self.event_id),
            user_id: UserId::new(self.user_id),
            timestamp: codec::parse_timestamp(&self.timestamp)?,
            punch_type,
            description,
            created_at: codec::parse_timestamp(&self.created_at)?,
        })
    }
}

fn rows_into_domain(rows: Vec<ClockEventRow>) -> Result<Vec<ClockEvent>, PersistenceError> {
    rows.into_iter().map(ClockEventRow::into_domain).collect()
}

/// Retrieves a single clock event owned by the given user.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no such event exists for this user.
pub fn get_clock_event(
    conn: &mut SqliteConnection,
    user_id: UserId,
    event_id: i64,
) -> Result<Option<ClockEvent>, PersistenceError> {
    debug!(event_id, user_id = user_id.value(), "Looking up clock event");

    let result: Result<ClockEventRow, diesel::result::Error> = clock_events::table
        .filter(clock_events::event_id.eq(event_id))
        .filter(clock_events::user_id.eq(user_id.value()))
        .select(ClockEventRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_domain()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves all of a user's events in a single UTC day bucket, ordered
/// ascending by timestamp.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row cannot
/// be decoded.
pub fn list_events_for_day(
    conn: &mut SqliteConnection,
    user_id: UserId,
    date: Date,
) -> Result<Vec<ClockEvent>, PersistenceError> {
    let bucket: String = codec::format_date(date)?;

    debug!(user_id = user_id.value(), day = %bucket, "Listing day events");

    let rows: Vec<ClockEventRow> = clock_events::table
        .filter(clock_events::user_id.eq(user_id.value()))
        .filter(clock_events::day_bucket.eq(&bucket))
        .order((clock_events::timestamp.asc(), clock_events::event_id.asc()))
        .select(ClockEventRow::as_select())
        .load(conn)?;

    rows_into_domain(rows)
}

/// Retrieves all of a user's events whose day bucket falls within an
/// inclusive date range, ordered ascending by timestamp.
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row cannot
/// be decoded.
pub fn list_events_between_days(
    conn: &mut SqliteConnection,
    user_id: UserId,
    start_date: Date,
    end_date: Date,
) -> Result<Vec<ClockEvent>, PersistenceError> {
    let start_bucket: String = codec::format_date(start_date)?;
    let end_bucket: String = codec::format_date(end_date)?;

    debug!(
        user_id = user_id.value(),
        start = %start_bucket,
        end = %end_bucket,
        "Listing events in day range"
    );

    let rows: Vec<ClockEventRow> = clock_events::table
        .filter(clock_events::user_id.eq(user_id.value()))
        .filter(clock_events::day_bucket.ge(&start_bucket))
        .filter(clock_events::day_bucket.le(&end_bucket))
        .order((clock_events::timestamp.asc(), clock_events::event_id.asc()))
        .select(ClockEventRow::as_select())
        .load(conn)?;

    rows_into_domain(rows)
}

type BoxedEventQuery<'a> = clock_events::BoxedQuery<'a, diesel::sqlite::Sqlite>;

fn filtered_query<'a>(
    user_id: UserId,
    start_bucket: Option<&'a String>,
    end_bucket: Option<&'a String>,
    punch_type: Option<PunchType>,
) -> BoxedEventQuery<'a> {
    let mut query: BoxedEventQuery<'a> = clock_events::table
        .filter(clock_events::user_id.eq(user_id.value()))
        .into_boxed();

    if let Some(bucket) = start_bucket {
        query = query.filter(clock_events::day_bucket.ge(bucket.as_str()));
    }
    if let Some(bucket) = end_bucket {
        query = query.filter(clock_events::day_bucket.le(bucket.as_str()));
    }
    if let Some(punch) = punch_type {
        query = query.filter(clock_events::punch_type.eq(punch.as_str()));
    }

    query
}

/// Retrieves one page of a user's events, most recent first, along with
/// the total number of events matching the filter.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `user_id` - The owning user
/// * `filter` - Optional date-range and punch-type filters
/// * `page` - The one-based page number
/// * `page_size` - The number of events per page
///
/// # Errors
///
/// Returns an error if the database query fails or a stored row cannot
/// be decoded.
pub fn list_events_filtered(
    conn: &mut SqliteConnection,
    user_id: UserId,
    filter: &EventFilter,
    page: i64,
    page_size: i64,
) -> Result<(Vec<ClockEvent>, i64), PersistenceError> {
    let start_bucket: Option<String> = filter
        .start_date
        .map(codec::format_date)
        .transpose()?;
    let end_bucket: Option<String> = filter.end_date.map(codec::format_date).transpose()?;

    debug!(
        user_id = user_id.value(),
        page,
        page_size,
        "Listing filtered events"
    );

    let total_count: i64 =
        filtered_query(user_id, start_bucket.as_ref(), end_bucket.as_ref(), filter.punch_type)
            .count()
            .get_result(conn)?;

    let rows: Vec<ClockEventRow> =
        filtered_query(user_id, start_bucket.as_ref(), end_bucket.as_ref(), filter.punch_type)
            .order((clock_events::timestamp.desc(), clock_events::event_id.desc()))
            .limit(page_size)
            .offset((page - 1).saturating_mul(page_size))
            .select(ClockEventRow::as_select())
            .load(conn)?;

    Ok((rows_into_domain(rows)?, total_count))
}
