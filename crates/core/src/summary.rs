// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;
use time::{Date, Duration};
use timeclock_domain::{ClockEvent, DaySummary, PunchType, day_bucket};

/// Computes the total worked time for a day's events.
///
/// Events are folded in ascending timestamp order. A clock-in or
/// break-end opens a work segment (a later opener simply moves the
/// segment start); a clock-out or break-start closes the open segment,
/// if any. Only closed segments contribute. Returns `None` when the day
/// has fewer than two events.
///
/// # Arguments
///
/// * `events` - The day's events, in any order
#[must_use]
pub fn compute_worked_time(events: &[ClockEvent]) -> Option<Duration> {
    if events.len() < 2 {
        return None;
    }

    let mut ordered: Vec<&ClockEvent> = events.iter().collect();
    ordered.sort_by_key(|event| (event.timestamp, event.event_id));

    let mut total: Duration = Duration::ZERO;
    let mut segment_start: Option<time::OffsetDateTime> = None;

    for event in ordered {
        if event.punch_type.opens_segment() {
            segment_start = Some(event.timestamp);
        } else if event.punch_type.closes_segment()
            && let Some(start) = segment_start.take()
        {
            total += event.timestamp - start;
        }
    }

    Some(total)
}

/// Returns whether a day is complete.
///
/// A day is complete when its chronologically last event is a
/// clock-out. An empty day is not complete.
#[must_use]
pub fn is_day_complete(events: &[ClockEvent]) -> bool {
    events
        .iter()
        .max_by_key(|event| (event.timestamp, event.event_id))
        .is_some_and(|event| event.punch_type == PunchType::ClockOut)
}

/// Builds the derived summary for a single day's events.
///
/// The returned records are ordered ascending by timestamp.
#[must_use]
pub fn summarize_day(date: Date, mut events: Vec<ClockEvent>) -> DaySummary {
    events.sort_by_key(|event| (event.timestamp, event.event_id));
    let total_worked_time: Option<Duration> = compute_worked_time(&events);
    let is_complete: bool = is_day_complete(&events);
    DaySummary {
        date,
        records: events,
        total_worked_time,
        is_complete,
    }
}

/// Groups a user's events by UTC calendar date and summarizes each
/// group.
///
/// Summaries are returned sorted with the most recent date first.
/// Days with no events produce no summary.
#[must_use]
pub fn group_into_summaries(events: Vec<ClockEvent>) -> Vec<DaySummary> {
    let mut by_day: BTreeMap<Date, Vec<ClockEvent>> = BTreeMap::new();
    for event in events {
        by_day
            .entry(day_bucket(event.timestamp))
            .or_default()
            .push(event);
    }

    by_day
        .into_iter()
        .rev()
        .map(|(date, day_events)| summarize_day(date, day_events))
        .collect()
}
