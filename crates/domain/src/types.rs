// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, Duration, OffsetDateTime, UtcOffset};

/// Maximum length of a punch description, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// The four kinds of punch a user can record.
///
/// A day's punches form an alternation: work opens at `ClockIn` or
/// `BreakEnd` and closes at `ClockOut` or `BreakStart`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PunchType {
    /// Start of the working day (or return after a clock-out).
    ClockIn,
    /// End of a working stretch for the day.
    ClockOut,
    /// Start of an unpaid break.
    BreakStart,
    /// End of an unpaid break.
    BreakEnd,
}

impl PunchType {
    /// Converts this punch type to its canonical string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ClockIn => "ClockIn",
            Self::ClockOut => "ClockOut",
            Self::BreakStart => "BreakStart",
            Self::BreakEnd => "BreakEnd",
        }
    }

    /// Returns a human-readable label for display surfaces.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ClockIn => "Clock in",
            Self::ClockOut => "Clock out",
            Self::BreakStart => "Break start",
            Self::BreakEnd => "Break end",
        }
    }

    /// Returns whether this punch opens a work segment.
    #[must_use]
    pub const fn opens_segment(&self) -> bool {
        matches!(self, Self::ClockIn | Self::BreakEnd)
    }

    /// Returns whether this punch closes a work segment.
    #[must_use]
    pub const fn closes_segment(&self) -> bool {
        matches!(self, Self::ClockOut | Self::BreakStart)
    }
}

impl FromStr for PunchType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ClockIn" => Ok(Self::ClockIn),
            "ClockOut" => Ok(Self::ClockOut),
            "BreakStart" => Ok(Self::BreakStart),
            "BreakEnd" => Ok(Self::BreakEnd),
            _ => Err(DomainError::InvalidPunchType(s.to_string())),
        }
    }
}

impl std::fmt::Display for PunchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical identifier of a user account.
///
/// IDs are assigned by the store; the domain never fabricates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(i64);

impl UserId {
    /// Creates a `UserId` from a store-assigned value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the numeric identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optional free-text annotation on a punch.
///
/// Length is validated at construction so a `Description` is valid by
/// existence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    value: String,
}

impl Description {
    /// Creates a new `Description`.
    ///
    /// # Arguments
    ///
    /// * `value` - The free text (at most 500 characters)
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DescriptionTooLong` if the text exceeds the
    /// maximum length.
    pub fn new(value: &str) -> Result<Self, DomainError> {
        let length: usize = value.chars().count();
        if length > MAX_DESCRIPTION_LENGTH {
            return Err(DomainError::DescriptionTooLong {
                length,
                max: MAX_DESCRIPTION_LENGTH,
            });
        }
        Ok(Self {
            value: value.to_string(),
        })
    }

    /// Returns the description text.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A single timestamped work-status change event (a punch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockEvent {
    /// The canonical identifier assigned by the store.
    /// `None` indicates the event has not been persisted yet.
    pub event_id: Option<i64>,
    /// The owning user. Every query and mutation is scoped to this user.
    pub user_id: UserId,
    /// The instant of the punch, normalized to UTC.
    pub timestamp: OffsetDateTime,
    /// The kind of punch.
    pub punch_type: PunchType,
    /// Optional free-text annotation.
    pub description: Option<Description>,
    /// Server-assigned creation instant (UTC), immutable.
    pub created_at: OffsetDateTime,
}

impl ClockEvent {
    /// Creates a new, not-yet-persisted clock event.
    ///
    /// Timestamps are normalized to UTC at construction.
    #[must_use]
    pub fn new(
        user_id: UserId,
        timestamp: OffsetDateTime,
        punch_type: PunchType,
        description: Option<Description>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            event_id: None,
            user_id,
            timestamp: timestamp.to_offset(UtcOffset::UTC),
            punch_type,
            description,
            created_at: created_at.to_offset(UtcOffset::UTC),
        }
    }

    /// Returns a copy of this event carrying a store-assigned ID.
    #[must_use]
    pub fn with_id(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }

    /// Returns the UTC calendar date this event belongs to.
    #[must_use]
    pub fn day(&self) -> Date {
        day_bucket(self.timestamp)
    }
}

/// Returns the UTC calendar date a timestamp falls on.
///
/// The day bucket is the grouping key for both sequence validation and
/// aggregation. A punch at 23:59:30 UTC and one at 00:00:10 UTC belong to
/// different buckets and are validated independently.
#[must_use]
pub fn day_bucket(timestamp: OffsetDateTime) -> Date {
    timestamp.to_offset(UtcOffset::UTC).date()
}

/// Derived per-day aggregation of a user's punches.
///
/// Summaries are computed on demand from the event log and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    /// The UTC calendar date.
    pub date: Date,
    /// The day's events, ordered ascending by timestamp.
    pub records: Vec<ClockEvent>,
    /// Total worked duration across closed segments, or `None` when the
    /// day has fewer than two events.
    pub total_worked_time: Option<Duration>,
    /// Whether the chronologically last event of the day is a clock-out.
    pub is_complete: bool,
}
