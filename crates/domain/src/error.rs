// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors produced by domain rule validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A clock-in was attempted while the last punch of the day is already
    /// a clock-in.
    AlreadyClockedIn,
    /// A clock-out was attempted without a preceding clock-in that day.
    MustClockInFirst,
    /// A break-start was attempted while not clocked in.
    MustBeClockedInForBreak,
    /// A break-end was attempted without a preceding break-start.
    MustStartBreakFirst,
    /// The new punch is within the duplicate-guard window of an existing
    /// punch for the same user.
    DuplicatePunch {
        /// Width of the guard window in seconds.
        window_seconds: i64,
    },
    /// The punch type string is not one of the four known types.
    InvalidPunchType(String),
    /// The description exceeds the maximum allowed length.
    DescriptionTooLong {
        /// The actual length submitted.
        length: usize,
        /// The maximum allowed length.
        max: usize,
    },
    /// A client-supplied timestamp falls outside the accepted window.
    TimestampOutOfRange {
        /// The rejected timestamp (ISO 8601).
        timestamp: String,
    },
    /// The requested page number is outside the accepted bounds.
    InvalidPage {
        /// The rejected page number.
        page: i64,
    },
    /// The requested page size is outside the accepted bounds.
    InvalidPageSize {
        /// The rejected page size.
        page_size: i64,
    },
    /// The start date of a range is after the end date.
    InvalidDateRange {
        /// The start of the rejected range (ISO 8601 date).
        start: String,
        /// The end of the rejected range (ISO 8601 date).
        end: String,
    },
    /// A filter date lies in the future relative to the server's UTC today.
    DateInFuture {
        /// The rejected date (ISO 8601 date).
        date: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyClockedIn => {
                write!(f, "Cannot clock in: already clocked in")
            }
            Self::MustClockInFirst => {
                write!(f, "Cannot clock out: must clock in first")
            }
            Self::MustBeClockedInForBreak => {
                write!(f, "Cannot start break: must be clocked in to start break")
            }
            Self::MustStartBreakFirst => {
                write!(f, "Cannot end break: must start break first")
            }
            Self::DuplicatePunch { window_seconds } => {
                write!(
                    f,
                    "Punch rejected: within {window_seconds} seconds of an existing punch"
                )
            }
            Self::InvalidPunchType(value) => {
                write!(f, "Invalid punch type: '{value}'")
            }
            Self::DescriptionTooLong { length, max } => {
                write!(
                    f,
                    "Description is {length} characters; maximum is {max} characters"
                )
            }
            Self::TimestampOutOfRange { timestamp } => {
                write!(
                    f,
                    "Timestamp {timestamp} must be between 7 days ago and 5 minutes from now"
                )
            }
            Self::InvalidPage { page } => {
                write!(f, "Page number {page} is out of range")
            }
            Self::InvalidPageSize { page_size } => {
                write!(f, "Page size must be between 1 and 100, got {page_size}")
            }
            Self::InvalidDateRange { start, end } => {
                write!(f, "Start date {start} must not be after end date {end}")
            }
            Self::DateInFuture { date } => {
                write!(f, "Date {date} must not be in the future")
            }
        }
    }
}

impl std::error::Error for DomainError {}
