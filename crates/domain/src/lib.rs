// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types and rule validation for the Timeclock system.
//!
//! This crate contains the pure vocabulary of the system: punch types,
//! clock events, derived day summaries, and the validation rules that
//! govern them. It performs no I/O; orderings and day bucketing are
//! always expressed in UTC.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use types::{
    ClockEvent, DaySummary, Description, MAX_DESCRIPTION_LENGTH, PunchType, UserId, day_bucket,
};
pub use validation::{
    DUPLICATE_PUNCH_WINDOW, FUTURE_PUNCH_GRACE, MAX_PAGE, MAX_PAGE_SIZE, PAST_PUNCH_WINDOW,
    last_punch_of_day, validate_client_timestamp, validate_date_range, validate_no_duplicate,
    validate_page_bounds, validate_punch_sequence,
};
