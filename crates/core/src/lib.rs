// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Punch validation and day aggregation for the Timeclock system.
//!
//! The persistence layer hands this crate a user's existing events;
//! this crate decides whether a new punch is admissible and derives
//! per-day summaries from the event log. It holds no state of its own.

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
mod punch;
mod summary;

#[cfg(test)]
mod tests;

pub use error::CoreError;
pub use punch::{resolve_timestamp, validate_punch};
pub use summary::{
    compute_worked_time, group_into_summaries, is_day_complete, summarize_day,
};
