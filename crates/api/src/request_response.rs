// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Timestamps and dates cross the API boundary as ISO 8601 text; the
//! handlers parse and validate them before touching the domain.

use serde::{Deserialize, Serialize};

/// Uniform response envelope for every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// A human-readable message.
    pub message: String,
    /// The payload, present on success.
    pub data: Option<T>,
    /// Detail messages, present on failure.
    pub errors: Vec<String>,
}

impl<T> ApiResponse<T> {
    /// Builds a success envelope around a payload.
    #[must_use]
    pub fn success(data: T, message: String) -> Self {
        Self {
            success: true,
            message,
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// Builds a failure envelope with a single message.
    #[must_use]
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: message.clone(),
            data: None,
            errors: vec![message],
        }
    }
}

/// One page of results plus paging metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagedResponse<T> {
    /// The page contents.
    pub data: Vec<T>,
    /// Total number of items across all pages.
    pub total_count: i64,
    /// The one-based page number.
    pub page: i64,
    /// The page size used.
    pub page_size: i64,
    /// Total number of pages.
    pub total_pages: i64,
    /// Whether a later page exists.
    pub has_next_page: bool,
    /// Whether an earlier page exists.
    pub has_previous_page: bool,
}

impl<T> PagedResponse<T> {
    /// Builds a page, deriving the paging metadata.
    ///
    /// `total_pages` is the ceiling of `total_count / page_size`.
    #[must_use]
    pub fn new(data: Vec<T>, total_count: i64, page: i64, page_size: i64) -> Self {
        let total_pages: i64 = if total_count == 0 {
            0
        } else {
            (total_count + page_size - 1) / page_size
        };
        Self {
            data,
            total_count,
            page,
            page_size,
            total_pages,
            has_next_page: page < total_pages,
            has_previous_page: page > 1,
        }
    }
}

/// API request to register a new account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// The email address (unique, case-insensitive).
    pub email: String,
    /// The user's display name.
    pub full_name: String,
    /// Optional unique employee code.
    pub employee_code: Option<String>,
    /// The password.
    pub password: String,
    /// The password confirmation.
    pub confirm_password: String,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    /// The email address.
    pub email: String,
    /// The password.
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// The opaque session token to present as a Bearer credential.
    pub session_token: String,
    /// The authenticated user's profile.
    pub user: UserProfile,
}

/// A user account as exposed by the API.
///
/// This is a fixed contract; the password hash never appears here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The canonical user identifier.
    pub user_id: i64,
    /// The email address.
    pub email: String,
    /// The display name.
    pub full_name: String,
    /// The employee code, if any.
    pub employee_code: Option<String>,
    /// The role (Admin or Employee).
    pub role: String,
    /// Whether the account is active.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: String,
    /// When the account last logged in, if ever.
    pub last_login_at: Option<String>,
}

/// API request to record a punch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePunchRequest {
    /// The punch type (ClockIn, ClockOut, BreakStart, BreakEnd).
    pub punch_type: String,
    /// Optional client-supplied instant (ISO 8601). Defaults to the
    /// server's current time.
    pub timestamp: Option<String>,
    /// Optional free-text annotation (at most 500 characters).
    pub description: Option<String>,
}

/// A stored clock event as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockEventInfo {
    /// The canonical event identifier.
    pub event_id: i64,
    /// The punch type.
    pub punch_type: String,
    /// A human-readable label for the punch type.
    pub punch_type_label: String,
    /// The instant of the punch (ISO 8601, UTC).
    pub timestamp: String,
    /// The free-text annotation, if any.
    pub description: Option<String>,
    /// When the event was recorded (ISO 8601, UTC).
    pub created_at: String,
}

/// Listing filter shared by the flat listing and the summary.
///
/// Dates are inclusive `YYYY-MM-DD` bounds interpreted in UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchFilter {
    /// Inclusive start date.
    pub start_date: Option<String>,
    /// Inclusive end date.
    pub end_date: Option<String>,
    /// Restrict to a single punch type (flat listing only).
    pub punch_type: Option<String>,
    /// The one-based page number.
    #[serde(default = "default_page")]
    pub page: i64,
    /// The page size (at most 100).
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

const fn default_page() -> i64 {
    1
}

const fn default_page_size() -> i64 {
    10
}

impl Default for PunchFilter {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            punch_type: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// Pagination-only query for account listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// The one-based page number.
    #[serde(default = "default_page")]
    pub page: i64,
    /// The page size (at most 100).
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

/// Derived summary of one day's punches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummaryInfo {
    /// The UTC calendar date (`YYYY-MM-DD`).
    pub date: String,
    /// The day's events, ascending by timestamp.
    pub records: Vec<ClockEventInfo>,
    /// Total worked time as `HH:MM:SS`, or `None` when the day has
    /// fewer than two events.
    pub total_worked_time: Option<String>,
    /// Whether the day ends with a clock-out.
    pub is_complete: bool,
}
