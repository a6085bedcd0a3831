// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for punch recording, listings, and accounts.
//!
//! Every punch handler takes the authenticated user; the owning user
//! of a punch is never read from the request. Handlers receive the
//! current instant (or UTC today) from the caller so validation stays
//! deterministic under test.

use std::str::FromStr;
use time::{Date, Duration, OffsetDateTime};
use timeclock::{group_into_summaries, resolve_timestamp, validate_punch};
use timeclock_domain::{
    ClockEvent, DaySummary, Description, PunchType, day_bucket, validate_date_range,
    validate_page_bounds,
};
use timeclock_persistence::{EventFilter, Persistence, UserData};
use tracing::info;

use crate::auth::{AuthenticatedUser, AuthenticationService, AuthorizationService, Role};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    ClockEventInfo, CreatePunchRequest, DaySummaryInfo, ListQuery, LoginRequest, LoginResponse,
    PagedResponse, PunchFilter, RegisterRequest, UserProfile,
};

/// Maximum accepted length of a display name.
const MAX_FULL_NAME_LENGTH: usize = 100;

/// Default summary window when no start date is given, in days.
const DEFAULT_SUMMARY_WINDOW_DAYS: i64 = 30;

fn profile_from(user: &UserData) -> UserProfile {
    UserProfile {
        user_id: user.user_id,
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        employee_code: user.employee_code.clone(),
        role: user.role.clone(),
        is_active: user.is_active,
        created_at: user.created_at.clone(),
        last_login_at: user.last_login_at.clone(),
    }
}

fn event_info(event: &ClockEvent) -> Result<ClockEventInfo, ApiError> {
    let format_instant = |instant: OffsetDateTime| {
        timeclock_persistence::format_timestamp(instant).map_err(|e| ApiError::Internal {
            message: format!("Failed to format timestamp: {e}"),
        })
    };

    Ok(ClockEventInfo {
        event_id: event.event_id.ok_or_else(|| ApiError::Internal {
            message: String::from("Stored event has no identifier"),
        })?,
        punch_type: event.punch_type.as_str().to_string(),
        punch_type_label: event.punch_type.label().to_string(),
        timestamp: format_instant(event.timestamp)?,
        description: event
            .description
            .as_ref()
            .map(|d| d.value().to_string()),
        created_at: format_instant(event.created_at)?,
    })
}

fn parse_instant(value: &str, field: &str) -> Result<OffsetDateTime, ApiError> {
    OffsetDateTime::parse(value, &time::format_description::well_known::Iso8601::DEFAULT).map_err(
        |_| ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("'{value}' is not a valid ISO 8601 timestamp"),
        },
    )
}

fn parse_day(value: &str, field: &str) -> Result<Date, ApiError> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Date::parse(value, &format).map_err(|_| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("'{value}' is not a valid date (expected YYYY-MM-DD)"),
    })
}

fn format_day(date: Date) -> Result<String, ApiError> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    date.format(&format).map_err(|e| ApiError::Internal {
        message: format!("Failed to format date: {e}"),
    })
}

fn format_worked_time(duration: Duration) -> String {
    let total_seconds: i64 = duration.whole_seconds();
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

fn parse_filter_dates(
    filter: &PunchFilter,
    today: Date,
) -> Result<(Option<Date>, Option<Date>), ApiError> {
    let start_date: Option<Date> = filter
        .start_date
        .as_deref()
        .map(|value| parse_day(value, "start_date"))
        .transpose()?;
    let end_date: Option<Date> = filter
        .end_date
        .as_deref()
        .map(|value| parse_day(value, "end_date"))
        .transpose()?;

    validate_date_range(start_date, end_date, today).map_err(translate_domain_error)?;

    Ok((start_date, end_date))
}

// ============================================================================
// Accounts
// ============================================================================

/// Registers a new account.
///
/// New accounts always receive the Employee role; there is no
/// self-service path to Admin.
///
/// # Errors
///
/// Returns an error if a field is invalid, the password does not meet
/// policy, or the email or employee code is already registered.
pub fn register(
    persistence: &mut Persistence,
    request: &RegisterRequest,
) -> Result<UserProfile, ApiError> {
    let email: &str = request.email.trim();
    let (local, domain) = email.split_once('@').ok_or_else(|| ApiError::InvalidInput {
        field: String::from("email"),
        message: String::from("A valid email address is required"),
    })?;
    if local.is_empty() || domain.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("email"),
            message: String::from("A valid email address is required"),
        });
    }

    let full_name: &str = request.full_name.trim();
    if full_name.is_empty() || full_name.chars().count() > MAX_FULL_NAME_LENGTH {
        return Err(ApiError::InvalidInput {
            field: String::from("full_name"),
            message: format!("Name is required and must be at most {MAX_FULL_NAME_LENGTH} characters"),
        });
    }

    let employee_code: Option<&str> = match request.employee_code.as_deref().map(str::trim) {
        Some("") => {
            return Err(ApiError::InvalidInput {
                field: String::from("employee_code"),
                message: String::from("Employee code must not be empty when provided"),
            });
        }
        other => other,
    };

    PasswordPolicy::default().validate(&request.password, &request.confirm_password)?;

    let user_id: i64 = persistence
        .create_user(
            email,
            full_name,
            employee_code,
            &request.password,
            Role::Employee.as_str(),
        )
        .map_err(translate_persistence_error)?;

    info!(user_id, "Account registered");

    let user: UserData = persistence
        .get_user_by_id(user_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Newly created account could not be read back"),
        })?;

    Ok(profile_from(&user))
}

/// Logs a user in and opens a session.
///
/// # Errors
///
/// Returns an error if the credentials are invalid or the account is
/// inactive.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
) -> Result<LoginResponse, ApiError> {
    let (session_token, _, user) =
        AuthenticationService::login(persistence, &request.email, &request.password)?;

    info!(user_id = user.user_id, "User logged in");

    Ok(LoginResponse {
        session_token,
        user: profile_from(&user),
    })
}

/// Logs a user out by deleting the presented session.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(())
}

/// Returns the authenticated user's own profile.
///
/// # Errors
///
/// Returns an error if the account no longer exists.
pub fn get_profile(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
) -> Result<UserProfile, ApiError> {
    let data: UserData = persistence
        .get_user_by_id(user.user_id.value())
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: format!("User {} does not exist", user.user_id),
        })?;

    Ok(profile_from(&data))
}

/// Lists all accounts (Admin only).
///
/// # Errors
///
/// Returns an error if the user is not an Admin or the paging bounds
/// are invalid.
pub fn list_accounts(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    query: &ListQuery,
) -> Result<PagedResponse<UserProfile>, ApiError> {
    AuthorizationService::authorize_list_accounts(user)?;
    validate_page_bounds(query.page, query.page_size).map_err(translate_domain_error)?;

    let (accounts, total_count) = persistence
        .list_users(query.page, query.page_size)
        .map_err(translate_persistence_error)?;

    let profiles: Vec<UserProfile> = accounts.iter().map(profile_from).collect();

    Ok(PagedResponse::new(
        profiles,
        total_count,
        query.page,
        query.page_size,
    ))
}

// ============================================================================
// Punches
// ============================================================================

/// Records a new punch for the authenticated user.
///
/// The caller must hold exclusive access to the persistence layer for
/// the whole call so the sequence check and the insert are atomic with
/// respect to other punches by the same user.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `user` - The authenticated user; the punch is recorded for them
/// * `request` - The punch request
/// * `now` - The server's current instant
///
/// # Errors
///
/// Returns an error if the punch type or timestamp is invalid, or the
/// punch violates the day's sequencing or duplicate rules.
pub fn create_punch(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    request: &CreatePunchRequest,
    now: OffsetDateTime,
) -> Result<ClockEventInfo, ApiError> {
    let punch_type: PunchType =
        PunchType::from_str(&request.punch_type).map_err(translate_domain_error)?;

    let description: Option<Description> = request
        .description
        .as_deref()
        .map(|text| Description::new(text).map_err(translate_domain_error))
        .transpose()?;

    let client_timestamp: Option<OffsetDateTime> = request
        .timestamp
        .as_deref()
        .map(|value| parse_instant(value, "timestamp"))
        .transpose()?;

    let timestamp: OffsetDateTime =
        resolve_timestamp(client_timestamp, now).map_err(translate_core_error)?;

    let day_events: Vec<ClockEvent> = persistence
        .list_events_for_day(user.user_id, day_bucket(timestamp))
        .map_err(translate_persistence_error)?;

    validate_punch(&day_events, punch_type, timestamp).map_err(translate_core_error)?;

    let event: ClockEvent = ClockEvent::new(user.user_id, timestamp, punch_type, description, now);
    let stored: ClockEvent = persistence
        .insert_clock_event(&event)
        .map_err(translate_persistence_error)?;

    event_info(&stored)
}

/// Retrieves a single punch owned by the authenticated user.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the event does not exist or
/// belongs to another user.
pub fn get_punch(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    event_id: i64,
) -> Result<ClockEventInfo, ApiError> {
    let event: ClockEvent = persistence
        .get_clock_event(user.user_id, event_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Clock event"),
            message: format!("Clock event {event_id} does not exist"),
        })?;

    event_info(&event)
}

/// Deletes a punch owned by the authenticated user.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the event does not exist or
/// belongs to another user.
pub fn delete_punch(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    event_id: i64,
) -> Result<(), ApiError> {
    persistence
        .delete_clock_event(user.user_id, event_id)
        .map_err(translate_persistence_error)?;

    info!(event_id, user_id = user.user_id.value(), "Punch deleted");
    Ok(())
}

/// Lists the authenticated user's punches, most recent first.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `user` - The authenticated user
/// * `filter` - Date-range, punch-type, and paging filters
/// * `today` - The server's current UTC date
///
/// # Errors
///
/// Returns an error if the filter is invalid.
pub fn list_punches(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    filter: &PunchFilter,
    today: Date,
) -> Result<PagedResponse<ClockEventInfo>, ApiError> {
    validate_page_bounds(filter.page, filter.page_size).map_err(translate_domain_error)?;
    let (start_date, end_date) = parse_filter_dates(filter, today)?;

    let punch_type: Option<PunchType> = filter
        .punch_type
        .as_deref()
        .map(|value| PunchType::from_str(value).map_err(translate_domain_error))
        .transpose()?;

    let event_filter: EventFilter = EventFilter {
        start_date,
        end_date,
        punch_type,
    };

    let (events, total_count) = persistence
        .list_events_filtered(user.user_id, &event_filter, filter.page, filter.page_size)
        .map_err(translate_persistence_error)?;

    let infos: Vec<ClockEventInfo> = events
        .iter()
        .map(event_info)
        .collect::<Result<Vec<ClockEventInfo>, ApiError>>()?;

    Ok(PagedResponse::new(
        infos,
        total_count,
        filter.page,
        filter.page_size,
    ))
}

/// Lists per-day summaries of the authenticated user's punches, most
/// recent day first.
///
/// Without an explicit range the window defaults to the last 30 days
/// ending today. Pagination applies to days, not individual punches.
///
/// # Errors
///
/// Returns an error if the filter is invalid.
pub fn list_summary(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    filter: &PunchFilter,
    today: Date,
) -> Result<PagedResponse<DaySummaryInfo>, ApiError> {
    validate_page_bounds(filter.page, filter.page_size).map_err(translate_domain_error)?;
    let (start_date, end_date) = parse_filter_dates(filter, today)?;

    let start: Date = start_date.unwrap_or(today - Duration::days(DEFAULT_SUMMARY_WINDOW_DAYS));
    let end: Date = end_date.unwrap_or(today);

    let events: Vec<ClockEvent> = persistence
        .list_events_between_days(user.user_id, start, end)
        .map_err(translate_persistence_error)?;

    let summaries: Vec<DaySummary> = group_into_summaries(events);
    let total_count: i64 = i64::try_from(summaries.len()).map_err(|_| ApiError::Internal {
        message: String::from("Summary count out of range"),
    })?;

    let offset: usize = usize::try_from((filter.page - 1).saturating_mul(filter.page_size))
        .map_err(|_| ApiError::Internal {
            message: String::from("Page offset out of range"),
        })?;
    let page_size: usize = usize::try_from(filter.page_size).map_err(|_| ApiError::Internal {
        message: String::from("Page size out of range"),
    })?;

    let page: Vec<DaySummaryInfo> = summaries
        .into_iter()
        .skip(offset)
        .take(page_size)
        .map(|summary| {
            Ok(DaySummaryInfo {
                date: format_day(summary.date)?,
                records: summary
                    .records
                    .iter()
                    .map(event_info)
                    .collect::<Result<Vec<ClockEventInfo>, ApiError>>()?,
                total_worked_time: summary.total_worked_time.map(format_worked_time),
                is_complete: summary.is_complete,
            })
        })
        .collect::<Result<Vec<DaySummaryInfo>, ApiError>>()?;

    Ok(PagedResponse::new(
        page,
        total_count,
        filter.page,
        filter.page_size,
    ))
}

/// Lists all of the authenticated user's punches for the current UTC
/// day, ascending and unpaginated.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_today(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    today: Date,
) -> Result<Vec<ClockEventInfo>, ApiError> {
    let events: Vec<ClockEvent> = persistence
        .list_events_for_day(user.user_id, today)
        .map_err(translate_persistence_error)?;

    events.iter().map(event_info).collect()
}
