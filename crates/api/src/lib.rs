// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Timeclock system.
//!
//! This crate translates transport-level requests into domain
//! operations and domain errors back into a stable API error contract.
//! It owns authentication, authorization, and the request/response
//! data transfer objects; it performs no HTTP handling of its own.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedUser, AuthenticationService, AuthorizationService, Role};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    create_punch, delete_punch, get_profile, get_punch, list_accounts, list_punches, list_summary,
    list_today, login, logout, register,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    ApiResponse, ClockEventInfo, CreatePunchRequest, DaySummaryInfo, ListQuery, LoginRequest,
    LoginResponse, PagedResponse, PunchFilter, RegisterRequest, UserProfile,
};
