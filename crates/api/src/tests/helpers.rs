// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for API tests.

use time::macros::datetime;
use time::{Date, OffsetDateTime};
use timeclock_domain::UserId;
use timeclock_persistence::Persistence;

use crate::auth::{AuthenticatedUser, Role};
use crate::handlers;
use crate::request_response::{CreatePunchRequest, RegisterRequest, UserProfile};

pub const TEST_PASSWORD: &str = "Passw0rd";

pub fn test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory database")
}

/// A fixed midday instant so punches never straddle a day boundary.
pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-10 12:00:00 UTC)
}

pub fn test_today() -> Date {
    test_now().date()
}

pub fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: String::from(email),
        full_name: String::from("Alice Example"),
        employee_code: None,
        password: String::from(TEST_PASSWORD),
        confirm_password: String::from(TEST_PASSWORD),
    }
}

pub fn register_user(persistence: &mut Persistence, email: &str) -> UserProfile {
    handlers::register(persistence, &register_request(email)).expect("Failed to register user")
}

pub fn authenticated(profile: &UserProfile) -> AuthenticatedUser {
    AuthenticatedUser::new(
        UserId::new(profile.user_id),
        profile.email.clone(),
        Role::Employee,
    )
}

pub fn admin(profile: &UserProfile) -> AuthenticatedUser {
    AuthenticatedUser::new(
        UserId::new(profile.user_id),
        profile.email.clone(),
        Role::Admin,
    )
}

pub fn punch_request(punch_type: &str, timestamp: Option<&str>) -> CreatePunchRequest {
    CreatePunchRequest {
        punch_type: String::from(punch_type),
        timestamp: timestamp.map(String::from),
        description: None,
    }
}

/// Records a punch at an explicit instant, using that instant as the
/// server clock so the client-timestamp window always accepts it.
pub fn punch_at(
    persistence: &mut Persistence,
    user: &AuthenticatedUser,
    punch_type: &str,
    at: OffsetDateTime,
) -> crate::request_response::ClockEventInfo {
    handlers::create_punch(persistence, user, &punch_request(punch_type, None), at)
        .expect("Failed to record punch")
}
