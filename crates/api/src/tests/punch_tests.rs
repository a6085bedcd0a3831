// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for punch recording, retrieval, and deletion.

use time::Duration;
use time::macros::datetime;
use timeclock_persistence::Persistence;

use crate::error::ApiError;
use crate::handlers;
use crate::request_response::{ClockEventInfo, CreatePunchRequest};
use crate::tests::helpers::{
    authenticated, punch_at, punch_request, register_user, test_now, test_persistence, test_today,
};

#[test]
fn test_clock_in_records_event() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    let info: ClockEventInfo =
        handlers::create_punch(&mut persistence, &user, &punch_request("ClockIn", None), test_now())
            .expect("Clock in should succeed");

    assert!(info.event_id > 0);
    assert_eq!(info.punch_type, "ClockIn");
    assert_eq!(info.punch_type_label, "Clock in");
    assert!(info.description.is_none());
}

#[test]
fn test_full_day_punch_sequence() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    let start = datetime!(2026-03-10 09:00:00 UTC);
    punch_at(&mut persistence, &user, "ClockIn", start);
    punch_at(&mut persistence, &user, "BreakStart", start + Duration::hours(3));
    punch_at(&mut persistence, &user, "BreakEnd", start + Duration::hours(4));
    punch_at(&mut persistence, &user, "ClockOut", start + Duration::hours(8));

    let today = handlers::list_today(&mut persistence, &user, test_today())
        .expect("Listing today should succeed");
    assert_eq!(today.len(), 4);
    assert_eq!(today[0].punch_type, "ClockIn");
    assert_eq!(today[3].punch_type, "ClockOut");
}

#[test]
fn test_double_clock_in_rejected() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    punch_at(&mut persistence, &user, "ClockIn", test_now());

    let result = handlers::create_punch(
        &mut persistence,
        &user,
        &punch_request("ClockIn", None),
        test_now() + Duration::hours(1),
    );

    match result {
        Err(ApiError::DomainRuleViolation { rule, .. }) => {
            assert_eq!(rule, "punch_sequence");
        }
        other => panic!("Expected punch_sequence violation, got {other:?}"),
    }
}

#[test]
fn test_clock_out_without_clock_in_rejected() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    let result = handlers::create_punch(
        &mut persistence,
        &user,
        &punch_request("ClockOut", None),
        test_now(),
    );

    match result {
        Err(ApiError::DomainRuleViolation { rule, message }) => {
            assert_eq!(rule, "punch_sequence");
            assert_eq!(message, "Cannot clock out: must clock in first");
        }
        other => panic!("Expected punch_sequence violation, got {other:?}"),
    }
}

#[test]
fn test_sequence_resets_across_days() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    // Left clocked in yesterday; a clock-out today is still rejected
    // because each day is validated independently.
    punch_at(&mut persistence, &user, "ClockIn", datetime!(2026-03-09 22:00:00 UTC));

    let result = handlers::create_punch(
        &mut persistence,
        &user,
        &punch_request("ClockOut", None),
        test_now(),
    );

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { .. })
    ));
}

#[test]
fn test_duplicate_punch_within_window_rejected() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    punch_at(&mut persistence, &user, "ClockIn", test_now());

    let result = handlers::create_punch(
        &mut persistence,
        &user,
        &punch_request("ClockOut", None),
        test_now() + Duration::seconds(59),
    );

    match result {
        Err(ApiError::DomainRuleViolation { rule, .. }) => {
            assert_eq!(rule, "duplicate_punch");
        }
        other => panic!("Expected duplicate_punch violation, got {other:?}"),
    }
}

#[test]
fn test_punch_exactly_at_window_boundary_accepted() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    punch_at(&mut persistence, &user, "ClockIn", test_now());
    punch_at(&mut persistence, &user, "ClockOut", test_now() + Duration::seconds(60));
}

#[test]
fn test_invalid_punch_type_rejected() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    let result = handlers::create_punch(
        &mut persistence,
        &user,
        &punch_request("LunchBreak", None),
        test_now(),
    );

    match result {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "punch_type"),
        other => panic!("Expected invalid input, got {other:?}"),
    }
}

#[test]
fn test_client_timestamp_honored() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    let info: ClockEventInfo = handlers::create_punch(
        &mut persistence,
        &user,
        &punch_request("ClockIn", Some("2026-03-10T09:30:00Z")),
        test_now(),
    )
    .expect("Backdated punch within the window should succeed");

    assert!(info.timestamp.starts_with("2026-03-10T09:30:00"));
}

#[test]
fn test_malformed_client_timestamp_rejected() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    let result = handlers::create_punch(
        &mut persistence,
        &user,
        &punch_request("ClockIn", Some("10/03/2026 09:30")),
        test_now(),
    );

    match result {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "timestamp"),
        other => panic!("Expected invalid input, got {other:?}"),
    }
}

#[test]
fn test_client_timestamp_too_far_in_future_rejected() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    let result = handlers::create_punch(
        &mut persistence,
        &user,
        &punch_request("ClockIn", Some("2026-03-10T13:00:00Z")),
        test_now(),
    );

    match result {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "timestamp"),
        other => panic!("Expected invalid input, got {other:?}"),
    }
}

#[test]
fn test_client_timestamp_older_than_seven_days_rejected() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    let result = handlers::create_punch(
        &mut persistence,
        &user,
        &punch_request("ClockIn", Some("2026-03-01T12:00:00Z")),
        test_now(),
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { field, .. }) if field == "timestamp"));
}

#[test]
fn test_description_stored_and_returned() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    let request: CreatePunchRequest = CreatePunchRequest {
        punch_type: String::from("ClockIn"),
        timestamp: None,
        description: Some(String::from("Working from the office")),
    };

    let info: ClockEventInfo =
        handlers::create_punch(&mut persistence, &user, &request, test_now())
            .expect("Punch with description should succeed");

    assert_eq!(info.description.as_deref(), Some("Working from the office"));
}

#[test]
fn test_overlong_description_rejected() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    let request: CreatePunchRequest = CreatePunchRequest {
        punch_type: String::from("ClockIn"),
        timestamp: None,
        description: Some("x".repeat(501)),
    };

    let result = handlers::create_punch(&mut persistence, &user, &request, test_now());

    match result {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, "description"),
        other => panic!("Expected invalid input, got {other:?}"),
    }
}

#[test]
fn test_get_punch_returns_own_event() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    let created = punch_at(&mut persistence, &user, "ClockIn", test_now());

    let fetched = handlers::get_punch(&mut persistence, &user, created.event_id)
        .expect("Fetching own punch should succeed");
    assert_eq!(fetched, created);
}

#[test]
fn test_get_punch_unknown_id_not_found() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    let result = handlers::get_punch(&mut persistence, &user, 9999);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_get_punch_owned_by_other_user_not_found() {
    let mut persistence: Persistence = test_persistence();
    let alice = authenticated(&register_user(&mut persistence, "alice@example.com"));
    let bob = authenticated(&register_user(&mut persistence, "bob@example.com"));

    let created = punch_at(&mut persistence, &alice, "ClockIn", test_now());

    let result = handlers::get_punch(&mut persistence, &bob, created.event_id);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_delete_punch_removes_event() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    let created = punch_at(&mut persistence, &user, "ClockIn", test_now());

    handlers::delete_punch(&mut persistence, &user, created.event_id)
        .expect("Deleting own punch should succeed");

    let result = handlers::get_punch(&mut persistence, &user, created.event_id);
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_delete_punch_owned_by_other_user_not_found() {
    let mut persistence: Persistence = test_persistence();
    let alice = authenticated(&register_user(&mut persistence, "alice@example.com"));
    let bob = authenticated(&register_user(&mut persistence, "bob@example.com"));

    let created = punch_at(&mut persistence, &alice, "ClockIn", test_now());

    let result = handlers::delete_punch(&mut persistence, &bob, created.event_id);
    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));

    // Alice's punch is untouched.
    handlers::get_punch(&mut persistence, &alice, created.event_id)
        .expect("Original punch should survive");
}

#[test]
fn test_list_today_is_ascending_and_scoped_to_today() {
    let mut persistence: Persistence = test_persistence();
    let profile = register_user(&mut persistence, "alice@example.com");
    let user = authenticated(&profile);

    punch_at(&mut persistence, &user, "ClockIn", datetime!(2026-03-09 09:00:00 UTC));
    punch_at(&mut persistence, &user, "ClockOut", datetime!(2026-03-09 17:00:00 UTC));
    punch_at(&mut persistence, &user, "ClockIn", datetime!(2026-03-10 08:30:00 UTC));
    punch_at(&mut persistence, &user, "BreakStart", datetime!(2026-03-10 12:00:00 UTC));

    let today = handlers::list_today(&mut persistence, &user, test_today())
        .expect("Listing today should succeed");

    assert_eq!(today.len(), 2);
    assert_eq!(today[0].punch_type, "ClockIn");
    assert_eq!(today[1].punch_type, "BreakStart");
    assert!(today[0].timestamp < today[1].timestamp);
}
