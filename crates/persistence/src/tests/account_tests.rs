// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::create_test_persistence;
use crate::{Persistence, PersistenceError, SessionData, UserData};

#[test]
fn test_create_user_normalizes_email() {
    let mut persistence: Persistence = create_test_persistence();

    persistence
        .create_user("Worker@Example.COM", "Worker", None, "Passw0rd", "Employee")
        .unwrap();

    let user: UserData = persistence
        .get_user_by_email("worker@example.com")
        .unwrap()
        .expect("User should exist");
    assert_eq!(user.email, "worker@example.com");
    assert!(user.is_active);
}

#[test]
fn test_create_user_rejects_duplicate_email_case_insensitive() {
    let mut persistence: Persistence = create_test_persistence();

    persistence
        .create_user("worker@example.com", "Worker", None, "Passw0rd", "Employee")
        .unwrap();

    let result: Result<i64, PersistenceError> =
        persistence.create_user("WORKER@example.com", "Other", None, "Passw0rd", "Employee");
    assert!(matches!(
        result,
        Err(PersistenceError::EmailAlreadyRegistered(_))
    ));
}

#[test]
fn test_create_user_rejects_duplicate_employee_code() {
    let mut persistence: Persistence = create_test_persistence();

    persistence
        .create_user(
            "first@example.com",
            "First",
            Some("EMP-001"),
            "Passw0rd",
            "Employee",
        )
        .unwrap();

    let result: Result<i64, PersistenceError> = persistence.create_user(
        "second@example.com",
        "Second",
        Some("EMP-001"),
        "Passw0rd",
        "Employee",
    );
    assert!(matches!(
        result,
        Err(PersistenceError::EmployeeCodeAlreadyRegistered(_))
    ));
}

#[test]
fn test_password_is_stored_hashed() {
    let mut persistence: Persistence = create_test_persistence();

    persistence
        .create_user("worker@example.com", "Worker", None, "Passw0rd", "Employee")
        .unwrap();

    let user: UserData = persistence
        .get_user_by_email("worker@example.com")
        .unwrap()
        .expect("User should exist");
    assert_ne!(user.password_hash, "Passw0rd");
    assert!(user.password_hash.starts_with("$2"));
}

#[test]
fn test_authenticate_accepts_valid_credentials() {
    let mut persistence: Persistence = create_test_persistence();

    persistence
        .create_user("worker@example.com", "Worker", None, "Passw0rd", "Employee")
        .unwrap();

    let user: UserData = persistence
        .authenticate_user("Worker@Example.com", "Passw0rd")
        .unwrap();
    assert_eq!(user.email, "worker@example.com");
}

#[test]
fn test_authenticate_rejects_wrong_password_and_unknown_email_alike() {
    let mut persistence: Persistence = create_test_persistence();

    persistence
        .create_user("worker@example.com", "Worker", None, "Passw0rd", "Employee")
        .unwrap();

    let wrong_password: Result<UserData, PersistenceError> =
        persistence.authenticate_user("worker@example.com", "wrong");
    let unknown_email: Result<UserData, PersistenceError> =
        persistence.authenticate_user("nobody@example.com", "Passw0rd");

    assert!(matches!(
        wrong_password,
        Err(PersistenceError::InvalidCredentials)
    ));
    assert!(matches!(
        unknown_email,
        Err(PersistenceError::InvalidCredentials)
    ));
}

#[test]
fn test_authenticate_rejects_deactivated_account() {
    let mut persistence: Persistence = create_test_persistence();

    let user_id: i64 = persistence
        .create_user("worker@example.com", "Worker", None, "Passw0rd", "Employee")
        .unwrap();
    persistence.deactivate_user(user_id).unwrap();

    let result: Result<UserData, PersistenceError> =
        persistence.authenticate_user("worker@example.com", "Passw0rd");
    assert!(matches!(result, Err(PersistenceError::AccountInactive)));
}

#[test]
fn test_list_users_pages_with_total() {
    let mut persistence: Persistence = create_test_persistence();

    for i in 0..5 {
        persistence
            .create_user(
                &format!("user{i}@example.com"),
                &format!("User {i}"),
                None,
                "Passw0rd",
                "Employee",
            )
            .unwrap();
    }

    let (page_one, total): (Vec<UserData>, i64) = persistence.list_users(1, 2).unwrap();
    assert_eq!(total, 5);
    assert_eq!(page_one.len(), 2);

    let (page_three, _): (Vec<UserData>, i64) = persistence.list_users(3, 2).unwrap();
    assert_eq!(page_three.len(), 1);
}

#[test]
fn test_session_lifecycle() {
    let mut persistence: Persistence = create_test_persistence();

    let user_id: i64 = persistence
        .create_user("worker@example.com", "Worker", None, "Passw0rd", "Employee")
        .unwrap();

    let session_id: i64 = persistence
        .create_session("session_token_abc", user_id, "2026-12-31T23:59:59Z")
        .unwrap();

    let session: SessionData = persistence
        .get_session_by_token("session_token_abc")
        .unwrap()
        .expect("Session should exist");
    assert_eq!(session.session_id, session_id);
    assert_eq!(session.user_id, user_id);

    persistence.update_session_activity(session_id).unwrap();

    assert!(persistence.delete_session("session_token_abc").unwrap());
    assert!(
        persistence
            .get_session_by_token("session_token_abc")
            .unwrap()
            .is_none()
    );
    assert!(!persistence.delete_session("session_token_abc").unwrap());
}
