// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User account and session mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::diesel_schema::{sessions, users};
use crate::error::PersistenceError;
use crate::queries;
use crate::sqlite;

/// Creates a new user account.
///
/// The email is normalized to lowercase for case-insensitive
/// uniqueness; the password is hashed with bcrypt before storage.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `email` - The email address (will be normalized)
/// * `full_name` - The user's display name
/// * `employee_code` - Optional unique employee code
/// * `password` - The plain-text password (will be hashed)
/// * `role` - The role (Admin or Employee)
///
/// # Errors
///
/// Returns `PersistenceError::EmailAlreadyRegistered` or
/// `PersistenceError::EmployeeCodeAlreadyRegistered` when a uniqueness
/// rule is violated, or a database error if the insert fails.
pub fn create_user(
    conn: &mut SqliteConnection,
    email: &str,
    full_name: &str,
    employee_code: Option<&str>,
    password: &str,
    role: &str,
) -> Result<i64, PersistenceError> {
    let normalized_email: String = email.to_lowercase();

    info!(
        "Creating user with email: {}, full_name: {}, role: {}",
        normalized_email, full_name, role
    );

    if queries::users::get_user_by_email(conn, &normalized_email)?.is_some() {
        return Err(PersistenceError::EmailAlreadyRegistered(normalized_email));
    }

    if let Some(code) = employee_code
        && queries::users::employee_code_exists(conn, code)?
    {
        return Err(PersistenceError::EmployeeCodeAlreadyRegistered(
            code.to_string(),
        ));
    }

    // Hash the password using bcrypt
    let password_hash: String = bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| PersistenceError::Other(format!("Failed to hash password: {e}")))?;

    diesel::insert_into(users::table)
        .values((
            users::email.eq(&normalized_email),
            users::full_name.eq(full_name),
            users::employee_code.eq(employee_code),
            users::password_hash.eq(&password_hash),
            users::role.eq(role),
        ))
        .execute(conn)?;

    let user_id: i64 = sqlite::get_last_insert_rowid(conn)?;

    info!(user_id, "User created successfully");
    Ok(user_id)
}

/// Updates the last login timestamp for a user.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_last_login(conn: &mut SqliteConnection, user_id: i64) -> Result<(), PersistenceError> {
    debug!("Updating last_login_at for user ID: {}", user_id);

    diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::last_login_at.eq(diesel::dsl::sql::<
            diesel::sql_types::Nullable<diesel::sql_types::Text>,
        >("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(())
}

/// Deactivates a user account.
///
/// Deactivated accounts keep their history but can no longer log in.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn deactivate_user(conn: &mut SqliteConnection, user_id: i64) -> Result<(), PersistenceError> {
    info!("Deactivating user ID: {}", user_id);

    diesel::update(users::table)
        .filter(users::user_id.eq(user_id))
        .set(users::is_active.eq(0))
        .execute(conn)?;

    Ok(())
}

/// Creates a new session.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `session_token` - The opaque session token
/// * `user_id` - The user the session belongs to
/// * `expires_at` - The expiration instant, as stored text
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_session(
    conn: &mut SqliteConnection,
    session_token: &str,
    user_id: i64,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    debug!(
        "Creating session for user ID: {} with expiration: {}",
        user_id, expires_at
    );

    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::user_id.eq(user_id),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = sqlite::get_last_insert_rowid(conn)?;

    debug!(session_id, user_id, "Session created");
    Ok(session_id)
}

/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<(), PersistenceError> {
    debug!("Updating last_activity_at for session ID: {}", session_id);

    diesel::update(sessions::table)
        .filter(sessions::session_id.eq(session_id))
        .set(
            sessions::last_activity_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        )
        .execute(conn)?;

    Ok(())
}

/// Deletes a session by token.
///
/// This is used for logout operations.
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_session(
    conn: &mut SqliteConnection,
    session_token: &str,
) -> Result<bool, PersistenceError> {
    debug!("Deleting session by token");

    let deleted: usize = diesel::delete(
        sessions::table.filter(sessions::session_token.eq(session_token)),
    )
    .execute(conn)?;

    Ok(deleted > 0)
}
