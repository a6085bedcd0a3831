// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` persistence layer for the Timeclock system.
//!
//! This crate stores user accounts, sessions, and the clock event log.
//! It is built on Diesel with embedded migrations; in-memory databases
//! are used for tests and file-backed databases (with WAL enabled) for
//! deployments.
//!
//! All instants are stored as ISO 8601 text in UTC. Each clock event
//! additionally carries a denormalized `day_bucket` date column so
//! day-scoped validation and summary queries can filter on an indexed
//! column instead of parsing timestamps.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::Date;
use timeclock_domain::{ClockEvent, UserId};

mod codec;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use codec::{format_timestamp, parse_timestamp};
pub use data_models::{EventFilter, SessionData, UserData};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique
/// sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for user accounts, sessions, and clock events.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        // Create a unique shared in-memory database name per call so tests are isolated.
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_test_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = sqlite::initialize_database(&shared_memory_url)?;

        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError(String::from("Invalid database path"))
        })?;

        let mut conn: SqliteConnection = sqlite::initialize_database(path_str)?;

        // Enable WAL mode for better read concurrency
        sqlite::enable_wal_mode(&mut conn)?;

        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Clock Events
    // ========================================================================

    /// Inserts a new clock event and returns the stored event with its
    /// assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_clock_event(&mut self, event: &ClockEvent) -> Result<ClockEvent, PersistenceError> {
        let event_id: i64 = mutations::clock_events::insert_clock_event(&mut self.conn, event)?;
        Ok(event.clone().with_id(event_id))
    }

    /// Retrieves a single clock event owned by the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Returns `Ok(None)` if no
    /// such event exists for this user.
    pub fn get_clock_event(
        &mut self,
        user_id: UserId,
        event_id: i64,
    ) -> Result<Option<ClockEvent>, PersistenceError> {
        queries::clock_events::get_clock_event(&mut self.conn, user_id, event_id)
    }

    /// Retrieves all of a user's events in a single UTC day bucket,
    /// ordered ascending by timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_events_for_day(
        &mut self,
        user_id: UserId,
        date: Date,
    ) -> Result<Vec<ClockEvent>, PersistenceError> {
        queries::clock_events::list_events_for_day(&mut self.conn, user_id, date)
    }

    /// Retrieves all of a user's events in an inclusive day range,
    /// ordered ascending by timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_events_between_days(
        &mut self,
        user_id: UserId,
        start_date: Date,
        end_date: Date,
    ) -> Result<Vec<ClockEvent>, PersistenceError> {
        queries::clock_events::list_events_between_days(&mut self.conn, user_id, start_date, end_date)
    }

    /// Retrieves one page of a user's events, most recent first, along
    /// with the total number of matching events.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_events_filtered(
        &mut self,
        user_id: UserId,
        filter: &EventFilter,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<ClockEvent>, i64), PersistenceError> {
        queries::clock_events::list_events_filtered(&mut self.conn, user_id, filter, page, page_size)
    }

    /// Deletes a clock event owned by the given user.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::EventNotFound` if no such event
    /// exists for this user.
    pub fn delete_clock_event(
        &mut self,
        user_id: UserId,
        event_id: i64,
    ) -> Result<(), PersistenceError> {
        mutations::clock_events::delete_clock_event(&mut self.conn, user_id.value(), event_id)
    }

    // ========================================================================
    // User Accounts
    // ========================================================================

    /// Creates a new user account and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if a uniqueness rule is violated or the insert
    /// fails.
    pub fn create_user(
        &mut self,
        email: &str,
        full_name: &str,
        employee_code: Option<&str>,
        password: &str,
        role: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_user(&mut self.conn, email, full_name, employee_code, password, role)
    }

    /// Retrieves a user by email address (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_email(&mut self, email: &str) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_email(&mut self.conn, email)
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Verifies a user's credentials.
    ///
    /// Unknown emails and wrong passwords produce the same error so the
    /// response does not reveal which accounts exist.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::InvalidCredentials` when the email or
    /// password does not match, or `PersistenceError::AccountInactive`
    /// when the account has been deactivated.
    pub fn authenticate_user(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<UserData, PersistenceError> {
        let Some(user) = queries::users::get_user_by_email(&mut self.conn, email)? else {
            return Err(PersistenceError::InvalidCredentials);
        };

        let password_matches: bool = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| PersistenceError::Other(format!("Failed to verify password: {e}")))?;

        if !password_matches {
            return Err(PersistenceError::InvalidCredentials);
        }

        if !user.is_active {
            return Err(PersistenceError::AccountInactive);
        }

        Ok(user)
    }

    /// Retrieves one page of user accounts, along with the total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_users(
        &mut self,
        page: i64,
        page_size: i64,
    ) -> Result<(Vec<UserData>, i64), PersistenceError> {
        queries::users::list_users(&mut self.conn, page, page_size)
    }

    /// Updates the last login timestamp for a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_last_login(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        mutations::users::update_last_login(&mut self.conn, user_id)
    }

    /// Deactivates a user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn deactivate_user(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        mutations::users::deactivate_user(&mut self.conn, user_id)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::users::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails. Returns `Ok(None)` if the
    /// session is not found.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::users::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::users::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token, returning whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<bool, PersistenceError> {
        mutations::users::delete_session(&mut self.conn, session_token)
    }
}
