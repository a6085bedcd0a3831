// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use time::{Duration, OffsetDateTime};
use timeclock_domain::UserId;
use timeclock_persistence::{Persistence, SessionData, UserData, format_timestamp, parse_timestamp};

use crate::error::AuthError;

/// User roles for authorization.
///
/// Every account can record and view its own punches; the role only
/// gates administrative surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: may list all user accounts.
    Admin,
    /// Employee role: may manage only their own punches and profile.
    Employee,
}

impl Role {
    /// Converts this role to its stored string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Employee => "Employee",
        }
    }
}

/// An authenticated user with an associated role.
///
/// Every punch operation is scoped to `user_id`; handlers never accept
/// a user identifier from the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The canonical user identifier.
    pub user_id: UserId,
    /// The user's email address.
    pub email: String,
    /// The role assigned to this user.
    pub role: Role,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    #[must_use]
    pub const fn new(user_id: UserId, email: String, role: Role) -> Self {
        Self {
            user_id,
            email,
            role,
        }
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if a user is authorized to list all accounts.
    ///
    /// Only Admin users may list accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not have the Admin role.
    pub fn authorize_list_accounts(user: &AuthenticatedUser) -> Result<(), AuthError> {
        match user.role {
            Role::Admin => Ok(()),
            Role::Employee => Err(AuthError::Unauthorized {
                action: String::from("list_accounts"),
                required_role: String::from("Admin"),
            }),
        }
    }
}

/// Authentication service for session-based authentication.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Default session expiration duration (8 hours).
    const DEFAULT_SESSION_EXPIRATION: Duration = Duration::hours(8);

    /// Authenticates a user by credentials and creates a session.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `email` - The account email address
    /// * `password` - The plain-text password
    ///
    /// # Returns
    ///
    /// A tuple of (`session_token`, `authenticated_user`, `user_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are invalid or the account
    /// is inactive. Unknown emails and wrong passwords produce the same
    /// message.
    pub fn login(
        persistence: &mut Persistence,
        email: &str,
        password: &str,
    ) -> Result<(String, AuthenticatedUser, UserData), AuthError> {
        let user: UserData = persistence
            .authenticate_user(email, password)
            .map_err(|e| match e {
                timeclock_persistence::PersistenceError::InvalidCredentials => {
                    AuthError::AuthenticationFailed {
                        reason: String::from("Invalid email or password"),
                    }
                }
                timeclock_persistence::PersistenceError::AccountInactive => {
                    AuthError::AuthenticationFailed {
                        reason: String::from("Account is inactive"),
                    }
                }
                _ => AuthError::Internal {
                    message: format!("Credential lookup failed: {e}"),
                },
            })?;

        let role: Role = Self::parse_role(&user.role)?;

        // Generate session token
        let session_token: String = Self::generate_session_token();

        // Calculate expiration time
        let expires_at: OffsetDateTime =
            OffsetDateTime::now_utc() + Self::DEFAULT_SESSION_EXPIRATION;
        let expires_at_str: String =
            format_timestamp(expires_at).map_err(|e| AuthError::Internal {
                message: format!("Failed to format expiration time: {e}"),
            })?;

        // Create session
        persistence
            .create_session(&session_token, user.user_id, &expires_at_str)
            .map_err(|e| AuthError::Internal {
                message: format!("Failed to create session: {e}"),
            })?;

        // Update last login timestamp
        persistence
            .update_last_login(user.user_id)
            .map_err(|e| AuthError::Internal {
                message: format!("Failed to update last login: {e}"),
            })?;

        let authenticated_user: AuthenticatedUser =
            AuthenticatedUser::new(UserId::new(user.user_id), user.email.clone(), role);

        Ok((session_token, authenticated_user, user))
    }

    /// Validates a session token and returns the authenticated user.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `session_token` - The session token to validate
    ///
    /// # Returns
    ///
    /// A tuple of (`authenticated_user`, `user_data`)
    ///
    /// # Errors
    ///
    /// Returns an error if the session is invalid or expired, or the
    /// account has been deactivated since login.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<(AuthenticatedUser, UserData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(|e| AuthError::Internal {
                message: format!("Session lookup failed: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        // Check if session is expired
        let expires_at: OffsetDateTime =
            parse_timestamp(&session.expires_at).map_err(|e| AuthError::Internal {
                message: format!("Failed to parse session expiration: {e}"),
            })?;

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        // Retrieve user
        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(|e| AuthError::Internal {
                message: format!("User lookup failed: {e}"),
            })?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            })?;

        if !user.is_active {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Account is inactive"),
            });
        }

        let role: Role = Self::parse_role(&user.role)?;

        // Update session activity
        persistence
            .update_session_activity(session.session_id)
            .map_err(|e| AuthError::Internal {
                message: format!("Failed to update session activity: {e}"),
            })?;

        let authenticated_user: AuthenticatedUser =
            AuthenticatedUser::new(UserId::new(user.user_id), user.email.clone(), role);

        Ok((authenticated_user, user))
    }

    /// Logs out by deleting the session.
    ///
    /// Deleting an unknown token is not an error; logout is idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::Internal {
                message: format!("Failed to delete session: {e}"),
            })?;

        Ok(())
    }

    /// Parses a stored role string.
    fn parse_role(role: &str) -> Result<Role, AuthError> {
        match role {
            "Admin" => Ok(Role::Admin),
            "Employee" => Ok(Role::Employee),
            other => Err(AuthError::Internal {
                message: format!("Unrecognized stored role: {other}"),
            }),
        }
    }

    /// Generates an opaque session token from the current instant and a
    /// random component.
    fn generate_session_token() -> String {
        use std::time::{SystemTime, UNIX_EPOCH};
        let timestamp: u128 = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("Time went backwards")
            .as_nanos();
        format!("session_{timestamp}_{}", rand::random::<u64>())
    }
}
