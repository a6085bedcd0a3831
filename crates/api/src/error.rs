// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::password_policy::PasswordPolicyError;
use timeclock::CoreError;
use timeclock_domain::DomainError;
use timeclock_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// The session or credential store failed.
    Internal {
        /// A description of the underlying failure.
        message: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the user does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Password policy violation.
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::PasswordPolicyViolation { message } => {
                write!(f, "Password policy violation: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
            AuthError::Internal { message } => Self::Internal { message },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::AlreadyClockedIn
        | DomainError::MustClockInFirst
        | DomainError::MustBeClockedInForBreak
        | DomainError::MustStartBreakFirst => ApiError::DomainRuleViolation {
            rule: String::from("punch_sequence"),
            message: err.to_string(),
        },
        DomainError::DuplicatePunch { .. } => ApiError::DomainRuleViolation {
            rule: String::from("duplicate_punch"),
            message: err.to_string(),
        },
        DomainError::InvalidPunchType(value) => ApiError::InvalidInput {
            field: String::from("punch_type"),
            message: format!(
                "Invalid punch type: '{value}'. Must be one of ClockIn, ClockOut, BreakStart, BreakEnd"
            ),
        },
        DomainError::DescriptionTooLong { .. } => ApiError::InvalidInput {
            field: String::from("description"),
            message: err.to_string(),
        },
        DomainError::TimestampOutOfRange { .. } => ApiError::InvalidInput {
            field: String::from("timestamp"),
            message: err.to_string(),
        },
        DomainError::InvalidPage { .. } => ApiError::InvalidInput {
            field: String::from("page"),
            message: err.to_string(),
        },
        DomainError::InvalidPageSize { .. } => ApiError::InvalidInput {
            field: String::from("page_size"),
            message: err.to_string(),
        },
        DomainError::InvalidDateRange { .. } => ApiError::InvalidInput {
            field: String::from("date_range"),
            message: err.to_string(),
        },
        DomainError::DateInFuture { .. } => ApiError::InvalidInput {
            field: String::from("date"),
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// Uniqueness violations surface as domain rule violations; credential
/// failures surface as authentication failures with uniform wording.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::EmailAlreadyRegistered(_) => ApiError::DomainRuleViolation {
            rule: String::from("unique_email"),
            message: String::from("Email is already registered"),
        },
        PersistenceError::EmployeeCodeAlreadyRegistered(_) => ApiError::DomainRuleViolation {
            rule: String::from("unique_employee_code"),
            message: String::from("Employee code is already registered"),
        },
        PersistenceError::InvalidCredentials => ApiError::AuthenticationFailed {
            reason: String::from("Invalid email or password"),
        },
        PersistenceError::AccountInactive => ApiError::AuthenticationFailed {
            reason: String::from("Account is inactive"),
        },
        PersistenceError::EventNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Clock event"),
            message: format!("Clock event {id} does not exist"),
        },
        PersistenceError::UserNotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("User"),
            message: msg,
        },
        _ => ApiError::Internal {
            message: format!("Persistence error: {err}"),
        },
    }
}
