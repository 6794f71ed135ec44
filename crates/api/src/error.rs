// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use shiftly::CoreError;
use shiftly_domain::DomainError;
use shiftly_persistence::PersistenceError;

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
                write!(f, "Unauthorized: '{action}' requires {required_role}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// The machine-checkable category of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input; the caller should correct it.
    Validation,
    /// The caller's role does not permit the operation.
    Permission,
    /// A state invariant would be violated.
    Conflict,
    /// The referenced entity does not exist.
    NotFound,
    /// Storage failed or returned something unexpected.
    DependencyFailure,
    /// No authenticated identity.
    Authentication,
}

impl ErrorKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Permission => "permission",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::DependencyFailure => "dependency_failure",
            Self::Authentication => "authentication",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

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
    /// Authorization failed - the actor does not have permission.
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
    /// Storage failed.
    DependencyFailure {
        /// The step of the operation that failed.
        step: String,
        /// A description of the failure.
        message: String,
    },
}

impl ApiError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthenticationFailed { .. } => ErrorKind::Authentication,
            Self::Unauthorized { .. } => ErrorKind::Permission,
            Self::DomainRuleViolation { .. } => ErrorKind::Conflict,
            Self::InvalidInput { .. } => ErrorKind::Validation,
            Self::ResourceNotFound { .. } => ErrorKind::NotFound,
            Self::DependencyFailure { .. } => ErrorKind::DependencyFailure,
        }
    }
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
                write!(f, "Unauthorized: '{action}' requires {required_role}")
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
            Self::DependencyFailure { step, message } => {
                write!(f, "Storage failure while {step}: {message}")
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
        }
    }
}

fn invalid(field: &str, message: String) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message,
    }
}

fn conflict(rule: &str, message: String) -> ApiError {
    ApiError::DomainRuleViolation {
        rule: rule.to_string(),
        message,
    }
}

fn not_found(resource_type: &str, message: String) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message,
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidStoreName(_) => invalid("name", message),
        DomainError::InvalidRole(_) => invalid("role", message),
        DomainError::InvalidWeekday(_) => invalid("weekday", message),
        DomainError::InvalidTime { .. } => invalid("time", message),
        DomainError::InvalidDate { .. } => invalid("date", message),
        DomainError::InvalidTimeRange { .. } => invalid("end_time", message),
        DomainError::InvalidRequiredStaff(_) => invalid("required_staff", message),
        DomainError::InvalidOpenDays(_) => invalid("open_days", message),
        DomainError::InvalidTimezone(_) => invalid("timezone", message),
        DomainError::IncompleteDeadline | DomainError::UnresolvableDeadline { .. } => {
            invalid("deadline", message)
        }
        DomainError::DateArithmeticOverflow { .. } => invalid("date", message),
        DomainError::InvalidWeekStatus(_) => invalid("status", message),
        DomainError::InvalidSwapStatus(_) | DomainError::InvalidSwapDecision(_) => {
            invalid("decision", message)
        }
        DomainError::SelfSwap => invalid("target_id", message),
        DomainError::NotAMember { .. } => invalid("user_id", message),
        DomainError::IncompleteShift { field } => invalid(field, message),
        DomainError::NeedNotInWeek { .. } => invalid("need_id", message),
        DomainError::InvalidWeekTransition { .. } => conflict("week_transition", message),
        DomainError::WeekClosed { .. } => conflict("week_closed", message),
        DomainError::SubmissionClosed { .. } => conflict("submission_closed", message),
        DomainError::SwapNotPending { .. } => conflict("swap_not_pending", message),
        DomainError::PendingSwapExists { .. } => conflict("single_pending_swap", message),
        DomainError::DoubleBooking { .. } => conflict("double_booking", message),
        DomainError::DuplicateMembership { .. } => conflict("duplicate_membership", message),
        DomainError::LastManager { .. } => conflict("last_manager", message),
        DomainError::StoreNotFound(_) => not_found("Store", message),
        DomainError::WeekNotFound(_) => not_found("Week", message),
        DomainError::NeedNotFound(_) => not_found("Need", message),
        DomainError::AvailabilityNotFound(_) => not_found("Availability", message),
        DomainError::ShiftNotFound(_) => not_found("Shift", message),
        DomainError::SwapRequestNotFound(_) => not_found("Swap request", message),
        DomainError::MembershipNotFound { .. } => not_found("Membership", message),
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Unauthorized {
            action,
            required_role,
        } => ApiError::Unauthorized {
            action,
            required_role,
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Constraint failures are conflicts, missing rows are not-found, and
/// everything else is a dependency failure naming the failed step.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::RuleViolation(domain_err) => translate_domain_error(domain_err),
        PersistenceError::NotFound(what) => not_found("Resource", what),
        PersistenceError::UniqueViolation(message) => conflict("unique", message),
        PersistenceError::ForeignKeyViolation(message) => conflict("foreign_key", message),
        PersistenceError::ConstraintViolation(message) => conflict("constraint", message),
        PersistenceError::StepFailed { step, message } => ApiError::DependencyFailure {
            step: step.to_string(),
            message,
        },
        other => ApiError::DependencyFailure {
            step: String::from("accessing storage"),
            message: other.to_string(),
        },
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}
