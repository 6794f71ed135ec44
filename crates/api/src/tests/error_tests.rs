// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftly::CoreError;
use shiftly_domain::{DomainError, WeekStatus};
use shiftly_persistence::PersistenceError;

use crate::{
    ApiError, ErrorKind, translate_core_error, translate_domain_error, translate_persistence_error,
};

#[test]
fn test_domain_errors_map_to_kinds() {
    let cases: Vec<(DomainError, ErrorKind)> = vec![
        (DomainError::InvalidRequiredStaff(0), ErrorKind::Validation),
        (DomainError::SelfSwap, ErrorKind::Validation),
        (DomainError::IncompleteDeadline, ErrorKind::Validation),
        (
            DomainError::DoubleBooking {
                user_id: String::from("staff-s"),
                weekday: 2,
                existing_shift_id: 1,
            },
            ErrorKind::Conflict,
        ),
        (
            DomainError::InvalidWeekTransition {
                from: WeekStatus::Open,
                to: WeekStatus::Published,
            },
            ErrorKind::Conflict,
        ),
        (DomainError::LastManager { store_id: 1 }, ErrorKind::Conflict),
        (DomainError::ShiftNotFound(9), ErrorKind::NotFound),
        (DomainError::StoreNotFound(9), ErrorKind::NotFound),
    ];

    for (domain_err, kind) in cases {
        assert_eq!(translate_domain_error(domain_err.clone()).kind(), kind, "{domain_err}");
    }
}

#[test]
fn test_core_unauthorized_is_a_permission_error() {
    let err: ApiError = translate_core_error(CoreError::Unauthorized {
        action: String::from("AssignShift"),
        required_role: String::from("manager"),
    });
    assert_eq!(err.kind(), ErrorKind::Permission);
    assert_eq!(err.to_string(), "Unauthorized: 'AssignShift' requires manager");
}

#[test]
fn test_persistence_errors_keep_their_meaning() {
    assert_eq!(
        translate_persistence_error(PersistenceError::UniqueViolation(String::from("x"))).kind(),
        ErrorKind::Conflict
    );
    assert_eq!(
        translate_persistence_error(PersistenceError::NotFound(String::from("week 3"))).kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        translate_persistence_error(PersistenceError::RuleViolation(DomainError::SelfSwap)).kind(),
        ErrorKind::Validation
    );
    assert_eq!(
        translate_persistence_error(PersistenceError::DatabaseError(String::from("disk"))).kind(),
        ErrorKind::DependencyFailure
    );
}

#[test]
fn test_failed_step_is_named() {
    let err: ApiError = translate_persistence_error(PersistenceError::StepFailed {
        step: "inserting the manager membership",
        message: String::from("disk I/O error"),
    });
    assert!(matches!(
        err,
        ApiError::DependencyFailure { ref step, .. } if step == "inserting the manager membership"
    ));
    assert_eq!(ErrorKind::DependencyFailure.as_str(), "dependency_failure");
}
