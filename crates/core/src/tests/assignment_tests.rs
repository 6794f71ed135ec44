// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    WEEK_ID, create_test_need, create_test_shift, create_test_week_state, manager, other_staff,
    outsider, set_week_status, staff,
};
use crate::{Command, CoreError, Mutation, State, apply};
use shiftly_domain::{DomainError, TimeRange, UserId, WeekStatus};
use time::Weekday;
use time::macros::time;

fn assign_from_need(user_id: UserId, need_id: i64) -> Command {
    Command::AssignShift {
        user_id,
        need_id: Some(need_id),
        weekday: None,
        start_time: None,
        end_time: None,
    }
}

#[test]
fn test_assign_defaults_window_to_need() {
    let state: State = create_test_week_state();
    let result = apply(&state, assign_from_need(staff(), 100), &manager()).unwrap();

    assert_eq!(
        result.mutation,
        Mutation::InsertShift {
            week_id: WEEK_ID,
            user_id: staff(),
            weekday: Weekday::Wednesday,
            range: TimeRange::parse("09:00", "13:00").unwrap(),
            need_id: Some(100),
        }
    );
    assert_eq!(result.audit_event.action.name, "AssignShift");
}

#[test]
fn test_assign_overrides_take_precedence() {
    let state: State = create_test_week_state();
    let command: Command = Command::AssignShift {
        user_id: staff(),
        need_id: Some(100),
        weekday: None,
        start_time: Some(time!(10:00)),
        end_time: None,
    };

    match apply(&state, command, &manager()).unwrap().mutation {
        Mutation::InsertShift { range, weekday, .. } => {
            assert_eq!(range, TimeRange::parse("10:00", "13:00").unwrap());
            assert_eq!(weekday, Weekday::Wednesday);
        }
        other => panic!("unexpected mutation {other:?}"),
    }
}

#[test]
fn test_assign_without_need_requires_window() {
    let state: State = create_test_week_state();
    let command: Command = Command::AssignShift {
        user_id: staff(),
        need_id: None,
        weekday: Some(Weekday::Friday),
        start_time: Some(time!(10:00)),
        end_time: None,
    };
    assert!(matches!(
        apply(&state, command, &manager()),
        Err(CoreError::DomainViolation(DomainError::IncompleteShift { .. }))
    ));
}

#[test]
fn test_assign_by_non_manager_is_unauthorized() {
    let state: State = create_test_week_state();
    assert!(matches!(
        apply(&state, assign_from_need(staff(), 100), &staff()),
        Err(CoreError::Unauthorized { .. })
    ));
    assert!(matches!(
        apply(&state, assign_from_need(staff(), 100), &outsider()),
        Err(CoreError::Unauthorized { .. })
    ));
}

#[test]
fn test_assign_unknown_need_is_rejected() {
    let state: State = create_test_week_state();
    assert!(matches!(
        apply(&state, assign_from_need(staff(), 999), &manager()),
        Err(CoreError::DomainViolation(DomainError::NeedNotInWeek { .. }))
    ));
}

#[test]
fn test_assign_to_non_member_is_rejected() {
    let state: State = create_test_week_state();
    assert!(matches!(
        apply(&state, assign_from_need(outsider(), 100), &manager()),
        Err(CoreError::DomainViolation(DomainError::NotAMember { .. }))
    ));
}

#[test]
fn test_second_assignment_same_window_is_double_booking() {
    let mut state: State = create_test_week_state();
    state.needs.push(create_test_need(101, "09:00", "13:00"));
    state.shifts = vec![create_test_shift(1, staff(), "09:00", "13:00")];

    assert!(matches!(
        apply(&state, assign_from_need(staff(), 101), &manager()),
        Err(CoreError::DomainViolation(DomainError::DoubleBooking {
            existing_shift_id: 1,
            ..
        }))
    ));

    // Another member can still fill the second need.
    assert!(apply(&state, assign_from_need(other_staff(), 101), &manager()).is_ok());
}

#[test]
fn test_assign_refused_once_published() {
    let mut state: State = create_test_week_state();
    set_week_status(&mut state, WeekStatus::Locked);
    assert!(apply(&state, assign_from_need(staff(), 100), &manager()).is_ok());

    set_week_status(&mut state, WeekStatus::Published);
    assert!(matches!(
        apply(&state, assign_from_need(staff(), 100), &manager()),
        Err(CoreError::DomainViolation(DomainError::WeekClosed { .. }))
    ));
}

#[test]
fn test_unassign_is_manager_only() {
    let mut state: State = create_test_week_state();
    state.shifts = vec![create_test_shift(1, staff(), "09:00", "13:00")];

    assert!(matches!(
        apply(&state, Command::UnassignShift { shift_id: 1 }, &staff()),
        Err(CoreError::Unauthorized { .. })
    ));
    assert_eq!(
        apply(&state, Command::UnassignShift { shift_id: 1 }, &manager())
            .unwrap()
            .mutation,
        Mutation::DeleteShift { shift_id: 1 }
    );
    assert!(matches!(
        apply(&state, Command::UnassignShift { shift_id: 2 }, &manager()),
        Err(CoreError::DomainViolation(DomainError::ShiftNotFound(2)))
    ));
}

#[test]
fn test_delete_need_only_while_open() {
    let mut state: State = create_test_week_state();
    assert_eq!(
        apply(&state, Command::DeleteNeed { need_id: 100 }, &manager())
            .unwrap()
            .mutation,
        Mutation::DeleteNeed { need_id: 100 }
    );

    set_week_status(&mut state, WeekStatus::Locked);
    assert!(apply(&state, Command::DeleteNeed { need_id: 100 }, &manager()).is_err());
}
