// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftly_persistence::Persistence;
use time::macros::datetime;

use crate::tests::helpers::{
    assign_request, create_test_need, create_test_persistence, create_test_staffed_store,
    create_test_week, early, manager, other_staff, outsider, staff,
};
use crate::{
    ApiError, AssignShiftRequest, AvailabilityInfo, CreateNeedRequest, ErrorKind, NeedInfo,
    ShiftInfo, SubmitAvailabilityRequest, TransitionWeekRequest, UpdateConfigRequest,
    WeekCoverageResponse, WeekRequest, assign_shift, create_need, delete_need, get_or_create_week,
    list_availability, list_my_shifts, list_my_shifts_in_week, list_needs, list_shifts_for_week,
    remove_member, submit_availability, transition_week, unassign_shift, update_config,
    week_coverage, withdraw_availability,
};

fn need_request(weekday: i64, start: &str, end: &str, required_staff: i64) -> CreateNeedRequest {
    CreateNeedRequest {
        weekday,
        start_time: start.to_string(),
        end_time: end.to_string(),
        required_staff,
    }
}

fn availability_request(weekday: i64, start: &str, end: &str) -> SubmitAvailabilityRequest {
    SubmitAvailabilityRequest {
        weekday,
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

fn set_week_status(persistence: &mut Persistence, week_id: i64, status: &str) {
    transition_week(
        persistence,
        week_id,
        &TransitionWeekRequest {
            status: status.to_string(),
        },
        &manager(),
    )
    .unwrap();
}

#[test]
fn test_needs_are_validated_and_listed_by_weekday() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);

    for request in [
        need_request(2, "09:00", "13:00", 0),
        need_request(2, "13:00", "09:00", 1),
        need_request(2, "13:00", "13:00", 1),
        need_request(9, "09:00", "13:00", 1),
        need_request(2, "9am", "13:00", 1),
    ] {
        let err: ApiError =
            create_need(&mut persistence, week_id, &request, &manager()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{request:?}");
    }

    create_need(
        &mut persistence,
        week_id,
        &need_request(4, "12:00", "18:00", 2),
        &manager(),
    )
    .unwrap();
    create_test_need(&mut persistence, week_id);

    let needs: Vec<NeedInfo> = list_needs(&mut persistence, week_id, &staff()).unwrap();
    assert_eq!(needs.len(), 2);
    assert_eq!(needs[0].weekday, 2);
    assert_eq!(needs[1].weekday, 4);
    assert_eq!(needs[1].required_staff, 2);
}

#[test]
fn test_staff_cannot_create_needs() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);

    let err: ApiError = create_need(
        &mut persistence,
        week_id,
        &need_request(2, "09:00", "13:00", 1),
        &staff(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);
}

#[test]
fn test_needs_freeze_once_week_is_locked() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);
    let need: NeedInfo = create_test_need(&mut persistence, week_id);
    set_week_status(&mut persistence, week_id, "locked");

    let err: ApiError = delete_need(&mut persistence, need.need_id, &manager()).unwrap_err();
    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "week_closed"
    ));
}

#[test]
fn test_deleting_a_need_keeps_its_shifts() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);
    let need: NeedInfo = create_test_need(&mut persistence, week_id);
    assign_shift(
        &mut persistence,
        week_id,
        &assign_request(&staff(), Some(need.need_id)),
        &manager(),
    )
    .unwrap();

    delete_need(&mut persistence, need.need_id, &manager()).unwrap();

    let shifts: Vec<ShiftInfo> = list_shifts_for_week(&mut persistence, week_id, &staff()).unwrap();
    assert_eq!(shifts.len(), 1);
    assert_eq!(shifts[0].need_id, None);
    assert_eq!(
        delete_need(&mut persistence, need.need_id, &manager())
            .unwrap_err()
            .kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn test_availability_is_recorded_for_the_caller() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);

    submit_availability(
        &mut persistence,
        week_id,
        &availability_request(3, "10:00", "12:00"),
        &staff(),
        early(),
    )
    .unwrap();
    submit_availability(
        &mut persistence,
        week_id,
        &availability_request(1, "14:00", "18:00"),
        &staff(),
        early(),
    )
    .unwrap();
    submit_availability(
        &mut persistence,
        week_id,
        &availability_request(1, "08:00", "10:00"),
        &manager(),
        early(),
    )
    .unwrap();

    let entries: Vec<AvailabilityInfo> =
        list_availability(&mut persistence, week_id, &other_staff()).unwrap();
    let listed: Vec<(i64, &str)> = entries
        .iter()
        .map(|entry| (entry.weekday, entry.user_id.as_str()))
        .collect();
    assert_eq!(listed.len(), 3);
    assert!(listed.windows(2).all(|pair| pair[0].0 <= pair[1].0));
    assert_eq!(listed.iter().filter(|(_, user)| *user == "staff-s").count(), 2);

    let err: ApiError = submit_availability(
        &mut persistence,
        week_id,
        &availability_request(1, "12:00", "11:00"),
        &staff(),
        early(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err: ApiError = submit_availability(
        &mut persistence,
        week_id,
        &availability_request(1, "09:00", "11:00"),
        &outsider(),
        early(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);
}

#[test]
fn test_availability_closes_at_the_deadline() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    update_config(
        &mut persistence,
        store_id,
        &UpdateConfigRequest {
            deadline_weekday: Some(0),
            deadline_time: Some(String::from("12:00")),
            ..UpdateConfigRequest::default()
        },
        &manager(),
    )
    .unwrap();
    let week_id: i64 = get_or_create_week(
        &mut persistence,
        store_id,
        &WeekRequest {
            reference_date: String::from("2026-03-02"),
        },
        &manager(),
    )
    .unwrap()
    .week_id;

    let entry: AvailabilityInfo = submit_availability(
        &mut persistence,
        week_id,
        &availability_request(2, "09:00", "17:00"),
        &staff(),
        datetime!(2026-03-02 11:59 UTC),
    )
    .unwrap();

    let err: ApiError = submit_availability(
        &mut persistence,
        week_id,
        &availability_request(3, "09:00", "17:00"),
        &staff(),
        datetime!(2026-03-02 12:00 UTC),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "submission_closed"
    ));

    let err: ApiError = withdraw_availability(
        &mut persistence,
        entry.availability_id,
        &staff(),
        datetime!(2026-03-03 08:00 UTC),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn test_only_the_owner_withdraws_availability() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);
    let entry: AvailabilityInfo = submit_availability(
        &mut persistence,
        week_id,
        &availability_request(2, "09:00", "17:00"),
        &staff(),
        early(),
    )
    .unwrap();

    let err: ApiError =
        withdraw_availability(&mut persistence, entry.availability_id, &manager(), early())
            .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);

    withdraw_availability(&mut persistence, entry.availability_id, &staff(), early()).unwrap();
    assert!(
        list_availability(&mut persistence, week_id, &staff())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_assignment_defaults_to_the_need_window() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);
    let need: NeedInfo = create_need(
        &mut persistence,
        week_id,
        &need_request(5, "07:30", "11:00", 2),
        &manager(),
    )
    .unwrap();

    let shift: ShiftInfo = assign_shift(
        &mut persistence,
        week_id,
        &AssignShiftRequest {
            user_id: String::from("staff-t"),
            need_id: Some(need.need_id),
            weekday: None,
            start_time: None,
            end_time: Some(String::from("10:00")),
        },
        &manager(),
    )
    .unwrap();

    assert_eq!(shift.weekday, 5);
    assert_eq!(shift.start_time, "07:30");
    assert_eq!(shift.end_time, "10:00");
    assert_eq!(shift.need_id, Some(need.need_id));
}

#[test]
fn test_assignment_input_is_validated() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);
    let other_week: i64 = get_or_create_week(
        &mut persistence,
        store_id,
        &WeekRequest {
            reference_date: String::from("2026-03-10"),
        },
        &manager(),
    )
    .unwrap()
    .week_id;
    let foreign_need: NeedInfo = create_test_need(&mut persistence, other_week);

    let incomplete: AssignShiftRequest = AssignShiftRequest {
        user_id: String::from("staff-s"),
        need_id: None,
        weekday: Some(2),
        start_time: Some(String::from("09:00")),
        end_time: None,
    };
    let reversed: AssignShiftRequest = AssignShiftRequest {
        start_time: Some(String::from("14:00")),
        ..assign_request(&staff(), None)
    };

    for request in [
        incomplete,
        reversed,
        assign_request(&staff(), Some(foreign_need.need_id)),
        assign_request(&outsider(), None),
        AssignShiftRequest {
            user_id: String::from(" "),
            ..assign_request(&staff(), None)
        },
    ] {
        let err: ApiError =
            assign_shift(&mut persistence, week_id, &request, &manager()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{request:?}");
    }
    assert!(
        list_shifts_for_week(&mut persistence, week_id, &manager())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_staff_cannot_assign_or_unassign() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);

    let err: ApiError = assign_shift(
        &mut persistence,
        week_id,
        &assign_request(&staff(), None),
        &staff(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);

    let shift: ShiftInfo = assign_shift(
        &mut persistence,
        week_id,
        &assign_request(&staff(), None),
        &manager(),
    )
    .unwrap();
    let err: ApiError = unassign_shift(&mut persistence, shift.shift_id, &staff()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);

    unassign_shift(&mut persistence, shift.shift_id, &manager()).unwrap();
    assert!(list_my_shifts(&mut persistence, &staff()).unwrap().is_empty());
}

#[test]
fn test_adjacent_shifts_do_not_overlap() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);

    assign_shift(
        &mut persistence,
        week_id,
        &assign_request(&staff(), None),
        &manager(),
    )
    .unwrap();
    assign_shift(
        &mut persistence,
        week_id,
        &AssignShiftRequest {
            start_time: Some(String::from("13:00")),
            end_time: Some(String::from("17:00")),
            ..assign_request(&staff(), None)
        },
        &manager(),
    )
    .unwrap();
    let err: ApiError = assign_shift(
        &mut persistence,
        week_id,
        &AssignShiftRequest {
            start_time: Some(String::from("12:59")),
            end_time: Some(String::from("13:01")),
            ..assign_request(&staff(), None)
        },
        &manager(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    assert_eq!(
        list_my_shifts_in_week(&mut persistence, week_id, &staff())
            .unwrap()
            .len(),
        2
    );
    assert!(
        list_my_shifts_in_week(&mut persistence, week_id, &other_staff())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_published_week_refuses_assignment_changes() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);
    let shift: ShiftInfo = assign_shift(
        &mut persistence,
        week_id,
        &assign_request(&staff(), None),
        &manager(),
    )
    .unwrap();

    set_week_status(&mut persistence, week_id, "locked");
    assign_shift(
        &mut persistence,
        week_id,
        &assign_request(&other_staff(), None),
        &manager(),
    )
    .unwrap();
    set_week_status(&mut persistence, week_id, "published");

    let err: ApiError = unassign_shift(&mut persistence, shift.shift_id, &manager()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    let err: ApiError = assign_shift(
        &mut persistence,
        week_id,
        &AssignShiftRequest {
            weekday: Some(3),
            ..assign_request(&staff(), None)
        },
        &manager(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn test_coverage_reports_missing_staff_and_candidates() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);
    let need: NeedInfo = create_need(
        &mut persistence,
        week_id,
        &need_request(2, "09:00", "13:00", 2),
        &manager(),
    )
    .unwrap();

    for user in [staff(), other_staff()] {
        submit_availability(
            &mut persistence,
            week_id,
            &availability_request(2, "08:00", "14:00"),
            &user,
            early(),
        )
        .unwrap();
    }
    assign_shift(
        &mut persistence,
        week_id,
        &assign_request(&staff(), Some(need.need_id)),
        &manager(),
    )
    .unwrap();

    let report: WeekCoverageResponse =
        week_coverage(&mut persistence, week_id, &manager()).unwrap();
    assert_eq!(report.week.week_id, week_id);
    assert_eq!(report.needs.len(), 1);
    assert_eq!(report.needs[0].assigned.len(), 1);
    assert_eq!(report.needs[0].missing, 1);
    assert_eq!(report.needs[0].candidates, vec![String::from("staff-t")]);

    let err: ApiError = week_coverage(&mut persistence, week_id, &staff()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);
}

#[test]
fn test_coverage_skips_availability_of_removed_members() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);
    let need: NeedInfo = create_test_need(&mut persistence, week_id);

    submit_availability(
        &mut persistence,
        week_id,
        &availability_request(2, "08:00", "14:00"),
        &other_staff(),
        early(),
    )
    .unwrap();
    remove_member(
        &mut persistence,
        store_id,
        other_staff().user_id.value(),
        &manager(),
    )
    .unwrap();

    let report: WeekCoverageResponse =
        week_coverage(&mut persistence, week_id, &manager()).unwrap();
    assert_eq!(report.needs[0].need.need_id, need.need_id);
    assert!(report.needs[0].candidates.is_empty());
    assert_eq!(report.needs[0].missing, 1);
}
