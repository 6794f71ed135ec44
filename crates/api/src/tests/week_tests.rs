// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftly::{Command, State, TransitionResult, apply};
use shiftly_persistence::Persistence;
use time::macros::date;

use crate::tests::helpers::{
    create_test_persistence, create_test_staffed_store, create_test_week, manager, outsider,
    staff,
};
use crate::handlers::insert_or_reread_week;
use crate::{
    ApiError, ErrorKind, TransitionWeekRequest, UpdateConfigRequest, WeekInfo, WeekRequest,
    get_or_create_week, get_week, list_recent_weeks, transition_week, update_config,
};

fn week_of(persistence: &mut Persistence, store_id: i64, date: &str) -> WeekInfo {
    get_or_create_week(
        persistence,
        store_id,
        &WeekRequest {
            reference_date: date.to_string(),
        },
        &staff(),
    )
    .unwrap()
}

fn transition(
    persistence: &mut Persistence,
    week_id: i64,
    status: &str,
) -> Result<WeekInfo, ApiError> {
    transition_week(
        persistence,
        week_id,
        &TransitionWeekRequest {
            status: status.to_string(),
        },
        &manager(),
    )
}

#[test]
fn test_dates_in_one_week_resolve_to_one_row() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);

    let monday: WeekInfo = week_of(&mut persistence, store_id, "2026-03-02");
    let wednesday: WeekInfo = week_of(&mut persistence, store_id, "2026-03-04");
    let sunday: WeekInfo = week_of(&mut persistence, store_id, "2026-03-08");
    let next: WeekInfo = week_of(&mut persistence, store_id, "2026-03-09");

    assert_eq!(monday.week_start, "2026-03-02");
    assert_eq!(monday.status, "open");
    assert_eq!(monday.due_at, None);
    assert_eq!(wednesday.week_id, monday.week_id);
    assert_eq!(sunday.week_id, monday.week_id);
    assert_eq!(next.week_start, "2026-03-09");
    assert_ne!(next.week_id, monday.week_id);

    let recent: Vec<WeekInfo> =
        list_recent_weeks(&mut persistence, store_id, 10, &staff()).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].week_start, "2026-03-09");
}

#[test]
fn test_due_at_follows_store_deadline_and_timezone() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    update_config(
        &mut persistence,
        store_id,
        &UpdateConfigRequest {
            deadline_weekday: Some(3),
            deadline_time: Some(String::from("17:00")),
            timezone: Some(String::from("America/New_York")),
            ..UpdateConfigRequest::default()
        },
        &manager(),
    )
    .unwrap();

    // Thursday 17:00 EST is 22:00 UTC.
    let week: WeekInfo = week_of(&mut persistence, store_id, "2026-03-03");
    assert_eq!(week.due_at.as_deref(), Some("2026-03-05T22:00:00Z"));
}

#[test]
fn test_config_changes_do_not_move_existing_deadlines() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);

    update_config(
        &mut persistence,
        store_id,
        &UpdateConfigRequest {
            deadline_weekday: Some(4),
            deadline_time: Some(String::from("12:00")),
            ..UpdateConfigRequest::default()
        },
        &manager(),
    )
    .unwrap();

    assert_eq!(get_week(&mut persistence, week_id, &staff()).unwrap().due_at, None);
    let next: WeekInfo = week_of(&mut persistence, store_id, "2026-03-10");
    assert_eq!(next.due_at.as_deref(), Some("2026-03-13T12:00:00Z"));
}

#[test]
fn test_bad_reference_date_and_limit_are_validation_errors() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);

    let err: ApiError = get_or_create_week(
        &mut persistence,
        store_id,
        &WeekRequest {
            reference_date: String::from("next tuesday"),
        },
        &staff(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err: ApiError = list_recent_weeks(&mut persistence, store_id, 0, &staff()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_outsider_cannot_see_or_create_weeks() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);

    let err: ApiError = get_or_create_week(
        &mut persistence,
        store_id,
        &WeekRequest {
            reference_date: String::from("2026-04-01"),
        },
        &outsider(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);

    let err: ApiError = get_week(&mut persistence, week_id, &outsider()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);
    assert_eq!(
        list_recent_weeks(&mut persistence, store_id, 10, &manager())
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_week_lifecycle_transitions() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);

    assert_eq!(transition(&mut persistence, week_id, "locked").unwrap().status, "locked");
    assert_eq!(transition(&mut persistence, week_id, "open").unwrap().status, "open");

    let err: ApiError = transition(&mut persistence, week_id, "published").unwrap_err();
    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "week_transition"
    ));

    transition(&mut persistence, week_id, "locked").unwrap();
    assert_eq!(
        transition(&mut persistence, week_id, "published").unwrap().status,
        "published"
    );
    assert_eq!(
        transition(&mut persistence, week_id, "open").unwrap_err().kind(),
        ErrorKind::Conflict
    );
    assert_eq!(
        transition(&mut persistence, week_id, "archived").unwrap_err().kind(),
        ErrorKind::Validation
    );
}

#[test]
fn test_staff_cannot_transition_weeks() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let week_id: i64 = create_test_week(&mut persistence, store_id);

    let err: ApiError = transition_week(
        &mut persistence,
        week_id,
        &TransitionWeekRequest {
            status: String::from("locked"),
        },
        &staff(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);
}

#[test]
fn test_missing_week_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();
    create_test_staffed_store(&mut persistence);
    let err: ApiError = get_week(&mut persistence, 404, &manager()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_losing_week_creation_race_returns_the_winner() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);

    // Prepared before the other caller's insert lands.
    let state: State = persistence.load_store_state(store_id).unwrap();
    let late: TransitionResult = apply(
        &state,
        Command::CreateWeek {
            week_start: date!(2026 - 03 - 02),
        },
        &manager().user_id,
    )
    .unwrap();

    let winner: WeekInfo = week_of(&mut persistence, store_id, "2026-03-04");
    let resolved: WeekInfo =
        insert_or_reread_week(&mut persistence, store_id, date!(2026 - 03 - 02), &late).unwrap();

    assert_eq!(resolved, winner);
    let weeks: Vec<WeekInfo> = list_recent_weeks(&mut persistence, store_id, 10, &staff()).unwrap();
    assert_eq!(weeks.len(), 1);
}
