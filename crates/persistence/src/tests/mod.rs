// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod swap_tests;

use shiftly::{Command, State, StoreCreation, TransitionResult, apply, apply_create_store};
use shiftly_domain::{SwapDecision, UserId};
use time::Weekday;
use time::macros::{date, time};

use crate::{PersistTransitionResult, Persistence, PersistenceError};

pub fn manager() -> UserId {
    UserId::new("manager-m")
}

pub fn staff() -> UserId {
    UserId::new("staff-s")
}

pub fn other_staff() -> UserId {
    UserId::new("staff-t")
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

/// Creates "Cafe A" managed by M and returns its id.
pub fn create_test_store(persistence: &mut Persistence) -> i64 {
    let creation: StoreCreation = apply_create_store("Cafe A", &manager()).unwrap();
    persistence.persist_store_creation(&creation).unwrap().store_id
}

/// Applies `command` against freshly loaded store state and persists it.
pub fn run_store_command(
    persistence: &mut Persistence,
    store_id: i64,
    command: Command,
    actor: &UserId,
) -> Result<PersistTransitionResult, PersistenceError> {
    let state: State = persistence.load_store_state(store_id)?;
    let result: TransitionResult = apply(&state, command, actor).expect("command is valid");
    persistence.persist_transition(&result)
}

/// Applies `command` against freshly loaded week state and persists it.
pub fn run_week_command(
    persistence: &mut Persistence,
    week_id: i64,
    command: Command,
    actor: &UserId,
) -> Result<PersistTransitionResult, PersistenceError> {
    let state: State = persistence.load_week_state(week_id)?;
    let result: TransitionResult = apply(&state, command, actor).expect("command is valid");
    persistence.persist_transition(&result)
}

/// Store with M as manager and S, T as staff.
pub fn create_test_staffed_store(persistence: &mut Persistence) -> i64 {
    let store_id: i64 = create_test_store(persistence);
    run_store_command(persistence, store_id, Command::JoinStore, &staff()).unwrap();
    run_store_command(persistence, store_id, Command::JoinStore, &other_staff()).unwrap();
    store_id
}

/// Creates the week of 2026-03-02 and returns its id.
pub fn create_test_week(persistence: &mut Persistence, store_id: i64) -> i64 {
    run_store_command(
        persistence,
        store_id,
        Command::CreateWeek {
            week_start: date!(2026 - 03 - 02),
        },
        &manager(),
    )
    .unwrap()
    .entity_id
    .unwrap()
}

/// Creates a Wednesday 09:00-13:00 need for one person and returns its id.
pub fn create_test_need(persistence: &mut Persistence, week_id: i64) -> i64 {
    run_week_command(
        persistence,
        week_id,
        Command::CreateNeed {
            weekday: Weekday::Wednesday,
            start_time: time!(9:00),
            end_time: time!(13:00),
            required_staff: 1,
        },
        &manager(),
    )
    .unwrap()
    .entity_id
    .unwrap()
}

pub fn assign_command(user_id: UserId, need_id: Option<i64>) -> Command {
    Command::AssignShift {
        user_id,
        need_id,
        weekday: Some(Weekday::Wednesday),
        start_time: Some(time!(9:00)),
        end_time: Some(time!(13:00)),
    }
}

pub fn decide_command(swap_id: i64, decision: SwapDecision) -> Command {
    Command::DecideSwap { swap_id, decision }
}
