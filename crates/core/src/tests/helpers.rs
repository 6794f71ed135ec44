// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Mutation, State, TransitionResult};
use shiftly_domain::{
    Membership, Need, Role, Shift, StoreConfig, SwapRequest, SwapStatus, TimeRange, UserId, Week,
    WeekStatus,
};
use time::Weekday;
use time::macros::date;

pub const STORE_ID: i64 = 1;
pub const WEEK_ID: i64 = 10;

pub fn manager() -> UserId {
    UserId::new("manager-m")
}

pub fn staff() -> UserId {
    UserId::new("staff-s")
}

pub fn other_staff() -> UserId {
    UserId::new("staff-t")
}

pub fn outsider() -> UserId {
    UserId::new("outsider-u")
}

fn membership(user_id: UserId, role: Role) -> Membership {
    Membership {
        store_id: STORE_ID,
        user_id,
        role,
    }
}

/// Store state: M manages, S and T are staff, no week loaded.
pub fn create_test_store_state() -> State {
    State::new(
        STORE_ID,
        vec![
            membership(manager(), Role::Manager),
            membership(staff(), Role::Staff),
            membership(other_staff(), Role::Staff),
        ],
        StoreConfig::with_defaults(STORE_ID),
    )
}

/// Store state with an open week holding one Wednesday 09:00-13:00 need.
pub fn create_test_week_state() -> State {
    let mut state: State = create_test_store_state();
    state.week = Some(Week {
        week_id: WEEK_ID,
        store_id: STORE_ID,
        week_start: date!(2026 - 03 - 02),
        due_at: None,
        status: WeekStatus::Open,
    });
    state.needs = vec![create_test_need(100, "09:00", "13:00")];
    state
}

pub fn create_test_need(need_id: i64, start: &str, end: &str) -> Need {
    Need {
        need_id,
        week_id: WEEK_ID,
        weekday: Weekday::Wednesday,
        range: TimeRange::parse(start, end).unwrap(),
        required_staff: 1,
    }
}

pub fn create_test_shift(shift_id: i64, user_id: UserId, start: &str, end: &str) -> Shift {
    Shift {
        shift_id,
        week_id: WEEK_ID,
        user_id,
        weekday: Weekday::Wednesday,
        range: TimeRange::parse(start, end).unwrap(),
        need_id: Some(100),
    }
}

pub fn create_test_swap(swap_id: i64, shift_id: i64, status: SwapStatus) -> SwapRequest {
    SwapRequest {
        swap_id,
        shift_id,
        requester_id: staff(),
        target_id: other_staff(),
        status,
        decided_by: None,
    }
}

pub fn set_week_status(state: &mut State, status: WeekStatus) {
    if let Some(week) = state.week.as_mut() {
        week.status = status;
    }
}

pub fn mutation_of(result: TransitionResult) -> Mutation {
    result.mutation
}
