// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use shiftly_domain::UserId;
use shiftly_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    AssignShiftRequest, AuthenticatedActor, CreateNeedRequest, CreateStoreRequest, NeedInfo,
    WeekRequest, create_need, create_store, get_or_create_week, join_store,
};

fn actor(id: &str, name: &str) -> AuthenticatedActor {
    AuthenticatedActor::new(
        UserId::new(id),
        Some(name.to_string()),
        Some(format!("{id}@example.com")),
    )
}

pub fn manager() -> AuthenticatedActor {
    actor("manager-m", "Mia")
}

pub fn staff() -> AuthenticatedActor {
    actor("staff-s", "Sam")
}

pub fn other_staff() -> AuthenticatedActor {
    actor("staff-t", "Tess")
}

pub fn outsider() -> AuthenticatedActor {
    actor("outsider-u", "Uma")
}

/// A submission instant well before any test deadline.
pub fn early() -> OffsetDateTime {
    datetime!(2026-03-01 12:00 UTC)
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().unwrap()
}

pub fn create_test_store(persistence: &mut Persistence) -> i64 {
    let request: CreateStoreRequest = CreateStoreRequest {
        name: String::from("Cafe A"),
    };
    create_store(persistence, &request, &manager())
        .unwrap()
        .store_id
}

/// A store managed by M with S and T as staff.
pub fn create_test_staffed_store(persistence: &mut Persistence) -> i64 {
    let store_id: i64 = create_test_store(persistence);
    join_store(persistence, store_id, &staff()).unwrap();
    join_store(persistence, store_id, &other_staff()).unwrap();
    store_id
}

/// The week of Monday 2026-03-02.
pub fn create_test_week(persistence: &mut Persistence, store_id: i64) -> i64 {
    let request: WeekRequest = WeekRequest {
        reference_date: String::from("2026-03-04"),
    };
    get_or_create_week(persistence, store_id, &request, &manager())
        .unwrap()
        .week_id
}

/// Wednesday 09:00-13:00, one person.
pub fn create_test_need(persistence: &mut Persistence, week_id: i64) -> NeedInfo {
    let request: CreateNeedRequest = CreateNeedRequest {
        weekday: 2,
        start_time: String::from("09:00"),
        end_time: String::from("13:00"),
        required_staff: 1,
    };
    create_need(persistence, week_id, &request, &manager()).unwrap()
}

/// Assignment of `user` to the Wednesday 09:00-13:00 window.
pub fn assign_request(user: &AuthenticatedActor, need_id: Option<i64>) -> AssignShiftRequest {
    AssignShiftRequest {
        user_id: user.user_id.value().to_string(),
        need_id,
        weekday: Some(2),
        start_time: Some(String::from("09:00")),
        end_time: Some(String::from("13:00")),
    }
}
