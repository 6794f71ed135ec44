// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftly_persistence::Persistence;

use crate::tests::helpers::{
    create_test_persistence, create_test_staffed_store, create_test_store, manager, other_staff,
    staff,
};
use crate::{
    ApiError, CreateStoreRequest, ErrorKind, MemberInfo, MembershipInfo, StoreConfigInfo,
    StoreSummaryInfo, UpdateConfigRequest, UpdateRoleRequest, create_store, get_config,
    join_store, list_members, list_my_stores, remove_member, sync_profile, update_config,
    update_role,
};

#[test]
fn test_create_store_rejects_blank_name() {
    let mut persistence: Persistence = create_test_persistence();
    let err: ApiError = create_store(
        &mut persistence,
        &CreateStoreRequest {
            name: String::from("   "),
        },
        &manager(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(list_my_stores(&mut persistence, &manager()).unwrap().is_empty());
}

#[test]
fn test_creator_sees_store_as_manager() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_store(&mut persistence);

    let stores: Vec<StoreSummaryInfo> = list_my_stores(&mut persistence, &manager()).unwrap();
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].store.store_id, store_id);
    assert_eq!(stores[0].store.created_by, "manager-m");
    assert_eq!(stores[0].role, "manager");
}

#[test]
fn test_join_is_always_staff_and_only_once() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_store(&mut persistence);

    let membership: MembershipInfo = join_store(&mut persistence, store_id, &staff()).unwrap();
    assert_eq!(membership.role, "staff");

    let err: ApiError = join_store(&mut persistence, store_id, &staff()).unwrap_err();
    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "duplicate_membership"
    ));
}

#[test]
fn test_join_missing_store_is_not_found() {
    let mut persistence: Persistence = create_test_persistence();
    let err: ApiError = join_store(&mut persistence, 99, &staff()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn test_last_manager_cannot_step_down() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);

    let err: ApiError = update_role(
        &mut persistence,
        store_id,
        "manager-m",
        &UpdateRoleRequest {
            role: String::from("staff"),
        },
        &manager(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "last_manager"
    ));

    let err: ApiError = remove_member(&mut persistence, store_id, "manager-m", &manager())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[test]
fn test_promoted_member_can_manage() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);

    let promoted: MembershipInfo = update_role(
        &mut persistence,
        store_id,
        "staff-s",
        &UpdateRoleRequest {
            role: String::from("manager"),
        },
        &manager(),
    )
    .unwrap();
    assert_eq!(promoted.role, "manager");

    remove_member(&mut persistence, store_id, "staff-t", &staff()).unwrap();
    let members: Vec<MemberInfo> = list_members(&mut persistence, store_id, &staff()).unwrap();
    assert_eq!(members.len(), 2);
}

#[test]
fn test_staff_may_leave_but_not_remove_others() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);

    let err: ApiError =
        remove_member(&mut persistence, store_id, "staff-t", &staff()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);

    remove_member(&mut persistence, store_id, "staff-s", &staff()).unwrap();
    let err: ApiError = list_members(&mut persistence, store_id, &staff()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);
    assert_eq!(
        list_members(&mut persistence, store_id, &other_staff())
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn test_unknown_role_is_a_validation_error() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);

    let err: ApiError = update_role(
        &mut persistence,
        store_id,
        "staff-s",
        &UpdateRoleRequest {
            role: String::from("owner"),
        },
        &manager(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn test_new_store_has_default_config() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);

    let config: StoreConfigInfo = get_config(&mut persistence, store_id, &staff()).unwrap();
    assert_eq!(config.open_days.len(), 7);
    assert_eq!(config.open_days[0].weekday, 0);
    assert!(config.open_days.iter().all(|day| day.is_open));
    assert_eq!(config.open_days[6].open_time, "09:00");
    assert_eq!(config.open_days[6].close_time, "18:00");
    assert_eq!(config.deadline_weekday, None);
    assert_eq!(config.deadline_time, None);
    assert_eq!(config.timezone, "UTC");
}

#[test]
fn test_config_update_keeps_unspecified_fields() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_store(&mut persistence);

    update_config(
        &mut persistence,
        store_id,
        &UpdateConfigRequest {
            deadline_weekday: Some(3),
            deadline_time: Some(String::from("17:00")),
            ..UpdateConfigRequest::default()
        },
        &manager(),
    )
    .unwrap();

    let mut days = get_config(&mut persistence, store_id, &manager())
        .unwrap()
        .open_days;
    days[6].is_open = false;
    let config: StoreConfigInfo = update_config(
        &mut persistence,
        store_id,
        &UpdateConfigRequest {
            open_days: Some(days),
            timezone: Some(String::from("Europe/Berlin")),
            ..UpdateConfigRequest::default()
        },
        &manager(),
    )
    .unwrap();

    assert_eq!(config.deadline_weekday, Some(3));
    assert_eq!(config.deadline_time.as_deref(), Some("17:00"));
    assert_eq!(config.timezone, "Europe/Berlin");
    assert!(!config.open_days[6].is_open);
}

#[test]
fn test_config_rejects_invalid_values() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_store(&mut persistence);

    for request in [
        UpdateConfigRequest {
            deadline_weekday: Some(7),
            ..UpdateConfigRequest::default()
        },
        UpdateConfigRequest {
            deadline_time: Some(String::from("25:00")),
            ..UpdateConfigRequest::default()
        },
        UpdateConfigRequest {
            timezone: Some(String::from("Mars/Olympus")),
            ..UpdateConfigRequest::default()
        },
        UpdateConfigRequest {
            open_days: Some(Vec::new()),
            ..UpdateConfigRequest::default()
        },
    ] {
        let err: ApiError = update_config(&mut persistence, store_id, &request, &manager())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{request:?}");
    }
}

#[test]
fn test_staff_cannot_change_config() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);

    let err: ApiError = update_config(
        &mut persistence,
        store_id,
        &UpdateConfigRequest {
            timezone: Some(String::from("Europe/Berlin")),
            ..UpdateConfigRequest::default()
        },
        &staff(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Permission);
}

#[test]
fn test_synced_profiles_appear_in_member_list() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);

    assert!(sync_profile(&mut persistence, &staff()).unwrap());
    assert!(!sync_profile(&mut persistence, &staff()).unwrap());

    let members: Vec<MemberInfo> = list_members(&mut persistence, store_id, &manager()).unwrap();
    let sam: &MemberInfo = members
        .iter()
        .find(|member| member.user_id == "staff-s")
        .unwrap();
    assert_eq!(sam.display_name.as_deref(), Some("Sam"));
    assert_eq!(sam.email.as_deref(), Some("staff-s@example.com"));
}
