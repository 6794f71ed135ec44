// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftly::Command;
use shiftly_domain::{SwapDecision, SwapRequest, SwapStatus};

use crate::tests::{
    assign_command, create_test_need, create_test_persistence, create_test_staffed_store,
    create_test_week, decide_command, manager, other_staff, run_week_command, staff,
};
use crate::Persistence;

/// Returns `(week_id, shift_id, swap_id)` for a pending swap of S's shift to T.
fn create_test_pending_swap(persistence: &mut Persistence, store_id: i64) -> (i64, i64, i64) {
    let week_id: i64 = create_test_week(persistence, store_id);
    let need_id: i64 = create_test_need(persistence, week_id);
    let shift_id: i64 = run_week_command(
        persistence,
        week_id,
        assign_command(staff(), Some(need_id)),
        &manager(),
    )
    .unwrap()
    .entity_id
    .unwrap();
    let swap_id: i64 = run_week_command(
        persistence,
        week_id,
        Command::RequestSwap {
            shift_id,
            target_id: other_staff(),
        },
        &staff(),
    )
    .unwrap()
    .entity_id
    .unwrap();
    (week_id, shift_id, swap_id)
}

#[test]
fn test_swap_request_is_stored_pending() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let (_, shift_id, swap_id) = create_test_pending_swap(&mut persistence, store_id);

    let swap: SwapRequest = persistence.get_swap_request(swap_id).unwrap();
    assert_eq!(swap.status, SwapStatus::Pending);
    assert_eq!(swap.shift_id, shift_id);
    assert_eq!(swap.requester_id, staff());
    assert_eq!(swap.target_id, other_staff());
    assert_eq!(swap.decided_by, None);
}

#[test]
fn test_accepting_a_swap_transfers_the_shift() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let (week_id, shift_id, swap_id) = create_test_pending_swap(&mut persistence, store_id);

    run_week_command(
        &mut persistence,
        week_id,
        decide_command(swap_id, SwapDecision::Accept),
        &manager(),
    )
    .unwrap();

    let swap: SwapRequest = persistence.get_swap_request(swap_id).unwrap();
    assert_eq!(swap.status, SwapStatus::Accepted);
    assert_eq!(swap.decided_by, Some(manager()));
    assert_eq!(persistence.get_shift(shift_id).unwrap().user_id, other_staff());
}

#[test]
fn test_rejecting_a_swap_keeps_the_owner() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let (week_id, shift_id, swap_id) = create_test_pending_swap(&mut persistence, store_id);

    run_week_command(
        &mut persistence,
        week_id,
        decide_command(swap_id, SwapDecision::Reject),
        &manager(),
    )
    .unwrap();

    assert_eq!(
        persistence.get_swap_request(swap_id).unwrap().status,
        SwapStatus::Rejected
    );
    assert_eq!(persistence.get_shift(shift_id).unwrap().user_id, staff());
}

#[test]
fn test_store_swap_listing_spans_weeks() {
    let mut persistence: Persistence = create_test_persistence();
    let store_id: i64 = create_test_staffed_store(&mut persistence);
    let (_, _, swap_id) = create_test_pending_swap(&mut persistence, store_id);

    let swaps: Vec<SwapRequest> = persistence.list_swap_requests_for_store(store_id).unwrap();
    assert_eq!(swaps.len(), 1);
    assert_eq!(swaps[0].swap_id, swap_id);

    let other_store: i64 = create_test_staffed_store(&mut persistence);
    assert!(
        persistence
            .list_swap_requests_for_store(other_store)
            .unwrap()
            .is_empty()
    );
}
