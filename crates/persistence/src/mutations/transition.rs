// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persisting transition results.
//!
//! Every mutation is written together with its audit event inside one
//! immediate transaction. `SQLite` takes the write lock when an immediate
//! transaction begins, so the rules re-checked here (double-booking, the
//! last manager, pending swaps, week status) see every committed write and
//! no concurrent writer can slip in between the check and the write.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftly::{Mutation, ShiftTransfer, TransitionResult};
use shiftly_domain::{
    DomainError, Role, Shift, SwapStatus, TimeRange, UserId, WeekStatus, validate_keeps_manager,
    validate_no_overlap,
};
use time::Weekday;
use tracing::info;

use crate::backend::get_last_insert_rowid;
use crate::data_models::PersistTransitionResult;
use crate::diesel_schema::{
    availabilities, shifts, store_members, store_weeks, swap_requests, week_shift_needs,
};
use crate::encoding::{
    encode_date, encode_instant, encode_required_staff, encode_time, encode_weekday,
};
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::mutations::stores::upsert_store_config;
use crate::queries::schedule::list_shifts_for_user_in_week;
use crate::queries::stores::decode_role;
use crate::queries::swaps::decode_swap_status;
use crate::queries::weeks::decode_week_status;

/// Persists a transition result.
///
/// # Returns
///
/// The audit event id and, for inserts, the id of the new row.
///
/// # Errors
///
/// Returns `PersistenceError::RuleViolation` if a rule no longer holds at
/// commit time, or another error if the write fails. Nothing is committed
/// on error.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<PersistTransitionResult, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let entity_id: Option<i64> =
            apply_mutation(conn, &result.mutation, result.audit_event.store_id)?;
        let event_id: i64 = persist_audit_event(conn, &result.audit_event)
            .map_err(|e| e.during("recording the audit event"))?;

        info!(
            event_id,
            entity_id,
            action = %result.audit_event.action.name,
            "Persisted transition"
        );
        Ok(PersistTransitionResult {
            event_id,
            entity_id,
        })
    })
}

#[allow(clippy::too_many_lines)]
fn apply_mutation(
    conn: &mut SqliteConnection,
    mutation: &Mutation,
    store_id: Option<i64>,
) -> Result<Option<i64>, PersistenceError> {
    match mutation {
        Mutation::InsertMembership(membership) => {
            diesel::insert_into(store_members::table)
                .values((
                    store_members::store_id.eq(membership.store_id),
                    store_members::user_id.eq(membership.user_id.value()),
                    store_members::role.eq(membership.role.as_str()),
                ))
                .execute(conn)
                .map_err(|e| match PersistenceError::from(e) {
                    PersistenceError::UniqueViolation(_) => {
                        PersistenceError::RuleViolation(DomainError::DuplicateMembership {
                            store_id: membership.store_id,
                            user_id: membership.user_id.value().to_string(),
                        })
                    }
                    other => other,
                })?;
            Ok(None)
        }
        Mutation::UpdateMembershipRole { user_id, role } => {
            let store_id: i64 = require_store(store_id, "changing a role")?;
            guard_manager_change(conn, store_id, user_id, Some(*role))?;
            diesel::update(store_members::table)
                .filter(store_members::store_id.eq(store_id))
                .filter(store_members::user_id.eq(user_id.value()))
                .set(store_members::role.eq(role.as_str()))
                .execute(conn)?;
            Ok(None)
        }
        Mutation::DeleteMembership { user_id } => {
            let store_id: i64 = require_store(store_id, "removing a member")?;
            guard_manager_change(conn, store_id, user_id, None)?;
            diesel::delete(
                store_members::table
                    .filter(store_members::store_id.eq(store_id))
                    .filter(store_members::user_id.eq(user_id.value())),
            )
            .execute(conn)?;
            Ok(None)
        }
        Mutation::UpsertConfig(config) => {
            upsert_store_config(conn, config)?;
            Ok(None)
        }
        Mutation::InsertWeek { week_start, due_at } => {
            let store_id: i64 = require_store(store_id, "inserting the week")?;
            let due_at: Option<String> = due_at.map(encode_instant).transpose()?;
            diesel::insert_into(store_weeks::table)
                .values((
                    store_weeks::store_id.eq(store_id),
                    store_weeks::week_start.eq(encode_date(*week_start)),
                    store_weeks::due_at.eq(&due_at),
                    store_weeks::status.eq(WeekStatus::Open.as_str()),
                ))
                .execute(conn)?;
            Ok(Some(get_last_insert_rowid(conn)?))
        }
        Mutation::UpdateWeekStatus { week_id, status } => {
            let current: WeekStatus = current_week_status(conn, *week_id)?;
            if !current.can_transition_to(*status) {
                return Err(DomainError::InvalidWeekTransition {
                    from: current,
                    to: *status,
                }
                .into());
            }
            diesel::update(store_weeks::table)
                .filter(store_weeks::week_id.eq(week_id))
                .set(store_weeks::status.eq(status.as_str()))
                .execute(conn)?;
            Ok(None)
        }
        Mutation::InsertNeed {
            week_id,
            weekday,
            range,
            required_staff,
        } => {
            require_week_open(conn, *week_id, "change needs")?;
            diesel::insert_into(week_shift_needs::table)
                .values((
                    week_shift_needs::week_id.eq(week_id),
                    week_shift_needs::weekday.eq(encode_weekday(*weekday)),
                    week_shift_needs::start_time.eq(encode_time(range.start())),
                    week_shift_needs::end_time.eq(encode_time(range.end())),
                    week_shift_needs::required_staff.eq(encode_required_staff(*required_staff)?),
                ))
                .execute(conn)?;
            Ok(Some(get_last_insert_rowid(conn)?))
        }
        Mutation::DeleteNeed { need_id } => {
            let week_id: i64 = week_shift_needs::table
                .filter(week_shift_needs::need_id.eq(need_id))
                .select(week_shift_needs::week_id)
                .first::<i64>(conn)
                .optional()?
                .ok_or(DomainError::NeedNotFound(*need_id))?;
            require_week_open(conn, week_id, "change needs")?;
            let deleted: usize = diesel::delete(
                week_shift_needs::table.filter(week_shift_needs::need_id.eq(need_id)),
            )
            .execute(conn)?;
            if deleted == 0 {
                return Err(DomainError::NeedNotFound(*need_id).into());
            }
            Ok(None)
        }
        Mutation::InsertAvailability {
            week_id,
            user_id,
            weekday,
            range,
        } => {
            require_week_open(conn, *week_id, "change availability")?;
            diesel::insert_into(availabilities::table)
                .values((
                    availabilities::week_id.eq(week_id),
                    availabilities::user_id.eq(user_id.value()),
                    availabilities::weekday.eq(encode_weekday(*weekday)),
                    availabilities::start_time.eq(encode_time(range.start())),
                    availabilities::end_time.eq(encode_time(range.end())),
                ))
                .execute(conn)?;
            Ok(Some(get_last_insert_rowid(conn)?))
        }
        Mutation::DeleteAvailability { availability_id } => {
            let week_id: i64 = availabilities::table
                .filter(availabilities::availability_id.eq(availability_id))
                .select(availabilities::week_id)
                .first::<i64>(conn)
                .optional()?
                .ok_or(DomainError::AvailabilityNotFound(*availability_id))?;
            require_week_open(conn, week_id, "change availability")?;
            let deleted: usize = diesel::delete(
                availabilities::table.filter(availabilities::availability_id.eq(availability_id)),
            )
            .execute(conn)?;
            if deleted == 0 {
                return Err(DomainError::AvailabilityNotFound(*availability_id).into());
            }
            Ok(None)
        }
        Mutation::InsertShift {
            week_id,
            user_id,
            weekday,
            range,
            need_id,
        } => {
            require_week_assignable(conn, *week_id)?;
            guard_overlap(conn, *week_id, user_id, *weekday, range, None)?;
            diesel::insert_into(shifts::table)
                .values((
                    shifts::week_id.eq(week_id),
                    shifts::user_id.eq(user_id.value()),
                    shifts::weekday.eq(encode_weekday(*weekday)),
                    shifts::start_time.eq(encode_time(range.start())),
                    shifts::end_time.eq(encode_time(range.end())),
                    shifts::need_id.eq(need_id),
                ))
                .execute(conn)?;
            Ok(Some(get_last_insert_rowid(conn)?))
        }
        Mutation::DeleteShift { shift_id } => {
            let week_id: i64 = shifts::table
                .filter(shifts::shift_id.eq(shift_id))
                .select(shifts::week_id)
                .first::<i64>(conn)
                .optional()?
                .ok_or(DomainError::ShiftNotFound(*shift_id))?;
            require_week_assignable(conn, week_id)?;
            let deleted: usize =
                diesel::delete(shifts::table.filter(shifts::shift_id.eq(shift_id)))
                    .execute(conn)?;
            if deleted == 0 {
                return Err(DomainError::ShiftNotFound(*shift_id).into());
            }
            Ok(None)
        }
        Mutation::InsertSwapRequest {
            shift_id,
            requester_id,
            target_id,
        } => {
            diesel::insert_into(swap_requests::table)
                .values((
                    swap_requests::shift_id.eq(shift_id),
                    swap_requests::requester_id.eq(requester_id.value()),
                    swap_requests::target_id.eq(target_id.value()),
                    swap_requests::status.eq(SwapStatus::Pending.as_str()),
                ))
                .execute(conn)
                .map_err(|e| match PersistenceError::from(e) {
                    PersistenceError::UniqueViolation(_) => {
                        PersistenceError::RuleViolation(DomainError::PendingSwapExists {
                            shift_id: *shift_id,
                        })
                    }
                    other => other,
                })?;
            Ok(Some(get_last_insert_rowid(conn)?))
        }
        Mutation::DecideSwap {
            swap_id,
            status,
            decided_by,
            transfer,
        } => {
            decide_swap(conn, *swap_id, *status, decided_by)
                .map_err(|e| e.during("recording the swap decision"))?;
            if let Some(transfer) = transfer {
                transfer_shift(conn, transfer).map_err(|e| e.during("transferring the shift"))?;
            }
            Ok(None)
        }
    }
}

fn require_store(store_id: Option<i64>, step: &'static str) -> Result<i64, PersistenceError> {
    store_id.ok_or_else(|| PersistenceError::StepFailed {
        step,
        message: String::from("the audit event is not bound to a store"),
    })
}

fn guard_manager_change(
    conn: &mut SqliteConnection,
    store_id: i64,
    user_id: &UserId,
    new_role: Option<Role>,
) -> Result<(), PersistenceError> {
    let current: Option<String> = store_members::table
        .filter(store_members::store_id.eq(store_id))
        .filter(store_members::user_id.eq(user_id.value()))
        .select(store_members::role)
        .first::<String>(conn)
        .optional()?;
    let current: Role = match current {
        Some(role) => decode_role(&role)?,
        None => {
            return Err(DomainError::MembershipNotFound {
                store_id,
                user_id: user_id.value().to_string(),
            }
            .into());
        }
    };

    let managers: i64 = store_members::table
        .filter(store_members::store_id.eq(store_id))
        .filter(store_members::role.eq(Role::Manager.as_str()))
        .count()
        .get_result(conn)?;
    let managers: usize = usize::try_from(managers)
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;

    validate_keeps_manager(store_id, managers, current, new_role)?;
    Ok(())
}

fn current_week_status(
    conn: &mut SqliteConnection,
    week_id: i64,
) -> Result<WeekStatus, PersistenceError> {
    let status: Option<String> = store_weeks::table
        .filter(store_weeks::week_id.eq(week_id))
        .select(store_weeks::status)
        .first::<String>(conn)
        .optional()?;
    match status {
        Some(status) => decode_week_status(&status),
        None => Err(DomainError::WeekNotFound(week_id).into()),
    }
}

fn require_week_open(
    conn: &mut SqliteConnection,
    week_id: i64,
    operation: &'static str,
) -> Result<(), PersistenceError> {
    let status: WeekStatus = current_week_status(conn, week_id)?;
    if !status.accepts_submissions() {
        return Err(DomainError::WeekClosed {
            week_id,
            status,
            operation,
        }
        .into());
    }
    Ok(())
}

fn require_week_assignable(
    conn: &mut SqliteConnection,
    week_id: i64,
) -> Result<(), PersistenceError> {
    let status: WeekStatus = current_week_status(conn, week_id)?;
    if !status.accepts_assignments() {
        return Err(DomainError::WeekClosed {
            week_id,
            status,
            operation: "change shifts",
        }
        .into());
    }
    Ok(())
}

fn guard_overlap(
    conn: &mut SqliteConnection,
    week_id: i64,
    user_id: &UserId,
    weekday: Weekday,
    range: &TimeRange,
    exclude_shift_id: Option<i64>,
) -> Result<(), PersistenceError> {
    let existing: Vec<Shift> = list_shifts_for_user_in_week(conn, week_id, user_id)?;
    validate_no_overlap(&existing, user_id, weekday, range, exclude_shift_id)?;
    Ok(())
}

fn decide_swap(
    conn: &mut SqliteConnection,
    swap_id: i64,
    status: SwapStatus,
    decided_by: &UserId,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(swap_requests::table)
        .filter(swap_requests::swap_id.eq(swap_id))
        .filter(swap_requests::status.eq(SwapStatus::Pending.as_str()))
        .set((
            swap_requests::status.eq(status.as_str()),
            swap_requests::decided_by.eq(decided_by.value()),
            swap_requests::decided_at.eq(diesel::dsl::sql::<
                diesel::sql_types::Nullable<diesel::sql_types::Text>,
            >("CURRENT_TIMESTAMP")),
        ))
        .execute(conn)?;
    if updated == 1 {
        return Ok(());
    }

    // Someone else decided first, or the request is gone.
    let current: Option<String> = swap_requests::table
        .filter(swap_requests::swap_id.eq(swap_id))
        .select(swap_requests::status)
        .first::<String>(conn)
        .optional()?;
    match current {
        Some(current) => Err(DomainError::SwapNotPending {
            swap_id,
            status: decode_swap_status(&current)?,
        }
        .into()),
        None => Err(DomainError::SwapRequestNotFound(swap_id).into()),
    }
}

fn transfer_shift(
    conn: &mut SqliteConnection,
    transfer: &ShiftTransfer,
) -> Result<(), PersistenceError> {
    guard_overlap(
        conn,
        transfer.week_id,
        &transfer.new_owner,
        transfer.weekday,
        &transfer.range,
        Some(transfer.shift_id),
    )?;
    let updated: usize = diesel::update(shifts::table)
        .filter(shifts::shift_id.eq(transfer.shift_id))
        .set(shifts::user_id.eq(transfer.new_owner.value()))
        .execute(conn)?;
    if updated == 0 {
        return Err(DomainError::ShiftNotFound(transfer.shift_id).into());
    }
    Ok(())
}
