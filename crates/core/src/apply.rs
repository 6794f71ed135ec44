// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{Mutation, ShiftTransfer, State, StoreCreation, TransitionResult};
use shiftly_audit::{Action, Actor, AuditEvent, StateSnapshot};
use shiftly_domain::{
    DomainError, Membership, Need, Role, Shift, StoreConfig, SwapDecision, SwapRequest, TimeRange,
    UserId, Week, compute_due_at, format_time_of_day, validate_keeps_manager, validate_no_overlap,
    validate_required_staff, validate_store_name, week_start_for, weekday_index,
};
use time::{OffsetDateTime, Time, Weekday};

/// Validates a store creation and prepares its default configuration.
///
/// The creator becomes the store's first manager.
///
/// # Errors
///
/// Returns an error if the store name is invalid.
pub fn apply_create_store(name: &str, actor: &UserId) -> Result<StoreCreation, CoreError> {
    validate_store_name(name)?;
    let name: String = name.trim().to_string();

    let action: Action = Action::new(
        String::from("CreateStore"),
        Some(format!("Created store '{name}' managed by '{actor}'")),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        None,
        Actor::user(actor),
        action,
        StateSnapshot::absent(),
        StateSnapshot::new(format!("name={name},managers=1")),
    );

    Ok(StoreCreation {
        name,
        created_by: actor.clone(),
        config: StoreConfig::with_defaults(0),
        audit_event,
    })
}

/// Applies a command to the current state, producing a mutation and audit event.
///
/// Every privilege is derived from `state.memberships`; nothing in the
/// command can grant one.
///
/// # Errors
///
/// Returns an error if:
/// - The actor's membership does not permit the command
/// - The command violates a scheduling rule
/// - A referenced entity is not part of the loaded state
#[allow(clippy::too_many_lines)]
pub fn apply(
    state: &State,
    command: Command,
    actor: &UserId,
) -> Result<TransitionResult, CoreError> {
    let name: &'static str = command.name();
    let before: StateSnapshot = state.to_snapshot();

    let (mutation, details): (Mutation, String) = match command {
        Command::JoinStore => {
            if state.role_of(actor).is_some() {
                return Err(DomainError::DuplicateMembership {
                    store_id: state.store_id,
                    user_id: actor.value().to_string(),
                }
                .into());
            }
            (
                Mutation::InsertMembership(Membership {
                    store_id: state.store_id,
                    user_id: actor.clone(),
                    role: Role::Staff,
                }),
                format!("'{actor}' joined as staff"),
            )
        }
        Command::UpdateRole { user_id, role } => {
            require_manager(state, actor, name)?;
            let current: Role = member_role(state, &user_id)?;
            validate_keeps_manager(state.store_id, state.manager_count(), current, Some(role))?;
            let details: String = format!("'{user_id}' changed from {current} to {role}");
            (Mutation::UpdateMembershipRole { user_id, role }, details)
        }
        Command::RemoveMember { user_id } => {
            if user_id != *actor {
                require_manager(state, actor, name)?;
            }
            let current: Role = member_role(state, &user_id)?;
            validate_keeps_manager(state.store_id, state.manager_count(), current, None)?;
            let details: String = format!("'{user_id}' ({current}) removed");
            (Mutation::DeleteMembership { user_id }, details)
        }
        Command::UpdateConfig { patch } => {
            require_manager(state, actor, name)?;
            let updated: StoreConfig = state.config.apply_patch(patch)?;
            let details: String = updated.deadline().map_or_else(
                || format!("No deadline, timezone {}", updated.timezone),
                |(weekday, time)| {
                    format!(
                        "Deadline {weekday} {} {}",
                        format_time_of_day(time),
                        updated.timezone
                    )
                },
            );
            (Mutation::UpsertConfig(updated), details)
        }
        Command::CreateWeek { week_start } => {
            require_member(state, actor, name)?;
            if week_start_for(week_start)? != week_start {
                return Err(DomainError::InvalidDate {
                    value: week_start.to_string(),
                    error: String::from("week start must be a Monday"),
                }
                .into());
            }
            let due_at: Option<OffsetDateTime> = compute_due_at(week_start, &state.config)?;
            (
                Mutation::InsertWeek { week_start, due_at },
                format!("Week of {week_start}"),
            )
        }
        Command::TransitionWeek { target } => {
            require_manager(state, actor, name)?;
            let week: &Week = loaded_week(state)?;
            if !week.status.can_transition_to(target) {
                return Err(DomainError::InvalidWeekTransition {
                    from: week.status,
                    to: target,
                }
                .into());
            }
            (
                Mutation::UpdateWeekStatus {
                    week_id: week.week_id,
                    status: target,
                },
                format!("Week {} {} -> {target}", week.week_id, week.status),
            )
        }
        Command::CreateNeed {
            weekday,
            start_time,
            end_time,
            required_staff,
        } => {
            require_manager(state, actor, name)?;
            let week: &Week = loaded_week(state)?;
            require_open(week, "change needs")?;
            let range: TimeRange = TimeRange::new(start_time, end_time)?;
            let required_staff: u32 = validate_required_staff(required_staff)?;
            (
                Mutation::InsertNeed {
                    week_id: week.week_id,
                    weekday,
                    range,
                    required_staff,
                },
                format!("{required_staff} staff on {weekday} {range}"),
            )
        }
        Command::DeleteNeed { need_id } => {
            require_manager(state, actor, name)?;
            let week: &Week = loaded_week(state)?;
            require_open(week, "change needs")?;
            let need: &Need = find_need(state, week, need_id)?;
            (
                Mutation::DeleteNeed { need_id },
                format!("Need {need_id} on {} {}", need.weekday, need.range),
            )
        }
        Command::SubmitAvailability {
            weekday,
            start_time,
            end_time,
            submitted_at,
        } => {
            require_member(state, actor, name)?;
            let week: &Week = loaded_week(state)?;
            require_accepting_availability(week, submitted_at)?;
            let range: TimeRange = TimeRange::new(start_time, end_time)?;
            (
                Mutation::InsertAvailability {
                    week_id: week.week_id,
                    user_id: actor.clone(),
                    weekday,
                    range,
                },
                format!("'{actor}' available {weekday} {range}"),
            )
        }
        Command::WithdrawAvailability {
            availability_id,
            submitted_at,
        } => {
            require_member(state, actor, name)?;
            let week: &Week = loaded_week(state)?;
            let entry = state
                .availabilities
                .iter()
                .find(|entry| entry.availability_id == availability_id)
                .ok_or(DomainError::AvailabilityNotFound(availability_id))?;
            if entry.user_id != *actor {
                return Err(CoreError::Unauthorized {
                    action: String::from(name),
                    required_role: String::from("the entry's owner"),
                });
            }
            require_accepting_availability(week, submitted_at)?;
            (
                Mutation::DeleteAvailability { availability_id },
                format!("'{actor}' withdrew {} {}", entry.weekday, entry.range),
            )
        }
        Command::AssignShift {
            user_id,
            need_id,
            weekday,
            start_time,
            end_time,
        } => {
            require_manager(state, actor, name)?;
            let week: &Week = loaded_week(state)?;
            require_assignable(week)?;
            require_target_member(state, &user_id)?;

            let need: Option<&Need> = need_id
                .map(|need_id| {
                    state
                        .needs
                        .iter()
                        .find(|need| need.need_id == need_id && need.week_id == week.week_id)
                        .ok_or(DomainError::NeedNotInWeek {
                            need_id,
                            week_id: week.week_id,
                        })
                })
                .transpose()?;

            let (weekday, range): (Weekday, TimeRange) =
                resolve_shift_window(need, weekday, start_time, end_time)?;
            validate_no_overlap(&state.shifts, &user_id, weekday, &range, None)?;

            let details: String = format!("'{user_id}' on {weekday} {range}");
            (
                Mutation::InsertShift {
                    week_id: week.week_id,
                    user_id,
                    weekday,
                    range,
                    need_id,
                },
                details,
            )
        }
        Command::UnassignShift { shift_id } => {
            require_manager(state, actor, name)?;
            let week: &Week = loaded_week(state)?;
            require_assignable(week)?;
            let shift: &Shift = find_shift(state, shift_id)?;
            (
                Mutation::DeleteShift { shift_id },
                format!(
                    "Shift {shift_id} of '{}' on {} {}",
                    shift.user_id, shift.weekday, shift.range
                ),
            )
        }
        Command::RequestSwap {
            shift_id,
            target_id,
        } => {
            require_member(state, actor, name)?;
            let shift: &Shift = find_shift(state, shift_id)?;
            if shift.user_id != *actor {
                return Err(CoreError::Unauthorized {
                    action: String::from(name),
                    required_role: String::from("the shift's owner"),
                });
            }
            if target_id == *actor {
                return Err(DomainError::SelfSwap.into());
            }
            require_target_member(state, &target_id)?;
            if state
                .swap_requests
                .iter()
                .any(|swap| swap.shift_id == shift_id && !swap.status.is_terminal())
            {
                return Err(DomainError::PendingSwapExists { shift_id }.into());
            }
            let details: String = format!("Shift {shift_id} from '{actor}' to '{target_id}'");
            (
                Mutation::InsertSwapRequest {
                    shift_id,
                    requester_id: actor.clone(),
                    target_id,
                },
                details,
            )
        }
        Command::DecideSwap { swap_id, decision } => {
            require_manager(state, actor, name)?;
            let swap: &SwapRequest = state
                .swap_requests
                .iter()
                .find(|swap| swap.swap_id == swap_id)
                .ok_or(DomainError::SwapRequestNotFound(swap_id))?;
            if !swap.status.can_transition_to(decision.target_status()) {
                return Err(DomainError::SwapNotPending {
                    swap_id,
                    status: swap.status,
                }
                .into());
            }

            let transfer: Option<ShiftTransfer> = match decision {
                SwapDecision::Accept => {
                    let shift: &Shift = find_shift(state, swap.shift_id)?;
                    require_target_member(state, &swap.target_id)?;
                    validate_no_overlap(
                        &state.shifts,
                        &swap.target_id,
                        shift.weekday,
                        &shift.range,
                        Some(shift.shift_id),
                    )?;
                    Some(ShiftTransfer {
                        shift_id: shift.shift_id,
                        week_id: shift.week_id,
                        new_owner: swap.target_id.clone(),
                        weekday: shift.weekday,
                        range: shift.range,
                    })
                }
                SwapDecision::Reject => None,
            };

            (
                Mutation::DecideSwap {
                    swap_id,
                    status: decision.target_status(),
                    decided_by: actor.clone(),
                    transfer,
                },
                format!(
                    "Swap {swap_id} of shift {} {}",
                    swap.shift_id,
                    decision.target_status()
                ),
            )
        }
    };

    let after: StateSnapshot = StateSnapshot::new(format!("{} applied", mutation_label(&mutation)));
    let audit_event: AuditEvent = AuditEvent::new(
        Some(state.store_id),
        Actor::user(actor),
        Action::new(String::from(name), Some(details)),
        before,
        after,
    );

    Ok(TransitionResult {
        mutation,
        audit_event,
    })
}

/// Checks that `actor` holds any membership in the store.
///
/// # Errors
///
/// Returns `CoreError::Unauthorized` for non-members.
pub fn require_member(state: &State, actor: &UserId, action: &str) -> Result<Role, CoreError> {
    state.role_of(actor).ok_or_else(|| CoreError::Unauthorized {
        action: String::from(action),
        required_role: String::from("store membership"),
    })
}

/// Checks that `actor` is a manager of the store.
///
/// # Errors
///
/// Returns `CoreError::Unauthorized` for staff and non-members.
pub fn require_manager(state: &State, actor: &UserId, action: &str) -> Result<(), CoreError> {
    match state.role_of(actor) {
        Some(Role::Manager) => Ok(()),
        _ => Err(CoreError::Unauthorized {
            action: String::from(action),
            required_role: String::from("manager"),
        }),
    }
}

fn member_role(state: &State, user_id: &UserId) -> Result<Role, DomainError> {
    state
        .role_of(user_id)
        .ok_or_else(|| DomainError::MembershipNotFound {
            store_id: state.store_id,
            user_id: user_id.value().to_string(),
        })
}

fn require_target_member(state: &State, user_id: &UserId) -> Result<(), DomainError> {
    if state.role_of(user_id).is_none() {
        return Err(DomainError::NotAMember {
            store_id: state.store_id,
            user_id: user_id.value().to_string(),
        });
    }
    Ok(())
}

fn loaded_week(state: &State) -> Result<&Week, DomainError> {
    // Week-scoped commands are only built after the week was loaded.
    state.week.as_ref().ok_or(DomainError::WeekNotFound(0))
}

fn require_open(week: &Week, operation: &'static str) -> Result<(), DomainError> {
    if !week.status.accepts_submissions() {
        return Err(DomainError::WeekClosed {
            week_id: week.week_id,
            status: week.status,
            operation,
        });
    }
    Ok(())
}

fn require_assignable(week: &Week) -> Result<(), DomainError> {
    if !week.status.accepts_assignments() {
        return Err(DomainError::WeekClosed {
            week_id: week.week_id,
            status: week.status,
            operation: "change shifts",
        });
    }
    Ok(())
}

fn require_accepting_availability(week: &Week, at: OffsetDateTime) -> Result<(), DomainError> {
    require_open(week, "change availability")?;
    if !week.accepts_availability_at(at) {
        let due_at: String = week
            .due_at
            .map_or_else(String::new, |due| due.to_string());
        return Err(DomainError::SubmissionClosed {
            week_id: week.week_id,
            due_at,
        });
    }
    Ok(())
}

fn find_need<'a>(state: &'a State, week: &Week, need_id: i64) -> Result<&'a Need, DomainError> {
    state
        .needs
        .iter()
        .find(|need| need.need_id == need_id && need.week_id == week.week_id)
        .ok_or(DomainError::NeedNotFound(need_id))
}

fn find_shift(state: &State, shift_id: i64) -> Result<&Shift, DomainError> {
    state
        .shifts
        .iter()
        .find(|shift| shift.shift_id == shift_id)
        .ok_or(DomainError::ShiftNotFound(shift_id))
}

/// Resolves a shift's weekday and window, explicit values taking precedence
/// over the referenced need's.
fn resolve_shift_window(
    need: Option<&Need>,
    weekday: Option<Weekday>,
    start_time: Option<Time>,
    end_time: Option<Time>,
) -> Result<(Weekday, TimeRange), DomainError> {
    let weekday: Weekday = weekday
        .or_else(|| need.map(|need| need.weekday))
        .ok_or(DomainError::IncompleteShift { field: "weekday" })?;
    let start_time: Time = start_time
        .or_else(|| need.map(|need| need.range.start()))
        .ok_or(DomainError::IncompleteShift {
            field: "start time",
        })?;
    let end_time: Time = end_time
        .or_else(|| need.map(|need| need.range.end()))
        .ok_or(DomainError::IncompleteShift { field: "end time" })?;
    Ok((weekday, TimeRange::new(start_time, end_time)?))
}

fn mutation_label(mutation: &Mutation) -> String {
    match mutation {
        Mutation::InsertMembership(membership) => {
            format!("member '{}' as {}", membership.user_id, membership.role)
        }
        Mutation::UpdateMembershipRole { user_id, role } => format!("member '{user_id}' as {role}"),
        Mutation::DeleteMembership { user_id } => format!("member '{user_id}' removed"),
        Mutation::UpsertConfig(config) => format!("config of store {}", config.store_id),
        Mutation::InsertWeek { week_start, .. } => format!("week {week_start}"),
        Mutation::UpdateWeekStatus { week_id, status } => format!("week {week_id} {status}"),
        Mutation::InsertNeed {
            weekday,
            range,
            required_staff,
            ..
        } => format!("need {required_staff}x {} {range}", weekday_index(*weekday)),
        Mutation::DeleteNeed { need_id } => format!("need {need_id} removed"),
        Mutation::InsertAvailability {
            user_id,
            weekday,
            range,
            ..
        } => format!("availability '{user_id}' {} {range}", weekday_index(*weekday)),
        Mutation::DeleteAvailability { availability_id } => {
            format!("availability {availability_id} removed")
        }
        Mutation::InsertShift {
            user_id,
            weekday,
            range,
            ..
        } => format!("shift '{user_id}' {} {range}", weekday_index(*weekday)),
        Mutation::DeleteShift { shift_id } => format!("shift {shift_id} removed"),
        Mutation::InsertSwapRequest {
            shift_id,
            target_id,
            ..
        } => format!("swap of shift {shift_id} to '{target_id}' pending"),
        Mutation::DecideSwap {
            swap_id,
            status,
            transfer,
            ..
        } => transfer.as_ref().map_or_else(
            || format!("swap {swap_id} {status}"),
            |transfer| {
                format!(
                    "swap {swap_id} {status}, shift {} owned by '{}'",
                    transfer.shift_id, transfer.new_owner
                )
            },
        ),
    }
}
