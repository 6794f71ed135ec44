// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every handler takes the caller explicitly. Writes load the relevant
//! state, run the command through the engine and persist the result;
//! the engine and the write transaction both check authorization, so a
//! handler never trusts a role it was not given by stored membership.

use std::str::FromStr;

use shiftly::{Command, State, StoreCreation, TransitionResult, apply, apply_create_store};
use shiftly_audit::{Action, AuditEvent, StateSnapshot};
use shiftly_domain::{
    Availability, Membership, Need, NeedCoverage, OpenDay, Role, Shift, Store, StoreConfig,
    StoreConfigPatch, SwapDecision, SwapRequest, UserId, Week, WeekStatus, compute_coverage,
    parse_date, parse_time_of_day, week_start_for, weekday_from_index,
};
use shiftly_persistence::{
    MemberData, PersistStoreResult, PersistTransitionResult, Persistence, PersistenceError,
    ProfileData, StoreMembershipData,
};
use time::{Date, OffsetDateTime, Time, Weekday};
use tracing::{debug, info};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AssignShiftRequest, AuditEventInfo, AvailabilityInfo, CoverageInfo, CreateNeedRequest,
    CreateStoreRequest, DecideSwapRequest, MemberInfo, MembershipInfo, NeedInfo, OpenDayInfo,
    RequestSwapRequest, ShiftInfo, StoreConfigInfo, StoreInfo, StoreSummaryInfo,
    SubmitAvailabilityRequest, SwapRequestInfo, TransitionWeekRequest, UpdateConfigRequest,
    UpdateRoleRequest, WeekCoverageResponse, WeekInfo, WeekRequest,
};

// ============================================================================
// Shared plumbing
// ============================================================================

/// Runs a command against `state` and commits the result atomically.
fn commit(
    persistence: &mut Persistence,
    state: &State,
    command: Command,
    authenticated_actor: &AuthenticatedActor,
) -> Result<PersistTransitionResult, ApiError> {
    let result: TransitionResult =
        apply(state, command, &authenticated_actor.user_id).map_err(translate_core_error)?;
    persistence
        .persist_transition(&result)
        .map_err(translate_persistence_error)
}

fn created_id(persisted: &PersistTransitionResult, entity: &str) -> Result<i64, ApiError> {
    persisted.entity_id.ok_or_else(|| ApiError::DependencyFailure {
        step: format!("reading the new {entity} identifier"),
        message: String::from("storage returned no identifier"),
    })
}

fn load_week_for_member(
    persistence: &mut Persistence,
    week_id: i64,
    authenticated_actor: &AuthenticatedActor,
    action: &str,
) -> Result<Week, ApiError> {
    let week: Week = persistence
        .get_week(week_id)
        .map_err(translate_persistence_error)?;
    AuthorizationService::require_member(persistence, week.store_id, authenticated_actor, action)?;
    Ok(week)
}

fn parse_weekday(value: i64) -> Result<Weekday, ApiError> {
    weekday_from_index(value).map_err(translate_domain_error)
}

fn parse_time(value: &str) -> Result<Time, ApiError> {
    parse_time_of_day(value).map_err(translate_domain_error)
}

fn parse_user_id(field: &str, value: &str) -> Result<UserId, ApiError> {
    let value: &str = value.trim();
    if value.is_empty() {
        return Err(ApiError::InvalidInput {
            field: field.to_string(),
            message: String::from("user identifier must not be empty"),
        });
    }
    Ok(UserId::new(value))
}

fn parse_open_day(day: &OpenDayInfo) -> Result<OpenDay, ApiError> {
    Ok(OpenDay {
        weekday: parse_weekday(day.weekday)?,
        is_open: day.is_open,
        open_time: parse_time(&day.open_time)?,
        close_time: parse_time(&day.close_time)?,
    })
}

fn reread_membership(
    persistence: &mut Persistence,
    store_id: i64,
    user_id: &UserId,
) -> Result<Membership, ApiError> {
    persistence
        .get_membership(store_id, user_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::DependencyFailure {
            step: String::from("reading back the membership"),
            message: format!(
                "membership of '{user_id}' in store {store_id} is missing after commit"
            ),
        })
}

// ============================================================================
// Stores and membership
// ============================================================================

/// Creates a store with the caller as its first manager.
///
/// The store, the manager membership, the default configuration and the
/// audit event are committed together or not at all.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `request` - The store to create
/// * `authenticated_actor` - The caller, who becomes manager
///
/// # Returns
///
/// * `Ok(StoreInfo)` for the new store
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty or too long
/// - Any step of the atomic write fails (the error names the step)
pub fn create_store(
    persistence: &mut Persistence,
    request: &CreateStoreRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<StoreInfo, ApiError> {
    let creation: StoreCreation = apply_create_store(&request.name, &authenticated_actor.user_id)
        .map_err(translate_core_error)?;
    let persisted: PersistStoreResult = persistence
        .persist_store_creation(&creation)
        .map_err(translate_persistence_error)?;

    info!(
        store_id = persisted.store_id,
        user_id = %authenticated_actor.user_id,
        "Store created"
    );

    let store: Store = persistence
        .get_store(persisted.store_id)
        .map_err(translate_persistence_error)?;
    Ok(StoreInfo::from(&store))
}

/// Joins a store as staff.
///
/// The role is fixed by policy; nothing in the request can raise it.
///
/// # Errors
///
/// Returns an error if the store does not exist or the caller is already
/// a member.
pub fn join_store(
    persistence: &mut Persistence,
    store_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MembershipInfo, ApiError> {
    let state: State = persistence
        .load_store_state(store_id)
        .map_err(translate_persistence_error)?;
    commit(persistence, &state, Command::JoinStore, authenticated_actor)?;

    info!(store_id, user_id = %authenticated_actor.user_id, "Member joined");

    let membership: Membership =
        reread_membership(persistence, store_id, &authenticated_actor.user_id)?;
    Ok(MembershipInfo::from(&membership))
}

/// Lists the members of a store with their known profile details.
///
/// # Errors
///
/// Returns an error if the caller is not a member of the store.
pub fn list_members(
    persistence: &mut Persistence,
    store_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<MemberInfo>, ApiError> {
    AuthorizationService::require_member(
        persistence,
        store_id,
        authenticated_actor,
        "list_members",
    )?;
    let members: Vec<MemberData> = persistence
        .list_members_with_profiles(store_id)
        .map_err(translate_persistence_error)?;
    Ok(members.iter().map(MemberInfo::from).collect())
}

/// Lists the stores the caller belongs to, with the caller's role in each.
///
/// # Errors
///
/// Returns an error if the database cannot be read.
pub fn list_my_stores(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<StoreSummaryInfo>, ApiError> {
    let stores: Vec<StoreMembershipData> = persistence
        .list_stores_for_user(&authenticated_actor.user_id)
        .map_err(translate_persistence_error)?;
    Ok(stores.iter().map(StoreSummaryInfo::from).collect())
}

/// Changes a member's role.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `store_id` - The store
/// * `user_id` - The member whose role changes
/// * `request` - The new role
/// * `authenticated_actor` - The caller, who must be a manager
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a manager of the store
/// - The role is not `manager` or `staff`
/// - The user is not a member
/// - The change would leave the store without a manager
pub fn update_role(
    persistence: &mut Persistence,
    store_id: i64,
    user_id: &str,
    request: &UpdateRoleRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<MembershipInfo, ApiError> {
    let user_id: UserId = parse_user_id("user_id", user_id)?;
    let role: Role = Role::from_str(request.role.trim()).map_err(translate_domain_error)?;

    let state: State = persistence
        .load_store_state(store_id)
        .map_err(translate_persistence_error)?;
    commit(
        persistence,
        &state,
        Command::UpdateRole {
            user_id: user_id.clone(),
            role,
        },
        authenticated_actor,
    )?;

    info!(store_id, user_id = %user_id, role = %role, "Member role changed");

    let membership: Membership = reread_membership(persistence, store_id, &user_id)?;
    Ok(MembershipInfo::from(&membership))
}

/// Removes a member from a store.
///
/// Managers may remove anyone; any member may remove themself.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is neither a manager nor removing themself
/// - The user is not a member
/// - The removal would leave the store without a manager
pub fn remove_member(
    persistence: &mut Persistence,
    store_id: i64,
    user_id: &str,
    authenticated_actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    let user_id: UserId = parse_user_id("user_id", user_id)?;
    let state: State = persistence
        .load_store_state(store_id)
        .map_err(translate_persistence_error)?;
    commit(
        persistence,
        &state,
        Command::RemoveMember {
            user_id: user_id.clone(),
        },
        authenticated_actor,
    )?;

    info!(store_id, user_id = %user_id, "Member removed");
    Ok(())
}

// ============================================================================
// Store configuration
// ============================================================================

/// Returns a store's configuration.
///
/// # Errors
///
/// Returns an error if the caller is not a member of the store.
pub fn get_config(
    persistence: &mut Persistence,
    store_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<StoreConfigInfo, ApiError> {
    AuthorizationService::require_member(persistence, store_id, authenticated_actor, "get_config")?;
    let config: StoreConfig = persistence
        .get_store_config(store_id)
        .map_err(translate_persistence_error)?;
    Ok(StoreConfigInfo::from(&config))
}

/// Applies a partial update to a store's configuration.
///
/// Existing weeks keep the deadline they were created with.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a manager of the store
/// - A weekday, time or time zone cannot be parsed
/// - The merged configuration is invalid
pub fn update_config(
    persistence: &mut Persistence,
    store_id: i64,
    request: &UpdateConfigRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<StoreConfigInfo, ApiError> {
    let open_days: Option<Vec<OpenDay>> = request
        .open_days
        .as_ref()
        .map(|days| days.iter().map(parse_open_day).collect::<Result<Vec<_>, _>>())
        .transpose()?;
    let patch: StoreConfigPatch = StoreConfigPatch {
        open_days,
        deadline_weekday: request.deadline_weekday.map(parse_weekday).transpose()?,
        deadline_time: request.deadline_time.as_deref().map(parse_time).transpose()?,
        timezone: request.timezone.as_ref().map(|zone| zone.trim().to_string()),
    };

    let state: State = persistence
        .load_store_state(store_id)
        .map_err(translate_persistence_error)?;
    commit(
        persistence,
        &state,
        Command::UpdateConfig { patch },
        authenticated_actor,
    )?;

    info!(store_id, "Store configuration updated");

    let config: StoreConfig = persistence
        .get_store_config(store_id)
        .map_err(translate_persistence_error)?;
    Ok(StoreConfigInfo::from(&config))
}

// ============================================================================
// Weeks
// ============================================================================

/// Returns the week containing `reference_date`, creating it on first use.
///
/// Two callers racing to create the same week both get the single stored
/// row; the loser's duplicate insert is absorbed here.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `store_id` - The store
/// * `request` - Any date inside the wanted week
/// * `authenticated_actor` - The caller, who must be a member
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a member of the store
/// - The date cannot be parsed
/// - The store's deadline cannot be resolved in its time zone
pub fn get_or_create_week(
    persistence: &mut Persistence,
    store_id: i64,
    request: &WeekRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<WeekInfo, ApiError> {
    AuthorizationService::require_member(
        persistence,
        store_id,
        authenticated_actor,
        "get_or_create_week",
    )?;
    let reference_date: Date =
        parse_date(request.reference_date.trim()).map_err(translate_domain_error)?;
    let week_start: Date = week_start_for(reference_date).map_err(translate_domain_error)?;

    if let Some(week) = persistence
        .find_week(store_id, week_start)
        .map_err(translate_persistence_error)?
    {
        return Ok(WeekInfo::from(&week));
    }

    let state: State = persistence
        .load_store_state(store_id)
        .map_err(translate_persistence_error)?;
    let result: TransitionResult = apply(
        &state,
        Command::CreateWeek { week_start },
        &authenticated_actor.user_id,
    )
    .map_err(translate_core_error)?;

    insert_or_reread_week(persistence, store_id, week_start, &result)
}

/// Commits a prepared week insert, resolving a lost creation race.
///
/// If another caller created the same week after the lookup missed, the
/// storage uniqueness check rejects this insert and the winner is
/// returned instead.
///
/// # Errors
///
/// Returns an error if the insert fails for any other reason or the
/// winning week cannot be read back.
pub fn insert_or_reread_week(
    persistence: &mut Persistence,
    store_id: i64,
    week_start: Date,
    result: &TransitionResult,
) -> Result<WeekInfo, ApiError> {
    let week_id: i64 = match persistence.persist_transition(result) {
        Ok(persisted) => {
            let week_id: i64 = created_id(&persisted, "week")?;
            info!(store_id, week_id, %week_start, "Week created");
            week_id
        }
        Err(PersistenceError::UniqueViolation(_)) => {
            debug!(store_id, %week_start, "Week was created concurrently");
            let week: Week = persistence
                .find_week(store_id, week_start)
                .map_err(translate_persistence_error)?
                .ok_or_else(|| ApiError::DependencyFailure {
                    step: String::from("re-reading a concurrently created week"),
                    message: format!("week of {week_start} is missing after a duplicate insert"),
                })?;
            return Ok(WeekInfo::from(&week));
        }
        Err(err) => return Err(translate_persistence_error(err)),
    };

    let week: Week = persistence
        .get_week(week_id)
        .map_err(translate_persistence_error)?;
    Ok(WeekInfo::from(&week))
}

/// Lists a store's most recent weeks, latest first.
///
/// # Errors
///
/// Returns an error if the caller is not a member or `limit` is below 1.
pub fn list_recent_weeks(
    persistence: &mut Persistence,
    store_id: i64,
    limit: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<WeekInfo>, ApiError> {
    if limit < 1 {
        return Err(ApiError::InvalidInput {
            field: String::from("limit"),
            message: format!("limit must be at least 1, got {limit}"),
        });
    }
    AuthorizationService::require_member(
        persistence,
        store_id,
        authenticated_actor,
        "list_recent_weeks",
    )?;
    let weeks: Vec<Week> = persistence
        .list_recent_weeks(store_id, limit)
        .map_err(translate_persistence_error)?;
    Ok(weeks.iter().map(WeekInfo::from).collect())
}

/// Returns one week.
///
/// # Errors
///
/// Returns an error if the week does not exist or the caller is not a
/// member of its store.
pub fn get_week(
    persistence: &mut Persistence,
    week_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<WeekInfo, ApiError> {
    let week: Week = load_week_for_member(persistence, week_id, authenticated_actor, "get_week")?;
    Ok(WeekInfo::from(&week))
}

/// Moves a week along its lifecycle.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a manager of the week's store
/// - The status is not recognized
/// - The transition is not allowed from the current status
pub fn transition_week(
    persistence: &mut Persistence,
    week_id: i64,
    request: &TransitionWeekRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<WeekInfo, ApiError> {
    let target: WeekStatus =
        WeekStatus::from_str(request.status.trim()).map_err(translate_domain_error)?;
    let state: State = persistence
        .load_week_state(week_id)
        .map_err(translate_persistence_error)?;
    commit(
        persistence,
        &state,
        Command::TransitionWeek { target },
        authenticated_actor,
    )?;

    info!(week_id, status = %target, "Week status changed");

    let week: Week = persistence
        .get_week(week_id)
        .map_err(translate_persistence_error)?;
    Ok(WeekInfo::from(&week))
}

// ============================================================================
// Needs
// ============================================================================

/// Lists the needs of a week, by weekday.
///
/// # Errors
///
/// Returns an error if the caller is not a member of the week's store.
pub fn list_needs(
    persistence: &mut Persistence,
    week_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<NeedInfo>, ApiError> {
    load_week_for_member(persistence, week_id, authenticated_actor, "list_needs")?;
    let needs: Vec<Need> = persistence
        .list_needs(week_id)
        .map_err(translate_persistence_error)?;
    Ok(needs.iter().map(NeedInfo::from).collect())
}

/// Declares a staffing need.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a manager of the week's store
/// - The weekday or window is invalid, or `required_staff` is below 1
/// - The week is no longer open
pub fn create_need(
    persistence: &mut Persistence,
    week_id: i64,
    request: &CreateNeedRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<NeedInfo, ApiError> {
    let command: Command = Command::CreateNeed {
        weekday: parse_weekday(request.weekday)?,
        start_time: parse_time(&request.start_time)?,
        end_time: parse_time(&request.end_time)?,
        required_staff: request.required_staff,
    };
    let state: State = persistence
        .load_week_state(week_id)
        .map_err(translate_persistence_error)?;
    let persisted: PersistTransitionResult =
        commit(persistence, &state, command, authenticated_actor)?;
    let need_id: i64 = created_id(&persisted, "need")?;

    info!(week_id, need_id, "Need created");

    let need: Need = persistence
        .get_need(need_id)
        .map_err(translate_persistence_error)?;
    Ok(NeedInfo::from(&need))
}

/// Deletes a need. Shifts that filled it keep existing without a need.
///
/// # Errors
///
/// Returns an error if the need does not exist, the caller is not a
/// manager, or the week is no longer open.
pub fn delete_need(
    persistence: &mut Persistence,
    need_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    let need: Need = persistence
        .get_need(need_id)
        .map_err(translate_persistence_error)?;
    let state: State = persistence
        .load_week_state(need.week_id)
        .map_err(translate_persistence_error)?;
    commit(
        persistence,
        &state,
        Command::DeleteNeed { need_id },
        authenticated_actor,
    )?;

    info!(week_id = need.week_id, need_id, "Need deleted");
    Ok(())
}

// ============================================================================
// Availability
// ============================================================================

/// Lists the availability submitted for a week, by weekday.
///
/// # Errors
///
/// Returns an error if the caller is not a member of the week's store.
pub fn list_availability(
    persistence: &mut Persistence,
    week_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<AvailabilityInfo>, ApiError> {
    load_week_for_member(persistence, week_id, authenticated_actor, "list_availability")?;
    let entries: Vec<Availability> = persistence
        .list_availabilities(week_id)
        .map_err(translate_persistence_error)?;
    Ok(entries.iter().map(AvailabilityInfo::from).collect())
}

/// Submits availability for the caller.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `week_id` - The week
/// * `request` - The window
/// * `authenticated_actor` - The caller, under whose identity the entry is recorded
/// * `now` - The submission instant, checked against the week's deadline
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a member of the week's store
/// - The window is invalid
/// - The week is not open or its deadline has passed
pub fn submit_availability(
    persistence: &mut Persistence,
    week_id: i64,
    request: &SubmitAvailabilityRequest,
    authenticated_actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<AvailabilityInfo, ApiError> {
    let command: Command = Command::SubmitAvailability {
        weekday: parse_weekday(request.weekday)?,
        start_time: parse_time(&request.start_time)?,
        end_time: parse_time(&request.end_time)?,
        submitted_at: now,
    };
    let state: State = persistence
        .load_week_state(week_id)
        .map_err(translate_persistence_error)?;
    let persisted: PersistTransitionResult =
        commit(persistence, &state, command, authenticated_actor)?;
    let availability_id: i64 = created_id(&persisted, "availability")?;

    info!(
        week_id,
        availability_id,
        user_id = %authenticated_actor.user_id,
        "Availability submitted"
    );

    let entry: Availability = persistence
        .get_availability(availability_id)
        .map_err(translate_persistence_error)?;
    Ok(AvailabilityInfo::from(&entry))
}

/// Withdraws one of the caller's availability entries.
///
/// # Errors
///
/// Returns an error if the entry does not exist, belongs to someone else,
/// or the week no longer accepts submissions at `now`.
pub fn withdraw_availability(
    persistence: &mut Persistence,
    availability_id: i64,
    authenticated_actor: &AuthenticatedActor,
    now: OffsetDateTime,
) -> Result<(), ApiError> {
    let entry: Availability = persistence
        .get_availability(availability_id)
        .map_err(translate_persistence_error)?;
    let state: State = persistence
        .load_week_state(entry.week_id)
        .map_err(translate_persistence_error)?;
    commit(
        persistence,
        &state,
        Command::WithdrawAvailability {
            availability_id,
            submitted_at: now,
        },
        authenticated_actor,
    )?;

    info!(week_id = entry.week_id, availability_id, "Availability withdrawn");
    Ok(())
}

// ============================================================================
// Shifts
// ============================================================================

/// Lists every shift of a week.
///
/// # Errors
///
/// Returns an error if the caller is not a member of the week's store.
pub fn list_shifts_for_week(
    persistence: &mut Persistence,
    week_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<ShiftInfo>, ApiError> {
    load_week_for_member(persistence, week_id, authenticated_actor, "list_shifts_for_week")?;
    let shifts: Vec<Shift> = persistence
        .list_shifts_for_week(week_id)
        .map_err(translate_persistence_error)?;
    Ok(shifts.iter().map(ShiftInfo::from).collect())
}

/// Lists the caller's shifts in one week.
///
/// # Errors
///
/// Returns an error if the caller is not a member of the week's store.
pub fn list_my_shifts_in_week(
    persistence: &mut Persistence,
    week_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<ShiftInfo>, ApiError> {
    load_week_for_member(
        persistence,
        week_id,
        authenticated_actor,
        "list_my_shifts_in_week",
    )?;
    let shifts: Vec<Shift> = persistence
        .list_shifts_for_user_in_week(week_id, &authenticated_actor.user_id)
        .map_err(translate_persistence_error)?;
    Ok(shifts.iter().map(ShiftInfo::from).collect())
}

/// Lists the caller's shifts across every store and week, latest week first.
///
/// # Errors
///
/// Returns an error if the database cannot be read.
pub fn list_my_shifts(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<ShiftInfo>, ApiError> {
    let shifts: Vec<Shift> = persistence
        .list_shifts_for_user(&authenticated_actor.user_id)
        .map_err(translate_persistence_error)?;
    Ok(shifts.iter().map(ShiftInfo::from).collect())
}

/// Assigns a shift to a member.
///
/// When `need_id` is given, any window field left out is taken from the
/// need.
///
/// # Errors
///
/// Returns an error if:
/// - The caller is not a manager of the week's store
/// - The target is not a member of the store
/// - The need is not part of this week, or the window is incomplete or invalid
/// - The target already holds an overlapping shift that day
/// - The week is published
pub fn assign_shift(
    persistence: &mut Persistence,
    week_id: i64,
    request: &AssignShiftRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ShiftInfo, ApiError> {
    let user_id: UserId = parse_user_id("user_id", &request.user_id)?;
    let command: Command = Command::AssignShift {
        user_id: user_id.clone(),
        need_id: request.need_id,
        weekday: request.weekday.map(parse_weekday).transpose()?,
        start_time: request.start_time.as_deref().map(parse_time).transpose()?,
        end_time: request.end_time.as_deref().map(parse_time).transpose()?,
    };
    let state: State = persistence
        .load_week_state(week_id)
        .map_err(translate_persistence_error)?;
    let persisted: PersistTransitionResult =
        commit(persistence, &state, command, authenticated_actor)?;
    let shift_id: i64 = created_id(&persisted, "shift")?;

    info!(week_id, shift_id, user_id = %user_id, "Shift assigned");

    let shift: Shift = persistence
        .get_shift(shift_id)
        .map_err(translate_persistence_error)?;
    Ok(ShiftInfo::from(&shift))
}

/// Removes a shift.
///
/// # Errors
///
/// Returns an error if the shift does not exist, the caller is not a
/// manager, or the week is published.
pub fn unassign_shift(
    persistence: &mut Persistence,
    shift_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<(), ApiError> {
    let shift: Shift = persistence
        .get_shift(shift_id)
        .map_err(translate_persistence_error)?;
    let state: State = persistence
        .load_week_state(shift.week_id)
        .map_err(translate_persistence_error)?;
    commit(
        persistence,
        &state,
        Command::UnassignShift { shift_id },
        authenticated_actor,
    )?;

    info!(week_id = shift.week_id, shift_id, "Shift unassigned");
    Ok(())
}

/// Reports how well each need of a week is staffed.
///
/// Read-only; nothing is assigned.
///
/// # Errors
///
/// Returns an error if the caller is not a manager of the week's store.
pub fn week_coverage(
    persistence: &mut Persistence,
    week_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<WeekCoverageResponse, ApiError> {
    let week: Week = persistence
        .get_week(week_id)
        .map_err(translate_persistence_error)?;
    AuthorizationService::require_manager(
        persistence,
        week.store_id,
        authenticated_actor,
        "week_coverage",
    )?;

    let needs: Vec<Need> = persistence
        .list_needs(week_id)
        .map_err(translate_persistence_error)?;
    let availabilities: Vec<Availability> = persistence
        .list_availabilities(week_id)
        .map_err(translate_persistence_error)?;
    let shifts: Vec<Shift> = persistence
        .list_shifts_for_week(week_id)
        .map_err(translate_persistence_error)?;

    let memberships: Vec<Membership> = persistence
        .list_memberships(week.store_id)
        .map_err(translate_persistence_error)?;

    let coverage: Vec<NeedCoverage> =
        compute_coverage(&needs, &availabilities, &shifts, &memberships);
    Ok(WeekCoverageResponse {
        week: WeekInfo::from(&week),
        needs: coverage.iter().map(CoverageInfo::from).collect(),
    })
}

// ============================================================================
// Swaps
// ============================================================================

/// Offers one of the caller's shifts to another member.
///
/// # Errors
///
/// Returns an error if:
/// - The shift does not exist or is not the caller's
/// - The target is the caller or not a member of the store
/// - The shift already has a pending request
pub fn request_swap(
    persistence: &mut Persistence,
    shift_id: i64,
    request: &RequestSwapRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<SwapRequestInfo, ApiError> {
    let target_id: UserId = parse_user_id("target_id", &request.target_id)?;
    let shift: Shift = persistence
        .get_shift(shift_id)
        .map_err(translate_persistence_error)?;
    let state: State = persistence
        .load_week_state(shift.week_id)
        .map_err(translate_persistence_error)?;
    let persisted: PersistTransitionResult = commit(
        persistence,
        &state,
        Command::RequestSwap {
            shift_id,
            target_id: target_id.clone(),
        },
        authenticated_actor,
    )?;
    let swap_id: i64 = created_id(&persisted, "swap request")?;

    info!(shift_id, swap_id, target_id = %target_id, "Swap requested");

    let swap: SwapRequest = persistence
        .get_swap_request(swap_id)
        .map_err(translate_persistence_error)?;
    Ok(SwapRequestInfo::from(&swap))
}

/// Accepts or rejects a pending swap.
///
/// Acceptance moves the shift to the target in the same transaction that
/// records the decision.
///
/// # Errors
///
/// Returns an error if:
/// - The swap does not exist
/// - The caller is not a manager of the store
/// - The swap has already been decided
/// - Accepting would double-book the target
pub fn decide_swap(
    persistence: &mut Persistence,
    swap_id: i64,
    request: &DecideSwapRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<SwapRequestInfo, ApiError> {
    let decision: SwapDecision =
        SwapDecision::from_str(request.decision.trim()).map_err(translate_domain_error)?;
    let swap: SwapRequest = persistence
        .get_swap_request(swap_id)
        .map_err(translate_persistence_error)?;
    let shift: Shift = persistence
        .get_shift(swap.shift_id)
        .map_err(translate_persistence_error)?;
    let state: State = persistence
        .load_week_state(shift.week_id)
        .map_err(translate_persistence_error)?;
    commit(
        persistence,
        &state,
        Command::DecideSwap { swap_id, decision },
        authenticated_actor,
    )?;

    let swap: SwapRequest = persistence
        .get_swap_request(swap_id)
        .map_err(translate_persistence_error)?;
    info!(swap_id, status = %swap.status, "Swap decided");
    Ok(SwapRequestInfo::from(&swap))
}

/// Lists a store's swap requests, newest first.
///
/// Managers see every request; staff see only requests they made or were
/// offered.
///
/// # Errors
///
/// Returns an error if the caller is not a member of the store.
pub fn list_swap_requests(
    persistence: &mut Persistence,
    store_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<SwapRequestInfo>, ApiError> {
    let role: Role = AuthorizationService::require_member(
        persistence,
        store_id,
        authenticated_actor,
        "list_swap_requests",
    )?;
    let swaps: Vec<SwapRequest> = persistence
        .list_swap_requests_for_store(store_id)
        .map_err(translate_persistence_error)?;

    let me: &UserId = &authenticated_actor.user_id;
    Ok(swaps
        .iter()
        .filter(|swap| role == Role::Manager || swap.requester_id == *me || swap.target_id == *me)
        .map(SwapRequestInfo::from)
        .collect())
}

// ============================================================================
// Audit and profiles
// ============================================================================

/// Lists a store's audit trail, newest first.
///
/// # Errors
///
/// Returns an error if the caller is not a manager of the store.
pub fn list_audit_events(
    persistence: &mut Persistence,
    store_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<Vec<AuditEventInfo>, ApiError> {
    AuthorizationService::require_manager(
        persistence,
        store_id,
        authenticated_actor,
        "list_audit_events",
    )?;
    let events: Vec<AuditEvent> = persistence
        .list_audit_events(store_id)
        .map_err(translate_persistence_error)?;
    Ok(events.iter().map(AuditEventInfo::from).collect())
}

fn describe_profile(profile: &ProfileData) -> String {
    format!(
        "display_name={},email={}",
        profile.display_name.as_deref().unwrap_or("-"),
        profile.email.as_deref().unwrap_or("-")
    )
}

/// Records the caller's identity-provider claims as their profile.
///
/// # Returns
///
/// * `Ok(true)` if the stored profile changed
/// * `Ok(false)` if it was already current
///
/// # Errors
///
/// Returns an error if the database cannot be written.
pub fn sync_profile(
    persistence: &mut Persistence,
    authenticated_actor: &AuthenticatedActor,
) -> Result<bool, ApiError> {
    let profile: ProfileData = authenticated_actor.to_profile();
    let before: StateSnapshot = persistence
        .get_profile(&authenticated_actor.user_id)
        .map_err(translate_persistence_error)?
        .map_or_else(StateSnapshot::absent, |stored| {
            StateSnapshot::new(describe_profile(&stored))
        });

    let audit_event: AuditEvent = AuditEvent::new(
        None,
        authenticated_actor.to_audit_actor(),
        Action::new(
            String::from("SyncProfile"),
            Some(format!("Profile of '{}'", authenticated_actor.user_id)),
        ),
        before,
        StateSnapshot::new(describe_profile(&profile)),
    );

    let changed: bool = persistence
        .sync_profile(&profile, &audit_event)
        .map_err(translate_persistence_error)?;
    if changed {
        debug!(user_id = %authenticated_actor.user_id, "Profile synced");
    }
    Ok(changed)
}
