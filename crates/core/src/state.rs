// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftly_audit::{AuditEvent, StateSnapshot};
use shiftly_domain::{
    Availability, Membership, Need, Role, Shift, StoreConfig, SwapRequest, SwapStatus, TimeRange,
    UserId, Week, WeekStatus,
};
use time::{Date, OffsetDateTime, Weekday};

/// The slice of a store's state a command is evaluated against.
///
/// State is scoped to one store and, for week-level commands, one week.
/// Week-scoped collections are empty when `week` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// The store this state is scoped to.
    pub store_id: i64,
    /// Every membership of the store.
    pub memberships: Vec<Membership>,
    /// The store configuration.
    pub config: StoreConfig,
    /// The week this state is scoped to, if any.
    pub week: Option<Week>,
    /// Needs of the week.
    pub needs: Vec<Need>,
    /// Availability submitted for the week.
    pub availabilities: Vec<Availability>,
    /// Shifts of the week.
    pub shifts: Vec<Shift>,
    /// Swap requests for shifts of the week.
    pub swap_requests: Vec<SwapRequest>,
}

impl State {
    /// Creates a store-level state with no week loaded.
    #[must_use]
    pub const fn new(store_id: i64, memberships: Vec<Membership>, config: StoreConfig) -> Self {
        Self {
            store_id,
            memberships,
            config,
            week: None,
            needs: Vec::new(),
            availabilities: Vec::new(),
            shifts: Vec::new(),
            swap_requests: Vec::new(),
        }
    }

    /// Returns the role of `user_id` in this store, if a member.
    #[must_use]
    pub fn role_of(&self, user_id: &UserId) -> Option<Role> {
        self.memberships
            .iter()
            .find(|membership| membership.user_id == *user_id)
            .map(|membership| membership.role)
    }

    /// Counts the store's managers.
    #[must_use]
    pub fn manager_count(&self) -> usize {
        self.memberships
            .iter()
            .filter(|membership| membership.role == Role::Manager)
            .count()
    }

    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        let week: String = self.week.as_ref().map_or_else(
            || String::from("none"),
            |week| format!("{}({})", week.week_start, week.status),
        );
        StateSnapshot::new(format!(
            "store={},members={},week={},needs={},shifts={}",
            self.store_id,
            self.memberships.len(),
            week,
            self.needs.len(),
            self.shifts.len()
        ))
    }
}

/// A shift ownership transfer carried out by an accepted swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftTransfer {
    /// The shift.
    pub shift_id: i64,
    /// The shift's week.
    pub week_id: i64,
    /// The new owner.
    pub new_owner: UserId,
    /// The shift's weekday.
    pub weekday: Weekday,
    /// The shift's window.
    pub range: TimeRange,
}

/// The storage change a successful command requires.
///
/// Each mutation is written together with its audit event in a single
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Insert a membership.
    InsertMembership(Membership),
    /// Change a membership's role.
    UpdateMembershipRole {
        /// The member.
        user_id: UserId,
        /// The new role.
        role: Role,
    },
    /// Delete a membership.
    DeleteMembership {
        /// The member.
        user_id: UserId,
    },
    /// Write the whole store configuration.
    UpsertConfig(StoreConfig),
    /// Insert a week.
    InsertWeek {
        /// The Monday that starts the week.
        week_start: Date,
        /// The computed submission deadline.
        due_at: Option<OffsetDateTime>,
    },
    /// Change a week's status.
    UpdateWeekStatus {
        /// The week.
        week_id: i64,
        /// The new status.
        status: WeekStatus,
    },
    /// Insert a need.
    InsertNeed {
        /// The week.
        week_id: i64,
        /// The weekday.
        weekday: Weekday,
        /// The window.
        range: TimeRange,
        /// Required headcount.
        required_staff: u32,
    },
    /// Delete a need, detaching its shifts.
    DeleteNeed {
        /// The need.
        need_id: i64,
    },
    /// Insert an availability entry.
    InsertAvailability {
        /// The week.
        week_id: i64,
        /// The member.
        user_id: UserId,
        /// The weekday.
        weekday: Weekday,
        /// The window.
        range: TimeRange,
    },
    /// Delete an availability entry.
    DeleteAvailability {
        /// The entry.
        availability_id: i64,
    },
    /// Insert a shift.
    ///
    /// Storage must re-check the owner for overlapping shifts under the
    /// write lock before inserting.
    InsertShift {
        /// The week.
        week_id: i64,
        /// The owner.
        user_id: UserId,
        /// The weekday.
        weekday: Weekday,
        /// The window.
        range: TimeRange,
        /// The need the shift fills.
        need_id: Option<i64>,
    },
    /// Delete a shift.
    DeleteShift {
        /// The shift.
        shift_id: i64,
    },
    /// Insert a pending swap request.
    InsertSwapRequest {
        /// The shift.
        shift_id: i64,
        /// The current owner.
        requester_id: UserId,
        /// The proposed new owner.
        target_id: UserId,
    },
    /// Record a swap decision, transferring the shift when accepted.
    DecideSwap {
        /// The swap request.
        swap_id: i64,
        /// The terminal status.
        status: SwapStatus,
        /// The deciding manager.
        decided_by: UserId,
        /// The ownership transfer, present only for acceptance.
        transfer: Option<ShiftTransfer>,
    },
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The storage change to apply.
    pub mutation: Mutation,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// The result of validating a store creation.
///
/// Store creation happens before any store state exists, so it has its own
/// result type. The store id is assigned by storage, which also binds the
/// audit event and the configuration to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCreation {
    /// The validated store name.
    pub name: String,
    /// The creator, who becomes the first manager.
    pub created_by: UserId,
    /// The default configuration.
    pub config: StoreConfig,
    /// The audit event recording the creation.
    pub audit_event: AuditEvent,
}
