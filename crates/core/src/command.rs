// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shiftly_domain::{Role, StoreConfigPatch, SwapDecision, UserId, WeekStatus};
use time::{Date, OffsetDateTime, Time, Weekday};

/// A command represents user intent as data only.
///
/// Commands are the only way to request state changes within a store.
/// None of them carries a role: privileges are always read from the
/// store's memberships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Join the store as staff.
    JoinStore,
    /// Change a member's role.
    UpdateRole {
        /// The member.
        user_id: UserId,
        /// The new role.
        role: Role,
    },
    /// Remove a member, or leave the store when `user_id` is the actor.
    RemoveMember {
        /// The member.
        user_id: UserId,
    },
    /// Partially update the store configuration.
    UpdateConfig {
        /// Fields to replace.
        patch: StoreConfigPatch,
    },
    /// Materialize the week starting on `week_start`.
    CreateWeek {
        /// The Monday that starts the week.
        week_start: Date,
    },
    /// Move the week to another lifecycle status.
    TransitionWeek {
        /// The requested status.
        target: WeekStatus,
    },
    /// Declare a staffing need.
    CreateNeed {
        /// The weekday.
        weekday: Weekday,
        /// Window start.
        start_time: Time,
        /// Window end.
        end_time: Time,
        /// Required headcount, as supplied.
        required_staff: i64,
    },
    /// Delete a staffing need.
    DeleteNeed {
        /// The need.
        need_id: i64,
    },
    /// Submit availability under the actor's own identity.
    SubmitAvailability {
        /// The weekday.
        weekday: Weekday,
        /// Window start.
        start_time: Time,
        /// Window end.
        end_time: Time,
        /// When the submission was made.
        submitted_at: OffsetDateTime,
    },
    /// Withdraw one of the actor's availability entries.
    WithdrawAvailability {
        /// The entry.
        availability_id: i64,
        /// When the withdrawal was made.
        submitted_at: OffsetDateTime,
    },
    /// Assign a member to a shift.
    ///
    /// When `need_id` is given, omitted window fields default to the need's.
    AssignShift {
        /// The member who will own the shift.
        user_id: UserId,
        /// The need the shift fills.
        need_id: Option<i64>,
        /// Weekday override.
        weekday: Option<Weekday>,
        /// Window start override.
        start_time: Option<Time>,
        /// Window end override.
        end_time: Option<Time>,
    },
    /// Delete a shift.
    UnassignShift {
        /// The shift.
        shift_id: i64,
    },
    /// Ask for a shift to be transferred to another member.
    RequestSwap {
        /// The shift.
        shift_id: i64,
        /// The proposed new owner.
        target_id: UserId,
    },
    /// Accept or reject a pending swap request.
    DecideSwap {
        /// The swap request.
        swap_id: i64,
        /// The decision.
        decision: SwapDecision,
    },
}

impl Command {
    /// The audit action name of this command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::JoinStore => "JoinStore",
            Self::UpdateRole { .. } => "UpdateRole",
            Self::RemoveMember { .. } => "RemoveMember",
            Self::UpdateConfig { .. } => "UpdateConfig",
            Self::CreateWeek { .. } => "CreateWeek",
            Self::TransitionWeek { .. } => "TransitionWeek",
            Self::CreateNeed { .. } => "CreateNeed",
            Self::DeleteNeed { .. } => "DeleteNeed",
            Self::SubmitAvailability { .. } => "SubmitAvailability",
            Self::WithdrawAvailability { .. } => "WithdrawAvailability",
            Self::AssignShift { .. } => "AssignShift",
            Self::UnassignShift { .. } => "UnassignShift",
            Self::RequestSwap { .. } => "RequestSwap",
            Self::DecideSwap { .. } => "DecideSwap",
        }
    }
}
