// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{SwapStatus, WeekStatus};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Store name is empty or invalid.
    InvalidStoreName(String),
    /// Role string is not a known role.
    InvalidRole(String),
    /// Weekday index is outside `0..=6`.
    InvalidWeekday(i64),
    /// A time-of-day value could not be parsed.
    InvalidTime {
        /// The rejected input.
        value: String,
        /// The parser's message.
        error: String,
    },
    /// A date value could not be parsed.
    InvalidDate {
        /// The rejected input.
        value: String,
        /// The parser's message.
        error: String,
    },
    /// End time is not strictly after start time.
    InvalidTimeRange {
        /// Formatted start time.
        start: String,
        /// Formatted end time.
        end: String,
    },
    /// Required headcount is not a positive integer.
    InvalidRequiredStaff(i64),
    /// Open-days schedule is malformed.
    InvalidOpenDays(String),
    /// Time zone is not a known IANA zone.
    InvalidTimezone(String),
    /// Only one of deadline weekday and deadline time is set.
    IncompleteDeadline,
    /// The deadline wall-clock time does not map to a single instant.
    UnresolvableDeadline {
        /// The deadline date.
        date: String,
        /// The deadline time.
        time: String,
        /// The store time zone.
        timezone: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Week status string is not a known status.
    InvalidWeekStatus(String),
    /// Week status transition is not allowed.
    InvalidWeekTransition {
        /// Current status.
        from: WeekStatus,
        /// Requested status.
        to: WeekStatus,
    },
    /// The week's status forbids the operation.
    WeekClosed {
        /// The week.
        week_id: i64,
        /// Current status.
        status: WeekStatus,
        /// The refused operation.
        operation: &'static str,
    },
    /// Availability submission deadline has passed.
    SubmissionClosed {
        /// The week.
        week_id: i64,
        /// The deadline (RFC 3339).
        due_at: String,
    },
    /// Swap status string is not a known status.
    InvalidSwapStatus(String),
    /// Swap decision string is not `accepted` or `rejected`.
    InvalidSwapDecision(String),
    /// The swap request has already been decided.
    SwapNotPending {
        /// The swap request.
        swap_id: i64,
        /// Its terminal status.
        status: SwapStatus,
    },
    /// A pending swap request already exists for the shift.
    PendingSwapExists {
        /// The shift.
        shift_id: i64,
    },
    /// A swap request targets its own requester.
    SelfSwap,
    /// The user already works an overlapping shift that day.
    DoubleBooking {
        /// The double-booked user.
        user_id: String,
        /// Weekday index (0 = Monday).
        weekday: u8,
        /// The shift already held.
        existing_shift_id: i64,
    },
    /// The user is already a member of the store.
    DuplicateMembership {
        /// The store.
        store_id: i64,
        /// The user.
        user_id: String,
    },
    /// The change would leave the store without a manager.
    LastManager {
        /// The store.
        store_id: i64,
    },
    /// The referenced user is not a member of the store.
    NotAMember {
        /// The store.
        store_id: i64,
        /// The user.
        user_id: String,
    },
    /// A shift is missing a field that no need supplies.
    IncompleteShift {
        /// The missing field.
        field: &'static str,
    },
    /// The referenced need does not belong to the week.
    NeedNotInWeek {
        /// The need.
        need_id: i64,
        /// The week.
        week_id: i64,
    },
    /// Store does not exist.
    StoreNotFound(i64),
    /// Week does not exist.
    WeekNotFound(i64),
    /// Need does not exist.
    NeedNotFound(i64),
    /// Availability entry does not exist.
    AvailabilityNotFound(i64),
    /// Shift does not exist.
    ShiftNotFound(i64),
    /// Swap request does not exist.
    SwapRequestNotFound(i64),
    /// Membership does not exist.
    MembershipNotFound {
        /// The store.
        store_id: i64,
        /// The user.
        user_id: String,
    },
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidStoreName(msg) => write!(f, "Invalid store name: {msg}"),
            Self::InvalidRole(role) => {
                write!(f, "Invalid role: '{role}'. Must be 'manager' or 'staff'")
            }
            Self::InvalidWeekday(value) => {
                write!(f, "Invalid weekday: {value}. Must be between 0 (Monday) and 6 (Sunday)")
            }
            Self::InvalidTime { value, error } => {
                write!(f, "Invalid time '{value}': {error}")
            }
            Self::InvalidDate { value, error } => {
                write!(f, "Invalid date '{value}': {error}")
            }
            Self::InvalidTimeRange { start, end } => {
                write!(f, "End time {end} must be after start time {start}")
            }
            Self::InvalidRequiredStaff(count) => {
                write!(f, "Invalid required staff: {count}. Must be greater than 0")
            }
            Self::InvalidOpenDays(msg) => write!(f, "Invalid open days: {msg}"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: '{tz}'"),
            Self::IncompleteDeadline => write!(
                f,
                "Deadline weekday and deadline time must be set together"
            ),
            Self::UnresolvableDeadline {
                date,
                time,
                timezone,
            } => {
                write!(
                    f,
                    "Deadline {date} {time} does not resolve to a single instant in {timezone}"
                )
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::InvalidWeekStatus(status) => write!(f, "Invalid week status: '{status}'"),
            Self::InvalidWeekTransition { from, to } => {
                write!(f, "Week cannot move from {from} to {to}")
            }
            Self::WeekClosed {
                week_id,
                status,
                operation,
            } => {
                write!(f, "Week {week_id} is {status}: cannot {operation}")
            }
            Self::SubmissionClosed { week_id, due_at } => {
                write!(f, "Availability for week {week_id} closed at {due_at}")
            }
            Self::InvalidSwapStatus(status) => write!(f, "Invalid swap status: '{status}'"),
            Self::InvalidSwapDecision(decision) => write!(
                f,
                "Invalid swap decision: '{decision}'. Must be 'accepted' or 'rejected'"
            ),
            Self::SwapNotPending { swap_id, status } => {
                write!(f, "Swap request {swap_id} was already {status}")
            }
            Self::PendingSwapExists { shift_id } => {
                write!(f, "Shift {shift_id} already has a pending swap request")
            }
            Self::SelfSwap => write!(f, "A shift cannot be swapped to its current owner"),
            Self::DoubleBooking {
                user_id,
                weekday,
                existing_shift_id,
            } => {
                write!(
                    f,
                    "User '{user_id}' already works overlapping shift {existing_shift_id} on weekday {weekday}"
                )
            }
            Self::DuplicateMembership { store_id, user_id } => {
                write!(f, "User '{user_id}' is already a member of store {store_id}")
            }
            Self::LastManager { store_id } => {
                write!(f, "Store {store_id} must keep at least one manager")
            }
            Self::NotAMember { store_id, user_id } => {
                write!(f, "User '{user_id}' is not a member of store {store_id}")
            }
            Self::IncompleteShift { field } => {
                write!(f, "Shift {field} is required when no need is referenced")
            }
            Self::NeedNotInWeek { need_id, week_id } => {
                write!(f, "Need {need_id} does not belong to week {week_id}")
            }
            Self::StoreNotFound(id) => write!(f, "Store {id} not found"),
            Self::WeekNotFound(id) => write!(f, "Week {id} not found"),
            Self::NeedNotFound(id) => write!(f, "Need {id} not found"),
            Self::AvailabilityNotFound(id) => write!(f, "Availability {id} not found"),
            Self::ShiftNotFound(id) => write!(f, "Shift {id} not found"),
            Self::SwapRequestNotFound(id) => write!(f, "Swap request {id} not found"),
            Self::MembershipNotFound { store_id, user_id } => {
                write!(f, "User '{user_id}' has no membership in store {store_id}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
