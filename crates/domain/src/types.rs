// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time, Weekday};

/// Opaque user identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId {
    value: String,
}

impl UserId {
    /// Creates a new `UserId`.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// A member's role within a store.
///
/// Roles are always read from stored memberships; callers never supply them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Manages the store: configuration, needs, assignments, swap decisions.
    Manager,
    /// Submits availability and requests swaps of their own shifts.
    Staff,
}

impl Role {
    /// Converts this role to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "manager",
            Self::Staff => "staff",
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Self::Manager),
            "staff" => Ok(Self::Staff),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Converts a weekday index (0 = Monday … 6 = Sunday) into a `Weekday`.
///
/// # Errors
///
/// Returns an error if the index is outside `0..=6`.
pub fn weekday_from_index(index: i64) -> Result<Weekday, DomainError> {
    let offset: u8 = u8::try_from(index)
        .ok()
        .filter(|value| *value <= 6)
        .ok_or(DomainError::InvalidWeekday(index))?;
    Ok(Weekday::Monday.nth_next(offset))
}

/// Returns the weekday index (0 = Monday … 6 = Sunday).
#[must_use]
pub const fn weekday_index(weekday: Weekday) -> u8 {
    weekday.number_days_from_monday()
}

/// Parses an `HH:MM` wall-clock time.
///
/// # Errors
///
/// Returns an error if the value is not a valid 24-hour `HH:MM` time.
pub fn parse_time_of_day(value: &str) -> Result<Time, DomainError> {
    Time::parse(value.trim(), format_description!("[hour]:[minute]")).map_err(|e| {
        DomainError::InvalidTime {
            value: value.to_string(),
            error: e.to_string(),
        }
    })
}

/// Formats a wall-clock time as `HH:MM`.
#[must_use]
pub fn format_time_of_day(time: Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns an error if the value is not a valid ISO 8601 calendar date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::InvalidDate {
            value: value.to_string(),
            error: e.to_string(),
        }
    })
}

/// A half-open wall-clock interval `[start, end)` within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    start: Time,
    end: Time,
}

impl TimeRange {
    /// Creates a new `TimeRange`.
    ///
    /// # Errors
    ///
    /// Returns an error if `end` is not strictly after `start`.
    pub fn new(start: Time, end: Time) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidTimeRange {
                start: format_time_of_day(start),
                end: format_time_of_day(end),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses a range from two `HH:MM` strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either value fails to parse or the range is empty.
    pub fn parse(start: &str, end: &str) -> Result<Self, DomainError> {
        Self::new(parse_time_of_day(start)?, parse_time_of_day(end)?)
    }

    /// Returns the inclusive start.
    #[must_use]
    pub const fn start(&self) -> Time {
        self.start
    }

    /// Returns the exclusive end.
    #[must_use]
    pub const fn end(&self) -> Time {
        self.end
    }

    /// Returns whether the two intervals share any instant.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Returns whether `other` lies entirely within this interval.
    #[must_use]
    pub fn contains(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}",
            format_time_of_day(self.start),
            format_time_of_day(self.end)
        )
    }
}

/// A store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    /// Database-assigned identifier.
    pub store_id: i64,
    /// Display name.
    pub name: String,
    /// The manager who created the store.
    pub created_by: UserId,
}

/// The binding of a user to a store with a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// The store.
    pub store_id: i64,
    /// The member.
    pub user_id: UserId,
    /// The member's role.
    pub role: Role,
}

/// Opening hours for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenDay {
    /// The weekday.
    pub weekday: Weekday,
    /// Whether the store opens that day.
    pub is_open: bool,
    /// Opening time.
    pub open_time: Time,
    /// Closing time.
    pub close_time: Time,
}

/// Default opening time for a newly created store.
pub const DEFAULT_OPEN_TIME: Time = time::macros::time!(9:00);
/// Default closing time for a newly created store.
pub const DEFAULT_CLOSE_TIME: Time = time::macros::time!(18:00);
/// Time zone used when a store has not declared one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Per-store operating schedule and submission deadline rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// The store.
    pub store_id: i64,
    /// Exactly one entry per weekday, Monday first.
    pub open_days: Vec<OpenDay>,
    /// Weekday on which availability submission closes.
    pub deadline_weekday: Option<Weekday>,
    /// Wall-clock time at which availability submission closes.
    pub deadline_time: Option<Time>,
    /// IANA time zone of the store's wall clock.
    pub timezone: String,
}

/// A partial update to a `StoreConfig`. `None` fields keep their prior value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfigPatch {
    /// Replacement open-days schedule.
    pub open_days: Option<Vec<OpenDay>>,
    /// Replacement deadline weekday.
    pub deadline_weekday: Option<Weekday>,
    /// Replacement deadline time.
    pub deadline_time: Option<Time>,
    /// Replacement time zone.
    pub timezone: Option<String>,
}

impl StoreConfig {
    /// Creates the default configuration: open every day 09:00-18:00, no deadline, UTC.
    #[must_use]
    pub fn with_defaults(store_id: i64) -> Self {
        Self {
            store_id,
            open_days: default_open_days(),
            deadline_weekday: None,
            deadline_time: None,
            timezone: String::from(DEFAULT_TIMEZONE),
        }
    }

    /// Applies a partial update, validating the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged configuration is invalid.
    pub fn apply_patch(&self, patch: StoreConfigPatch) -> Result<Self, DomainError> {
        let merged: Self = Self {
            store_id: self.store_id,
            open_days: patch.open_days.unwrap_or_else(|| self.open_days.clone()),
            deadline_weekday: patch.deadline_weekday.or(self.deadline_weekday),
            deadline_time: patch.deadline_time.or(self.deadline_time),
            timezone: patch.timezone.unwrap_or_else(|| self.timezone.clone()),
        };
        crate::validation::validate_store_config(&merged)?;
        Ok(merged)
    }

    /// Returns the deadline if both weekday and time are configured.
    #[must_use]
    pub const fn deadline(&self) -> Option<(Weekday, Time)> {
        match (self.deadline_weekday, self.deadline_time) {
            (Some(weekday), Some(time)) => Some((weekday, time)),
            _ => None,
        }
    }
}

/// Returns the default schedule: every day open 09:00-18:00, Monday first.
#[must_use]
pub fn default_open_days() -> Vec<OpenDay> {
    (0..7)
        .map(|offset| OpenDay {
            weekday: Weekday::Monday.nth_next(offset),
            is_open: true,
            open_time: DEFAULT_OPEN_TIME,
            close_time: DEFAULT_CLOSE_TIME,
        })
        .collect()
}

/// Lifecycle state of a scheduling week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WeekStatus {
    /// Needs and availability are being collected.
    #[default]
    Open,
    /// Collection is closed; the manager is assigning.
    Locked,
    /// The schedule is final; only swaps change it.
    Published,
}

impl WeekStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Locked => "locked",
            Self::Published => "published",
        }
    }

    /// Checks if a transition from this state to another is valid.
    ///
    /// Valid transitions are:
    /// - Open → Locked
    /// - Locked → Open
    /// - Locked → Published
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Locked) | (Self::Locked, Self::Open | Self::Published)
        )
    }

    /// Whether needs and availability may still change.
    #[must_use]
    pub const fn accepts_submissions(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Whether shifts may still be assigned or removed.
    #[must_use]
    pub const fn accepts_assignments(&self) -> bool {
        !matches!(self, Self::Published)
    }
}

impl FromStr for WeekStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "locked" => Ok(Self::Locked),
            "published" => Ok(Self::Published),
            _ => Err(DomainError::InvalidWeekStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for WeekStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A Monday-anchored scheduling week of one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    /// Database-assigned identifier.
    pub week_id: i64,
    /// The store.
    pub store_id: i64,
    /// The Monday that starts the week.
    pub week_start: Date,
    /// When availability submission closes, if the store has a deadline.
    pub due_at: Option<OffsetDateTime>,
    /// Lifecycle status.
    pub status: WeekStatus,
}

impl Week {
    /// Returns whether availability may be submitted at `now`.
    #[must_use]
    pub fn accepts_availability_at(&self, now: OffsetDateTime) -> bool {
        self.status.accepts_submissions() && self.due_at.is_none_or(|due| now < due)
    }
}

/// A manager-declared staffing requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Need {
    /// Database-assigned identifier.
    pub need_id: i64,
    /// The week.
    pub week_id: i64,
    /// The weekday.
    pub weekday: Weekday,
    /// The time window.
    pub range: TimeRange,
    /// Required headcount (at least 1).
    pub required_staff: u32,
}

/// A staff-declared window of availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Database-assigned identifier.
    pub availability_id: i64,
    /// The week.
    pub week_id: i64,
    /// The member who is available.
    pub user_id: UserId,
    /// The weekday.
    pub weekday: Weekday,
    /// The time window.
    pub range: TimeRange,
}

/// A confirmed single-owner assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    /// Database-assigned identifier.
    pub shift_id: i64,
    /// The week.
    pub week_id: i64,
    /// The sole owner.
    pub user_id: UserId,
    /// The weekday.
    pub weekday: Weekday,
    /// The time window.
    pub range: TimeRange,
    /// The need this shift fills, if any.
    pub need_id: Option<i64>,
}

/// Status of a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SwapStatus {
    /// Awaiting a manager decision.
    #[default]
    Pending,
    /// Approved; the shift now belongs to the target.
    Accepted,
    /// Declined; the shift is unchanged.
    Rejected,
}

impl SwapStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Only `pending` may move, and only to a terminal state.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Accepted | Self::Rejected)
        )
    }

    /// Returns whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl FromStr for SwapStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidSwapStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for SwapStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A manager's decision on a pending swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDecision {
    /// Transfer the shift to the target.
    Accept,
    /// Leave the shift with its owner.
    Reject,
}

impl SwapDecision {
    /// The status a pending request moves to under this decision.
    #[must_use]
    pub const fn target_status(&self) -> SwapStatus {
        match self {
            Self::Accept => SwapStatus::Accepted,
            Self::Reject => SwapStatus::Rejected,
        }
    }
}

impl FromStr for SwapDecision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(Self::Accept),
            "rejected" => Ok(Self::Reject),
            _ => Err(DomainError::InvalidSwapDecision(s.to_string())),
        }
    }
}

/// A request to transfer a shift to another member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRequest {
    /// Database-assigned identifier.
    pub swap_id: i64,
    /// The shift to transfer.
    pub shift_id: i64,
    /// The shift's owner at request time.
    pub requester_id: UserId,
    /// The proposed new owner.
    pub target_id: UserId,
    /// Current status.
    pub status: SwapStatus,
    /// The manager who decided, once decided.
    pub decided_by: Option<UserId>,
}
