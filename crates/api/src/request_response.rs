// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Weekdays travel as integers (0 = Monday), times of day as `HH:MM`,
//! dates as ISO `YYYY-MM-DD` and instants as RFC 3339 in UTC.

use shiftly_audit::AuditEvent;
use shiftly_domain::{
    Availability, Membership, Need, NeedCoverage, OpenDay, Shift, Store, StoreConfig, SwapRequest,
    Week, format_time_of_day, weekday_index,
};
use shiftly_persistence::{MemberData, StoreMembershipData};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// API request to create a store.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateStoreRequest {
    /// The store's display name.
    pub name: String,
}

/// API request to change a member's role.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateRoleRequest {
    /// `manager` or `staff`.
    pub role: String,
}

/// API request for a partial store configuration update.
///
/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct UpdateConfigRequest {
    /// Replacement schedule; must list every weekday once.
    #[serde(default)]
    pub open_days: Option<Vec<OpenDayInfo>>,
    /// Deadline weekday (0 = Monday).
    #[serde(default)]
    pub deadline_weekday: Option<i64>,
    /// Deadline wall-clock time.
    #[serde(default)]
    pub deadline_time: Option<String>,
    /// IANA time zone.
    #[serde(default)]
    pub timezone: Option<String>,
}

/// API request to resolve the week containing a date.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WeekRequest {
    /// Any date inside the wanted week.
    pub reference_date: String,
}

/// API request to move a week to another lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TransitionWeekRequest {
    /// `open`, `locked` or `published`.
    pub status: String,
}

/// API request to declare a staffing need.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateNeedRequest {
    /// Weekday (0 = Monday).
    pub weekday: i64,
    /// Window start.
    pub start_time: String,
    /// Window end.
    pub end_time: String,
    /// Required headcount.
    pub required_staff: i64,
}

/// API request to submit availability for the caller.
///
/// Availability is always recorded under the authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubmitAvailabilityRequest {
    /// Weekday (0 = Monday).
    pub weekday: i64,
    /// Window start.
    pub start_time: String,
    /// Window end.
    pub end_time: String,
}

/// API request to assign a shift.
///
/// With `need_id` set, omitted window fields default to the need's.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AssignShiftRequest {
    /// The member who will own the shift.
    pub user_id: String,
    /// The need this shift fills.
    #[serde(default)]
    pub need_id: Option<i64>,
    /// Weekday (0 = Monday).
    #[serde(default)]
    pub weekday: Option<i64>,
    /// Window start.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Window end.
    #[serde(default)]
    pub end_time: Option<String>,
}

/// API request to offer a shift to another member.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RequestSwapRequest {
    /// The proposed new owner.
    pub target_id: String,
}

/// API request to decide a pending swap.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DecideSwapRequest {
    /// `accepted` or `rejected`.
    pub decision: String,
}

/// A store.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoreInfo {
    /// The store identifier.
    pub store_id: i64,
    /// The display name.
    pub name: String,
    /// The creating manager.
    pub created_by: String,
}

impl From<&Store> for StoreInfo {
    fn from(store: &Store) -> Self {
        Self {
            store_id: store.store_id,
            name: store.name.clone(),
            created_by: store.created_by.value().to_string(),
        }
    }
}

/// A store together with the caller's role in it.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoreSummaryInfo {
    /// The store.
    pub store: StoreInfo,
    /// The caller's role.
    pub role: String,
}

impl From<&StoreMembershipData> for StoreSummaryInfo {
    fn from(data: &StoreMembershipData) -> Self {
        Self {
            store: StoreInfo::from(&data.store),
            role: data.role.as_str().to_string(),
        }
    }
}

/// A membership.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MembershipInfo {
    /// The store.
    pub store_id: i64,
    /// The member.
    pub user_id: String,
    /// `manager` or `staff`.
    pub role: String,
}

impl From<&Membership> for MembershipInfo {
    fn from(membership: &Membership) -> Self {
        Self {
            store_id: membership.store_id,
            user_id: membership.user_id.value().to_string(),
            role: membership.role.as_str().to_string(),
        }
    }
}

/// A member row of the member-management view.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MemberInfo {
    /// The member.
    pub user_id: String,
    /// `manager` or `staff`.
    pub role: String,
    /// Display name, when a profile is known.
    pub display_name: Option<String>,
    /// Email, when a profile is known.
    pub email: Option<String>,
}

impl From<&MemberData> for MemberInfo {
    fn from(data: &MemberData) -> Self {
        Self {
            user_id: data.membership.user_id.value().to_string(),
            role: data.membership.role.as_str().to_string(),
            display_name: data.display_name.clone(),
            email: data.email.clone(),
        }
    }
}

/// Opening hours for one weekday.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OpenDayInfo {
    /// Weekday (0 = Monday).
    pub weekday: i64,
    /// Whether the store opens that day.
    pub is_open: bool,
    /// Opening time.
    pub open_time: String,
    /// Closing time.
    pub close_time: String,
}

impl From<&OpenDay> for OpenDayInfo {
    fn from(day: &OpenDay) -> Self {
        Self {
            weekday: i64::from(weekday_index(day.weekday)),
            is_open: day.is_open,
            open_time: format_time_of_day(day.open_time),
            close_time: format_time_of_day(day.close_time),
        }
    }
}

/// A store's configuration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoreConfigInfo {
    /// The store.
    pub store_id: i64,
    /// One entry per weekday, Monday first.
    pub open_days: Vec<OpenDayInfo>,
    /// Deadline weekday (0 = Monday), if set.
    pub deadline_weekday: Option<i64>,
    /// Deadline time, if set.
    pub deadline_time: Option<String>,
    /// IANA time zone.
    pub timezone: String,
}

impl From<&StoreConfig> for StoreConfigInfo {
    fn from(config: &StoreConfig) -> Self {
        Self {
            store_id: config.store_id,
            open_days: config.open_days.iter().map(OpenDayInfo::from).collect(),
            deadline_weekday: config
                .deadline_weekday
                .map(|weekday| i64::from(weekday_index(weekday))),
            deadline_time: config.deadline_time.map(format_time_of_day),
            timezone: config.timezone.clone(),
        }
    }
}

fn format_instant(instant: OffsetDateTime) -> String {
    // RFC 3339 formatting of a UTC instant with a four-digit year cannot fail.
    instant
        .format(&Rfc3339)
        .unwrap_or_else(|_| instant.to_string())
}

/// A scheduling week.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WeekInfo {
    /// The week identifier.
    pub week_id: i64,
    /// The store.
    pub store_id: i64,
    /// The Monday that starts the week.
    pub week_start: String,
    /// When availability submission closes, if the store has a deadline.
    pub due_at: Option<String>,
    /// `open`, `locked` or `published`.
    pub status: String,
}

impl From<&Week> for WeekInfo {
    fn from(week: &Week) -> Self {
        Self {
            week_id: week.week_id,
            store_id: week.store_id,
            week_start: week.week_start.to_string(),
            due_at: week.due_at.map(format_instant),
            status: week.status.as_str().to_string(),
        }
    }
}

/// A staffing need.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NeedInfo {
    /// The need identifier.
    pub need_id: i64,
    /// The week.
    pub week_id: i64,
    /// Weekday (0 = Monday).
    pub weekday: i64,
    /// Window start.
    pub start_time: String,
    /// Window end.
    pub end_time: String,
    /// Required headcount.
    pub required_staff: u32,
}

impl From<&Need> for NeedInfo {
    fn from(need: &Need) -> Self {
        Self {
            need_id: need.need_id,
            week_id: need.week_id,
            weekday: i64::from(weekday_index(need.weekday)),
            start_time: format_time_of_day(need.range.start()),
            end_time: format_time_of_day(need.range.end()),
            required_staff: need.required_staff,
        }
    }
}

/// A submitted availability window.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AvailabilityInfo {
    /// The availability identifier.
    pub availability_id: i64,
    /// The week.
    pub week_id: i64,
    /// The member.
    pub user_id: String,
    /// Weekday (0 = Monday).
    pub weekday: i64,
    /// Window start.
    pub start_time: String,
    /// Window end.
    pub end_time: String,
}

impl From<&Availability> for AvailabilityInfo {
    fn from(entry: &Availability) -> Self {
        Self {
            availability_id: entry.availability_id,
            week_id: entry.week_id,
            user_id: entry.user_id.value().to_string(),
            weekday: i64::from(weekday_index(entry.weekday)),
            start_time: format_time_of_day(entry.range.start()),
            end_time: format_time_of_day(entry.range.end()),
        }
    }
}

/// An assigned shift.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ShiftInfo {
    /// The shift identifier.
    pub shift_id: i64,
    /// The week.
    pub week_id: i64,
    /// The owner.
    pub user_id: String,
    /// Weekday (0 = Monday).
    pub weekday: i64,
    /// Window start.
    pub start_time: String,
    /// Window end.
    pub end_time: String,
    /// The need this shift fills, if any.
    pub need_id: Option<i64>,
}

impl From<&Shift> for ShiftInfo {
    fn from(shift: &Shift) -> Self {
        Self {
            shift_id: shift.shift_id,
            week_id: shift.week_id,
            user_id: shift.user_id.value().to_string(),
            weekday: i64::from(weekday_index(shift.weekday)),
            start_time: format_time_of_day(shift.range.start()),
            end_time: format_time_of_day(shift.range.end()),
            need_id: shift.need_id,
        }
    }
}

/// A swap request.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SwapRequestInfo {
    /// The swap identifier.
    pub swap_id: i64,
    /// The shift being offered.
    pub shift_id: i64,
    /// The owner who asked.
    pub requester_id: String,
    /// The proposed new owner.
    pub target_id: String,
    /// `pending`, `accepted` or `rejected`.
    pub status: String,
    /// The deciding manager, once decided.
    pub decided_by: Option<String>,
}

impl From<&SwapRequest> for SwapRequestInfo {
    fn from(swap: &SwapRequest) -> Self {
        Self {
            swap_id: swap.swap_id,
            shift_id: swap.shift_id,
            requester_id: swap.requester_id.value().to_string(),
            target_id: swap.target_id.value().to_string(),
            status: swap.status.as_str().to_string(),
            decided_by: swap
                .decided_by
                .as_ref()
                .map(|user_id| user_id.value().to_string()),
        }
    }
}

/// Coverage of one need.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CoverageInfo {
    /// The need.
    pub need: NeedInfo,
    /// Shifts assigned against the need.
    pub assigned: Vec<ShiftInfo>,
    /// Headcount still missing.
    pub missing: u32,
    /// Members available for the whole window and not already booked.
    pub candidates: Vec<String>,
}

impl From<&NeedCoverage> for CoverageInfo {
    fn from(coverage: &NeedCoverage) -> Self {
        Self {
            need: NeedInfo::from(&coverage.need),
            assigned: coverage.assigned.iter().map(ShiftInfo::from).collect(),
            missing: coverage.missing,
            candidates: coverage
                .candidates
                .iter()
                .map(|user_id| user_id.value().to_string())
                .collect(),
        }
    }
}

/// API response for the coverage report of a week.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct WeekCoverageResponse {
    /// The week.
    pub week: WeekInfo,
    /// Coverage per need, ordered like the week's needs.
    pub needs: Vec<CoverageInfo>,
}

/// An audit trail entry.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditEventInfo {
    /// The event identifier.
    pub event_id: Option<i64>,
    /// Who acted.
    pub actor_id: String,
    /// What kind of actor.
    pub actor_type: String,
    /// The action name.
    pub action: String,
    /// Action details.
    pub details: Option<String>,
    /// State summary before the action.
    pub before: String,
    /// State summary after the action.
    pub after: String,
}

impl From<&AuditEvent> for AuditEventInfo {
    fn from(event: &AuditEvent) -> Self {
        Self {
            event_id: event.event_id,
            actor_id: event.actor.id.clone(),
            actor_type: event.actor.actor_type.clone(),
            action: event.action.name.clone(),
            details: event.action.details.clone(),
            before: event.before.data.clone(),
            after: event.after.data.clone(),
        }
    }
}
