// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Caller-facing operations of the scheduling service.
//!
//! Each operation takes the authenticated caller explicitly and returns
//! either a response DTO or one `ApiError` carrying a machine-checkable
//! `ErrorKind`.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use error::{
    ApiError, AuthError, ErrorKind, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    assign_shift, create_need, create_store, decide_swap, delete_need, get_config,
    get_or_create_week, get_week, join_store, list_audit_events, list_availability, list_members,
    list_my_shifts, list_my_shifts_in_week, list_my_stores, list_needs, list_recent_weeks,
    list_shifts_for_week, list_swap_requests, remove_member, request_swap, submit_availability,
    sync_profile, transition_week, unassign_shift, update_config, update_role, week_coverage,
    withdraw_availability,
};
pub use request_response::{
    AssignShiftRequest, AuditEventInfo, AvailabilityInfo, CoverageInfo, CreateNeedRequest,
    CreateStoreRequest, DecideSwapRequest, MemberInfo, MembershipInfo, NeedInfo, OpenDayInfo,
    RequestSwapRequest, ShiftInfo, StoreConfigInfo, StoreInfo, StoreSummaryInfo,
    SubmitAvailabilityRequest, SwapRequestInfo, TransitionWeekRequest, UpdateConfigRequest,
    UpdateRoleRequest, WeekCoverageResponse, WeekInfo, WeekRequest,
};
