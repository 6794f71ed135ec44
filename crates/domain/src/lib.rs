// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod coverage;
mod error;
mod types;
mod validation;
mod week;

#[cfg(test)]
mod tests;

pub use coverage::{NeedCoverage, compute_coverage};
pub use error::DomainError;
pub use week::{compute_due_at, validate_timezone, week_start_for};

// Re-export public types
pub use types::{
    Availability, DEFAULT_CLOSE_TIME, DEFAULT_OPEN_TIME, DEFAULT_TIMEZONE, Membership, Need,
    OpenDay, Role, Shift, Store, StoreConfig, StoreConfigPatch, SwapDecision, SwapRequest,
    SwapStatus, TimeRange, UserId, Week, WeekStatus, default_open_days, format_time_of_day,
    parse_date, parse_time_of_day, weekday_from_index, weekday_index,
};
pub use validation::{
    MAX_STORE_NAME_LENGTH, find_overlapping_shift, validate_keeps_manager, validate_no_overlap,
    validate_required_staff, validate_store_config, validate_store_name,
};
