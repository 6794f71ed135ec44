// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Role, Shift, StoreConfig, TimeRange, UserId, weekday_index};
use crate::week::validate_timezone;
use std::collections::HashSet;
use time::Weekday;

/// Maximum length of a store name, in characters.
pub const MAX_STORE_NAME_LENGTH: usize = 120;

/// Validates a store name.
///
/// # Errors
///
/// Returns an error if the name is blank or longer than
/// [`MAX_STORE_NAME_LENGTH`] characters.
pub fn validate_store_name(name: &str) -> Result<(), DomainError> {
    // Rule: name must not be blank
    if name.trim().is_empty() {
        return Err(DomainError::InvalidStoreName(String::from(
            "Store name cannot be empty",
        )));
    }

    if name.chars().count() > MAX_STORE_NAME_LENGTH {
        return Err(DomainError::InvalidStoreName(format!(
            "Store name cannot exceed {MAX_STORE_NAME_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Validates a required headcount and narrows it.
///
/// # Errors
///
/// Returns an error if `count` is not a positive integer.
pub fn validate_required_staff(count: i64) -> Result<u32, DomainError> {
    u32::try_from(count)
        .ok()
        .filter(|value| *value > 0)
        .ok_or(DomainError::InvalidRequiredStaff(count))
}

/// Validates a merged store configuration.
///
/// # Errors
///
/// Returns an error if:
/// - `open_days` does not name every weekday exactly once
/// - An open day closes at or before it opens
/// - Exactly one of deadline weekday and deadline time is set
/// - The timezone is unknown
pub fn validate_store_config(config: &StoreConfig) -> Result<(), DomainError> {
    if config.open_days.len() != 7 {
        return Err(DomainError::InvalidOpenDays(format!(
            "expected 7 entries, got {}",
            config.open_days.len()
        )));
    }

    let mut seen: HashSet<Weekday> = HashSet::new();
    for day in &config.open_days {
        if !seen.insert(day.weekday) {
            return Err(DomainError::InvalidOpenDays(format!(
                "{} appears more than once",
                day.weekday
            )));
        }
        if day.is_open && day.close_time <= day.open_time {
            return Err(DomainError::InvalidOpenDays(format!(
                "{} closes at or before it opens",
                day.weekday
            )));
        }
    }

    if config.deadline_weekday.is_some() != config.deadline_time.is_some() {
        return Err(DomainError::IncompleteDeadline);
    }

    validate_timezone(&config.timezone)?;

    Ok(())
}

/// Finds a shift of `user_id` on `weekday` whose interval intersects `range`.
///
/// `exclude_shift_id` skips one shift, used when re-validating a shift
/// against its own week.
#[must_use]
pub fn find_overlapping_shift<'a>(
    shifts: &'a [Shift],
    user_id: &UserId,
    weekday: Weekday,
    range: &TimeRange,
    exclude_shift_id: Option<i64>,
) -> Option<&'a Shift> {
    shifts.iter().find(|shift| {
        Some(shift.shift_id) != exclude_shift_id
            && shift.user_id == *user_id
            && shift.weekday == weekday
            && shift.range.overlaps(range)
    })
}

/// Rejects an assignment that would double-book `user_id`.
///
/// # Errors
///
/// Returns `DomainError::DoubleBooking` naming the conflicting shift.
pub fn validate_no_overlap(
    shifts: &[Shift],
    user_id: &UserId,
    weekday: Weekday,
    range: &TimeRange,
    exclude_shift_id: Option<i64>,
) -> Result<(), DomainError> {
    match find_overlapping_shift(shifts, user_id, weekday, range, exclude_shift_id) {
        Some(existing) => Err(DomainError::DoubleBooking {
            user_id: user_id.value().to_string(),
            weekday: weekday_index(weekday),
            existing_shift_id: existing.shift_id,
        }),
        None => Ok(()),
    }
}

/// Rejects a role change or removal that leaves a store without a manager.
///
/// `manager_count` is the number of managers before the change and
/// `current_role` is the affected member's role.
///
/// # Errors
///
/// Returns `DomainError::LastManager` if the affected member is the only manager.
pub fn validate_keeps_manager(
    store_id: i64,
    manager_count: usize,
    current_role: Role,
    new_role: Option<Role>,
) -> Result<(), DomainError> {
    let loses_manager: bool = current_role == Role::Manager && new_role != Some(Role::Manager);
    if loses_manager && manager_count <= 1 {
        return Err(DomainError::LastManager { store_id });
    }
    Ok(())
}
