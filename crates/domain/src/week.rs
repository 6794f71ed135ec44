// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Week anchoring and submission deadline calculation.
//!
//! ## Invariants
//!
//! - A week always starts on a Monday
//! - Deadlines are wall-clock times in the store's declared timezone
//! - Deadlines are stored as UTC instants
//! - A deadline falls within `[week_start, week_start + 6]`

use crate::error::DomainError;
use crate::types::{StoreConfig, weekday_index};
use chrono::{NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use time::{Date, Duration, OffsetDateTime, Time, Weekday};

/// Returns the Monday on or before `date`.
///
/// A Sunday maps to the Monday six days earlier.
///
/// # Errors
///
/// Returns an error if the Monday lies before the representable date range.
pub fn week_start_for(date: Date) -> Result<Date, DomainError> {
    let back: i64 = i64::from(date.weekday().number_days_from_monday());
    date.checked_sub(Duration::days(back))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("computing the week start for {date}"),
        })
}

/// Validates that `timezone` names a known IANA zone.
///
/// # Errors
///
/// Returns an error if the zone is unknown.
pub fn validate_timezone(timezone: &str) -> Result<Tz, DomainError> {
    timezone
        .parse::<Tz>()
        .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))
}

/// Computes the submission deadline of the week starting at `week_start`.
///
/// Returns `None` when the store has no deadline configured.
///
/// # Errors
///
/// Returns an error if:
/// - `week_start` is not a Monday
/// - The timezone is invalid
/// - The deadline wall-clock time is skipped or repeated by a DST transition
pub fn compute_due_at(
    week_start: Date,
    config: &StoreConfig,
) -> Result<Option<OffsetDateTime>, DomainError> {
    let Some((weekday, time)) = config.deadline() else {
        return Ok(None);
    };

    if week_start.weekday() != Weekday::Monday {
        return Err(DomainError::InvalidDate {
            value: week_start.to_string(),
            error: String::from("week start must be a Monday"),
        });
    }

    let tz: Tz = validate_timezone(&config.timezone)?;

    let deadline_date: Date = week_start
        .checked_add(Duration::days(i64::from(weekday_index(weekday))))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("adding {weekday} to {week_start}"),
        })?;

    resolve_wall_clock(deadline_date, time, tz, &config.timezone).map(Some)
}

/// Converts a wall-clock date and time in `tz` into a UTC instant.
fn resolve_wall_clock(
    date: Date,
    time: Time,
    tz: Tz,
    timezone_name: &str,
) -> Result<OffsetDateTime, DomainError> {
    let unresolvable = || DomainError::UnresolvableDeadline {
        date: date.to_string(),
        time: crate::types::format_time_of_day(time),
        timezone: timezone_name.to_string(),
    };

    let naive_date: NaiveDate = NaiveDate::from_ymd_opt(
        date.year(),
        u32::from(u8::from(date.month())),
        u32::from(date.day()),
    )
    .ok_or_else(unresolvable)?;

    let naive_time: NaiveTime = NaiveTime::from_hms_opt(
        u32::from(time.hour()),
        u32::from(time.minute()),
        u32::from(time.second()),
    )
    .ok_or_else(unresolvable)?;

    let local = tz
        .from_local_datetime(&naive_date.and_time(naive_time))
        .single()
        .ok_or_else(unresolvable)?;

    let utc_seconds: i64 = local.with_timezone(&chrono::Utc).timestamp();
    OffsetDateTime::from_unix_timestamp(utc_seconds).map_err(|e| {
        DomainError::DateArithmeticOverflow {
            operation: format!("converting deadline to UTC: {e}"),
        }
    })
}
