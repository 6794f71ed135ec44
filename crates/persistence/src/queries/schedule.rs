// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Need, availability and shift queries.
//!
//! All lists are ordered by weekday, then start time.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftly_domain::{Availability, Need, Shift, UserId};
use tracing::debug;

use crate::diesel_schema::{availabilities, shifts, store_weeks, week_shift_needs};
use crate::encoding::{decode_range, decode_required_staff, decode_weekday};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = week_shift_needs)]
struct NeedRow {
    need_id: i64,
    week_id: i64,
    weekday: i32,
    start_time: String,
    end_time: String,
    required_staff: i32,
}

impl NeedRow {
    fn into_need(self) -> Result<Need, PersistenceError> {
        Ok(Need {
            need_id: self.need_id,
            week_id: self.week_id,
            weekday: decode_weekday(self.weekday)?,
            range: decode_range(&self.start_time, &self.end_time)?,
            required_staff: decode_required_staff(self.required_staff)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = availabilities)]
struct AvailabilityRow {
    availability_id: i64,
    week_id: i64,
    user_id: String,
    weekday: i32,
    start_time: String,
    end_time: String,
}

impl AvailabilityRow {
    fn into_availability(self) -> Result<Availability, PersistenceError> {
        Ok(Availability {
            availability_id: self.availability_id,
            week_id: self.week_id,
            user_id: UserId::new(&self.user_id),
            weekday: decode_weekday(self.weekday)?,
            range: decode_range(&self.start_time, &self.end_time)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = shifts)]
struct ShiftRow {
    shift_id: i64,
    week_id: i64,
    user_id: String,
    weekday: i32,
    start_time: String,
    end_time: String,
    need_id: Option<i64>,
}

impl ShiftRow {
    fn into_shift(self) -> Result<Shift, PersistenceError> {
        Ok(Shift {
            shift_id: self.shift_id,
            week_id: self.week_id,
            user_id: UserId::new(&self.user_id),
            weekday: decode_weekday(self.weekday)?,
            range: decode_range(&self.start_time, &self.end_time)?,
            need_id: self.need_id,
        })
    }
}

fn into_shifts(rows: Vec<ShiftRow>) -> Result<Vec<Shift>, PersistenceError> {
    rows.into_iter().map(ShiftRow::into_shift).collect()
}

/// Lists the needs of a week.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_needs(
    conn: &mut SqliteConnection,
    week_id: i64,
) -> Result<Vec<Need>, PersistenceError> {
    debug!(week_id, "Listing needs");

    week_shift_needs::table
        .filter(week_shift_needs::week_id.eq(week_id))
        .order((
            week_shift_needs::weekday.asc(),
            week_shift_needs::start_time.asc(),
            week_shift_needs::need_id.asc(),
        ))
        .select(NeedRow::as_select())
        .load::<NeedRow>(conn)?
        .into_iter()
        .map(NeedRow::into_need)
        .collect()
}

/// Retrieves a need by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the need does not exist.
pub fn get_need(conn: &mut SqliteConnection, need_id: i64) -> Result<Need, PersistenceError> {
    week_shift_needs::table
        .filter(week_shift_needs::need_id.eq(need_id))
        .select(NeedRow::as_select())
        .first::<NeedRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("need {need_id}")))?
        .into_need()
}

/// Lists the availability submitted for a week.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_availabilities(
    conn: &mut SqliteConnection,
    week_id: i64,
) -> Result<Vec<Availability>, PersistenceError> {
    debug!(week_id, "Listing availability");

    availabilities::table
        .filter(availabilities::week_id.eq(week_id))
        .order((
            availabilities::weekday.asc(),
            availabilities::start_time.asc(),
            availabilities::availability_id.asc(),
        ))
        .select(AvailabilityRow::as_select())
        .load::<AvailabilityRow>(conn)?
        .into_iter()
        .map(AvailabilityRow::into_availability)
        .collect()
}

/// Retrieves an availability entry by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the entry does not exist.
pub fn get_availability(
    conn: &mut SqliteConnection,
    availability_id: i64,
) -> Result<Availability, PersistenceError> {
    availabilities::table
        .filter(availabilities::availability_id.eq(availability_id))
        .select(AvailabilityRow::as_select())
        .first::<AvailabilityRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("availability {availability_id}")))?
        .into_availability()
}

/// Lists the shifts of a week.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_shifts_for_week(
    conn: &mut SqliteConnection,
    week_id: i64,
) -> Result<Vec<Shift>, PersistenceError> {
    debug!(week_id, "Listing shifts for week");

    let rows: Vec<ShiftRow> = shifts::table
        .filter(shifts::week_id.eq(week_id))
        .order((
            shifts::weekday.asc(),
            shifts::start_time.asc(),
            shifts::shift_id.asc(),
        ))
        .select(ShiftRow::as_select())
        .load::<ShiftRow>(conn)?;
    into_shifts(rows)
}

/// Lists every shift of a user across weeks and stores, latest week first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_shifts_for_user(
    conn: &mut SqliteConnection,
    user_id: &UserId,
) -> Result<Vec<Shift>, PersistenceError> {
    debug!(user_id = %user_id, "Listing shifts for user");

    let rows: Vec<ShiftRow> = shifts::table
        .inner_join(store_weeks::table)
        .filter(shifts::user_id.eq(user_id.value()))
        .order((
            store_weeks::week_start.desc(),
            shifts::weekday.asc(),
            shifts::start_time.asc(),
        ))
        .select(ShiftRow::as_select())
        .load::<ShiftRow>(conn)?;
    into_shifts(rows)
}

/// Lists the shifts of a user in one week.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_shifts_for_user_in_week(
    conn: &mut SqliteConnection,
    week_id: i64,
    user_id: &UserId,
) -> Result<Vec<Shift>, PersistenceError> {
    let rows: Vec<ShiftRow> = shifts::table
        .filter(shifts::week_id.eq(week_id))
        .filter(shifts::user_id.eq(user_id.value()))
        .order((shifts::weekday.asc(), shifts::start_time.asc()))
        .select(ShiftRow::as_select())
        .load::<ShiftRow>(conn)?;
    into_shifts(rows)
}

/// Retrieves a shift by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the shift does not exist.
pub fn get_shift(conn: &mut SqliteConnection, shift_id: i64) -> Result<Shift, PersistenceError> {
    shifts::table
        .filter(shifts::shift_id.eq(shift_id))
        .select(ShiftRow::as_select())
        .first::<ShiftRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("shift {shift_id}")))?
        .into_shift()
}
