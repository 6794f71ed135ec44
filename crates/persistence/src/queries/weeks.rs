// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Week queries.

use std::str::FromStr;

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftly_domain::{Week, WeekStatus};
use time::Date;
use tracing::debug;

use crate::diesel_schema::store_weeks;
use crate::encoding::{decode_date, decode_instant, encode_date};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = store_weeks)]
struct WeekRow {
    week_id: i64,
    store_id: i64,
    week_start: String,
    due_at: Option<String>,
    status: String,
}

impl WeekRow {
    fn into_week(self) -> Result<Week, PersistenceError> {
        Ok(Week {
            week_id: self.week_id,
            store_id: self.store_id,
            week_start: decode_date(&self.week_start)?,
            due_at: self.due_at.as_deref().map(decode_instant).transpose()?,
            status: decode_week_status(&self.status)?,
        })
    }
}

pub(crate) fn decode_week_status(value: &str) -> Result<WeekStatus, PersistenceError> {
    WeekStatus::from_str(value).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

/// Retrieves a week by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the week does not exist.
pub fn get_week(conn: &mut SqliteConnection, week_id: i64) -> Result<Week, PersistenceError> {
    debug!(week_id, "Loading week");

    store_weeks::table
        .filter(store_weeks::week_id.eq(week_id))
        .select(WeekRow::as_select())
        .first::<WeekRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("week {week_id}")))?
        .into_week()
}

/// Looks up the week of a store starting on `week_start`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_week(
    conn: &mut SqliteConnection,
    store_id: i64,
    week_start: Date,
) -> Result<Option<Week>, PersistenceError> {
    debug!(store_id, %week_start, "Looking up week");

    store_weeks::table
        .filter(store_weeks::store_id.eq(store_id))
        .filter(store_weeks::week_start.eq(encode_date(week_start)))
        .select(WeekRow::as_select())
        .first::<WeekRow>(conn)
        .optional()?
        .map(WeekRow::into_week)
        .transpose()
}

/// Lists a store's most recent weeks, latest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_recent_weeks(
    conn: &mut SqliteConnection,
    store_id: i64,
    limit: i64,
) -> Result<Vec<Week>, PersistenceError> {
    debug!(store_id, limit, "Listing recent weeks");

    store_weeks::table
        .filter(store_weeks::store_id.eq(store_id))
        .order(store_weeks::week_start.desc())
        .limit(limit)
        .select(WeekRow::as_select())
        .load::<WeekRow>(conn)?
        .into_iter()
        .map(WeekRow::into_week)
        .collect()
}
