// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Swap request queries.

use std::str::FromStr;

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftly_domain::{SwapRequest, SwapStatus, UserId};
use tracing::debug;

use crate::diesel_schema::{shifts, store_weeks, swap_requests};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = swap_requests)]
struct SwapRow {
    swap_id: i64,
    shift_id: i64,
    requester_id: String,
    target_id: String,
    status: String,
    decided_by: Option<String>,
}

impl SwapRow {
    fn into_swap(self) -> Result<SwapRequest, PersistenceError> {
        Ok(SwapRequest {
            swap_id: self.swap_id,
            shift_id: self.shift_id,
            requester_id: UserId::new(&self.requester_id),
            target_id: UserId::new(&self.target_id),
            status: decode_swap_status(&self.status)?,
            decided_by: self.decided_by.as_deref().map(UserId::new),
        })
    }
}

pub(crate) fn decode_swap_status(value: &str) -> Result<SwapStatus, PersistenceError> {
    SwapStatus::from_str(value).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

fn into_swaps(rows: Vec<SwapRow>) -> Result<Vec<SwapRequest>, PersistenceError> {
    rows.into_iter().map(SwapRow::into_swap).collect()
}

/// Retrieves a swap request by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the request does not exist.
pub fn get_swap_request(
    conn: &mut SqliteConnection,
    swap_id: i64,
) -> Result<SwapRequest, PersistenceError> {
    swap_requests::table
        .filter(swap_requests::swap_id.eq(swap_id))
        .select(SwapRow::as_select())
        .first::<SwapRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("swap request {swap_id}")))?
        .into_swap()
}

/// Lists the swap requests for shifts of a week.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_swap_requests_for_week(
    conn: &mut SqliteConnection,
    week_id: i64,
) -> Result<Vec<SwapRequest>, PersistenceError> {
    debug!(week_id, "Listing swap requests for week");

    let rows: Vec<SwapRow> = swap_requests::table
        .inner_join(shifts::table)
        .filter(shifts::week_id.eq(week_id))
        .order(swap_requests::swap_id.asc())
        .select(SwapRow::as_select())
        .load::<SwapRow>(conn)?;
    into_swaps(rows)
}

/// Lists the swap requests of a store, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_swap_requests_for_store(
    conn: &mut SqliteConnection,
    store_id: i64,
) -> Result<Vec<SwapRequest>, PersistenceError> {
    debug!(store_id, "Listing swap requests for store");

    let rows: Vec<SwapRow> = swap_requests::table
        .inner_join(shifts::table.inner_join(store_weeks::table))
        .filter(store_weeks::store_id.eq(store_id))
        .order(swap_requests::swap_id.desc())
        .select(SwapRow::as_select())
        .load::<SwapRow>(conn)?;
    into_swaps(rows)
}
