// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Loading the state commands are applied against.

use diesel::SqliteConnection;
use shiftly::State;
use shiftly_domain::Week;
use tracing::debug;

use crate::error::PersistenceError;
use crate::queries::schedule::{list_availabilities, list_needs, list_shifts_for_week};
use crate::queries::stores::{get_store, get_store_config, list_memberships};
use crate::queries::swaps::list_swap_requests_for_week;
use crate::queries::weeks::get_week;

/// Loads the store-level state: memberships and configuration.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the store does not exist.
pub fn load_store_state(
    conn: &mut SqliteConnection,
    store_id: i64,
) -> Result<State, PersistenceError> {
    get_store(conn, store_id)?;
    let state: State = State::new(
        store_id,
        list_memberships(conn, store_id)?,
        get_store_config(conn, store_id)?,
    );
    debug!(
        store_id,
        members = state.memberships.len(),
        "Loaded store state"
    );
    Ok(state)
}

/// Loads the state of one week together with its store.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the week does not exist.
pub fn load_week_state(
    conn: &mut SqliteConnection,
    week_id: i64,
) -> Result<State, PersistenceError> {
    let week: Week = get_week(conn, week_id)?;
    let mut state: State = load_store_state(conn, week.store_id)?;

    state.needs = list_needs(conn, week_id)?;
    state.availabilities = list_availabilities(conn, week_id)?;
    state.shifts = list_shifts_for_week(conn, week_id)?;
    state.swap_requests = list_swap_requests_for_week(conn, week_id)?;
    state.week = Some(week);

    debug!(
        week_id,
        needs = state.needs.len(),
        shifts = state.shifts.len(),
        "Loaded week state"
    );
    Ok(state)
}
