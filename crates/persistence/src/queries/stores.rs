// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store, membership, configuration and profile queries.

use std::str::FromStr;

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftly_domain::{Membership, Role, Store, StoreConfig, UserId};
use time::Weekday;
use tracing::debug;

use crate::data_models::{MemberData, ProfileData, StoreMembershipData};
use crate::diesel_schema::{profiles, store_members, store_settings, stores};
use crate::encoding::{decode_open_days, decode_time, decode_weekday};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = stores)]
struct StoreRow {
    store_id: i64,
    name: String,
    created_by: String,
}

impl StoreRow {
    fn into_store(self) -> Store {
        Store {
            store_id: self.store_id,
            name: self.name,
            created_by: UserId::new(&self.created_by),
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = store_members)]
struct MembershipRow {
    store_id: i64,
    user_id: String,
    role: String,
}

impl MembershipRow {
    fn into_membership(self) -> Result<Membership, PersistenceError> {
        Ok(Membership {
            store_id: self.store_id,
            user_id: UserId::new(&self.user_id),
            role: decode_role(&self.role)?,
        })
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = store_settings)]
struct SettingsRow {
    store_id: i64,
    open_days_json: String,
    deadline_weekday: Option<i32>,
    deadline_time: Option<String>,
    timezone: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = profiles)]
struct ProfileRow {
    user_id: String,
    display_name: Option<String>,
    email: Option<String>,
}

pub(crate) fn decode_role(value: &str) -> Result<Role, PersistenceError> {
    Role::from_str(value).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

/// Retrieves a store by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the store does not exist.
pub fn get_store(conn: &mut SqliteConnection, store_id: i64) -> Result<Store, PersistenceError> {
    debug!(store_id, "Loading store");

    let row: Option<StoreRow> = stores::table
        .filter(stores::store_id.eq(store_id))
        .select(StoreRow::as_select())
        .first::<StoreRow>(conn)
        .optional()?;

    row.map(StoreRow::into_store)
        .ok_or_else(|| PersistenceError::NotFound(format!("store {store_id}")))
}

/// Lists every store `user_id` belongs to, with the user's role, ordered by name.
///
/// # Errors
///
/// Returns an error if the query fails or a stored role is invalid.
pub fn list_stores_for_user(
    conn: &mut SqliteConnection,
    user_id: &UserId,
) -> Result<Vec<StoreMembershipData>, PersistenceError> {
    debug!(user_id = %user_id, "Listing stores for user");

    let rows: Vec<(StoreRow, String)> = store_members::table
        .inner_join(stores::table)
        .filter(store_members::user_id.eq(user_id.value()))
        .order((stores::name.asc(), stores::store_id.asc()))
        .select((StoreRow::as_select(), store_members::role))
        .load::<(StoreRow, String)>(conn)?;

    rows.into_iter()
        .map(|(store, role)| {
            Ok(StoreMembershipData {
                store: store.into_store(),
                role: decode_role(&role)?,
            })
        })
        .collect()
}

/// Lists a store's memberships in join order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored role is invalid.
pub fn list_memberships(
    conn: &mut SqliteConnection,
    store_id: i64,
) -> Result<Vec<Membership>, PersistenceError> {
    debug!(store_id, "Listing memberships");

    store_members::table
        .filter(store_members::store_id.eq(store_id))
        .order((store_members::joined_at.asc(), store_members::user_id.asc()))
        .select(MembershipRow::as_select())
        .load::<MembershipRow>(conn)?
        .into_iter()
        .map(MembershipRow::into_membership)
        .collect()
}

/// Lists a store's memberships joined with the members' profiles.
///
/// # Errors
///
/// Returns an error if the query fails or a stored role is invalid.
pub fn list_members_with_profiles(
    conn: &mut SqliteConnection,
    store_id: i64,
) -> Result<Vec<MemberData>, PersistenceError> {
    debug!(store_id, "Listing members with profiles");

    let rows: Vec<(MembershipRow, Option<String>, Option<String>)> =
        store_members::table
            .left_join(profiles::table.on(profiles::user_id.eq(store_members::user_id)))
            .filter(store_members::store_id.eq(store_id))
            .order((store_members::joined_at.asc(), store_members::user_id.asc()))
            .select((
                MembershipRow::as_select(),
                profiles::display_name.nullable(),
                profiles::email.nullable(),
            ))
            .load(conn)?;

    rows.into_iter()
        .map(|(membership, display_name, email)| {
            Ok(MemberData {
                membership: membership.into_membership()?,
                display_name,
                email,
            })
        })
        .collect()
}

/// Retrieves the membership of `user_id` in a store, if any.
///
/// # Errors
///
/// Returns an error if the query fails or the stored role is invalid.
pub fn get_membership(
    conn: &mut SqliteConnection,
    store_id: i64,
    user_id: &UserId,
) -> Result<Option<Membership>, PersistenceError> {
    store_members::table
        .filter(store_members::store_id.eq(store_id))
        .filter(store_members::user_id.eq(user_id.value()))
        .select(MembershipRow::as_select())
        .first::<MembershipRow>(conn)
        .optional()?
        .map(MembershipRow::into_membership)
        .transpose()
}

/// Retrieves a store's configuration.
///
/// Every store gets a settings row at creation, so a missing row means the
/// store does not exist.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if there is no settings row, or a
/// reconstruction error if the stored configuration is invalid.
pub fn get_store_config(
    conn: &mut SqliteConnection,
    store_id: i64,
) -> Result<StoreConfig, PersistenceError> {
    debug!(store_id, "Loading store configuration");

    let row: SettingsRow = store_settings::table
        .filter(store_settings::store_id.eq(store_id))
        .select(SettingsRow::as_select())
        .first::<SettingsRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("configuration of store {store_id}")))?;

    let deadline_weekday: Option<Weekday> =
        row.deadline_weekday.map(decode_weekday).transpose()?;

    Ok(StoreConfig {
        store_id: row.store_id,
        open_days: decode_open_days(&row.open_days_json)?,
        deadline_weekday,
        deadline_time: row.deadline_time.as_deref().map(decode_time).transpose()?,
        timezone: row.timezone,
    })
}

/// Retrieves the stored profile of a user, if one was synced.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_profile(
    conn: &mut SqliteConnection,
    user_id: &UserId,
) -> Result<Option<ProfileData>, PersistenceError> {
    let row: Option<ProfileRow> = profiles::table
        .filter(profiles::user_id.eq(user_id.value()))
        .select(ProfileRow::as_select())
        .first::<ProfileRow>(conn)
        .optional()?;

    Ok(row.map(|row| ProfileData {
        user_id: row.user_id,
        display_name: row.display_name,
        email: row.email,
    }))
}
