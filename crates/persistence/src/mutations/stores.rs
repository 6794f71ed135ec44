// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store creation and configuration writes.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftly::StoreCreation;
use shiftly_domain::{Role, StoreConfig};
use tracing::info;

use crate::backend::get_last_insert_rowid;
use crate::data_models::PersistStoreResult;
use crate::diesel_schema::{store_members, store_settings, stores};
use crate::encoding::{encode_open_days, encode_time, encode_weekday};
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;

/// Persists a store creation.
///
/// The store, its creator's manager membership, its default configuration
/// and the audit event are written in one transaction. When a step fails
/// nothing is committed and the error names the step.
///
/// # Errors
///
/// Returns an error if any step fails.
pub fn persist_store_creation(
    conn: &mut SqliteConnection,
    creation: &StoreCreation,
) -> Result<PersistStoreResult, PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::insert_into(stores::table)
            .values((
                stores::name.eq(&creation.name),
                stores::created_by.eq(creation.created_by.value()),
            ))
            .execute(conn)
            .map_err(|e| PersistenceError::from(e).during("inserting the store"))?;
        let store_id: i64 = get_last_insert_rowid(conn)?;

        diesel::insert_into(store_members::table)
            .values((
                store_members::store_id.eq(store_id),
                store_members::user_id.eq(creation.created_by.value()),
                store_members::role.eq(Role::Manager.as_str()),
            ))
            .execute(conn)
            .map_err(|e| PersistenceError::from(e).during("adding the creator as manager"))?;

        let config: StoreConfig = StoreConfig {
            store_id,
            ..creation.config.clone()
        };
        upsert_store_config(conn, &config)
            .map_err(|e| e.during("writing the default configuration"))?;

        let event_id: i64 =
            persist_audit_event(conn, &creation.audit_event.clone().with_store_id(store_id))
                .map_err(|e| e.during("recording the audit event"))?;

        info!(store_id, event_id, created_by = %creation.created_by, "Created store");
        Ok(PersistStoreResult { store_id, event_id })
    })
}

/// Writes the whole configuration of a store, creating the row if needed.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn upsert_store_config(
    conn: &mut SqliteConnection,
    config: &StoreConfig,
) -> Result<(), PersistenceError> {
    let open_days_json: String = encode_open_days(&config.open_days)?;
    let deadline_weekday: Option<i32> = config.deadline_weekday.map(encode_weekday);
    let deadline_time: Option<String> = config.deadline_time.map(encode_time);

    diesel::insert_into(store_settings::table)
        .values((
            store_settings::store_id.eq(config.store_id),
            store_settings::open_days_json.eq(&open_days_json),
            store_settings::deadline_weekday.eq(deadline_weekday),
            store_settings::deadline_time.eq(&deadline_time),
            store_settings::timezone.eq(&config.timezone),
        ))
        .on_conflict(store_settings::store_id)
        .do_update()
        .set((
            store_settings::open_days_json.eq(&open_days_json),
            store_settings::deadline_weekday.eq(deadline_weekday),
            store_settings::deadline_time.eq(&deadline_time),
            store_settings::timezone.eq(&config.timezone),
            store_settings::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                "CURRENT_TIMESTAMP",
            )),
        ))
        .execute(conn)?;

    info!(store_id = config.store_id, "Wrote store configuration");
    Ok(())
}
