// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event persistence.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftly_audit::AuditEvent;
use tracing::debug;

use crate::backend::get_last_insert_rowid;
use crate::data_models::{ActionData, ActorData, StateSnapshotData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Persists an audit event.
///
/// Always called inside the transaction that writes the audited mutation.
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if persistence or serialization fails.
pub fn persist_audit_event(
    conn: &mut SqliteConnection,
    event: &AuditEvent,
) -> Result<i64, PersistenceError> {
    let actor_json: String = serde_json::to_string(&ActorData {
        id: event.actor.id.clone(),
        actor_type: event.actor.actor_type.clone(),
    })?;
    let action_json: String = serde_json::to_string(&ActionData {
        name: event.action.name.clone(),
        details: event.action.details.clone(),
    })?;
    let before_json: String = serde_json::to_string(&StateSnapshotData {
        data: event.before.data.clone(),
    })?;
    let after_json: String = serde_json::to_string(&StateSnapshotData {
        data: event.after.data.clone(),
    })?;

    diesel::insert_into(audit_events::table)
        .values((
            audit_events::store_id.eq(event.store_id),
            audit_events::actor_json.eq(&actor_json),
            audit_events::action_json.eq(&action_json),
            audit_events::before_snapshot_json.eq(&before_json),
            audit_events::after_snapshot_json.eq(&after_json),
        ))
        .execute(conn)?;

    let event_id: i64 = get_last_insert_rowid(conn)?;
    debug!(event_id, action = %event.action.name, "Persisted audit event");
    Ok(event_id)
}
