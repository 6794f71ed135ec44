// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftly_audit::{Action, Actor, AuditEvent, StateSnapshot};
use tracing::debug;

use crate::data_models::{ActionData, ActorData, StateSnapshotData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    store_id: Option<i64>,
    actor_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
}

impl AuditEventRow {
    fn into_event(self) -> Result<AuditEvent, PersistenceError> {
        let actor_data: ActorData = serde_json::from_str(&self.actor_json)?;
        let action_data: ActionData = serde_json::from_str(&self.action_json)?;
        let before_data: StateSnapshotData = serde_json::from_str(&self.before_snapshot_json)?;
        let after_data: StateSnapshotData = serde_json::from_str(&self.after_snapshot_json)?;

        Ok(AuditEvent {
            event_id: Some(self.event_id),
            store_id: self.store_id,
            actor: Actor::new(actor_data.id, actor_data.actor_type),
            action: Action::new(action_data.name, action_data.details),
            before: StateSnapshot::new(before_data.data),
            after: StateSnapshot::new(after_data.data),
        })
    }
}

/// Retrieves an audit event by id.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the event does not exist, or an
/// error if it cannot be deserialized.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    event_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    audit_events::table
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first::<AuditEventRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("audit event {event_id}")))?
        .into_event()
}

/// Lists a store's audit events, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or an event cannot be deserialized.
pub fn list_audit_events(
    conn: &mut SqliteConnection,
    store_id: i64,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    debug!(store_id, "Listing audit events");

    audit_events::table
        .filter(audit_events::store_id.eq(store_id))
        .order(audit_events::event_id.desc())
        .select(AuditEventRow::as_select())
        .load::<AuditEventRow>(conn)?
        .into_iter()
        .map(AuditEventRow::into_event)
        .collect()
}
