// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Profile synchronisation.

use diesel::SqliteConnection;
use diesel::prelude::*;
use shiftly_audit::AuditEvent;
use shiftly_domain::UserId;
use tracing::{debug, info};

use crate::data_models::ProfileData;
use crate::diesel_schema::profiles;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::queries::stores::get_profile;

/// Stores the identity provider's profile of a user.
///
/// Writes and audits only when the stored profile differs.
///
/// # Returns
///
/// `true` if the profile was written.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn sync_profile(
    conn: &mut SqliteConnection,
    profile: &ProfileData,
    audit_event: &AuditEvent,
) -> Result<bool, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let user_id: UserId = UserId::new(&profile.user_id);
        if get_profile(conn, &user_id)?.as_ref() == Some(profile) {
            debug!(user_id = %user_id, "Profile unchanged");
            return Ok(false);
        }

        diesel::insert_into(profiles::table)
            .values((
                profiles::user_id.eq(&profile.user_id),
                profiles::display_name.eq(&profile.display_name),
                profiles::email.eq(&profile.email),
            ))
            .on_conflict(profiles::user_id)
            .do_update()
            .set((
                profiles::display_name.eq(&profile.display_name),
                profiles::email.eq(&profile.email),
                profiles::updated_at.eq(diesel::dsl::sql::<diesel::sql_types::Text>(
                    "CURRENT_TIMESTAMP",
                )),
            ))
            .execute(conn)?;

        persist_audit_event(conn, audit_event)?;
        info!(user_id = %user_id, "Synced profile");
        Ok(true)
    })
}
