// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use shiftly_domain::{Membership, Role, Store};

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// Serializable representation of one open-days entry.
///
/// Stored as a JSON array in `store_settings.open_days_json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenDayData {
    pub weekday: u8,
    pub is_open: bool,
    pub open_time: String,
    pub close_time: String,
}

/// A store together with the caller's role in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreMembershipData {
    pub store: Store,
    pub role: Role,
}

/// A membership with the member's profile, when one was synced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberData {
    pub membership: Membership,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Identity-provider profile of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileData {
    pub user_id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Result of persisting a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistTransitionResult {
    /// The id of the persisted audit event.
    pub event_id: i64,
    /// The id of the row the mutation created, if it created one.
    pub entity_id: Option<i64>,
}

/// Result of persisting a store creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistStoreResult {
    /// The new store's id.
    pub store_id: i64,
    /// The id of the persisted audit event.
    pub event_id: i64,
}
