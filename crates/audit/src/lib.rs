// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]

use serde::{Deserialize, Serialize};
use shiftly_domain::UserId;

/// The entity performing an action.
///
/// Actors are taken from the identity provider's authenticated user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "user").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// Creates an actor for an authenticated user.
    #[must_use]
    pub fn user(user_id: &UserId) -> Self {
        Self {
            id: user_id.value().to_string(),
            actor_type: String::from("user"),
        }
    }
}

/// The specific action performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The name of the action (e.g., "`AssignShift`", "`DecideSwap`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A textual snapshot of the affected state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// A snapshot for state that did not exist.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            data: String::from("none"),
        }
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful mutation produces exactly one audit event, which is
/// persisted in the same transaction as the mutation. Audit events capture:
/// - Which store was affected (if any)
/// - Who performed the action (actor)
/// - What action was performed (action)
/// - The state before the transition (before)
/// - The state after the transition (after)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Database-assigned id, present once persisted.
    pub event_id: Option<i64>,
    /// The affected store. `None` for store-independent actions such as
    /// profile synchronisation.
    pub store_id: Option<i64>,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new, not yet persisted `AuditEvent`.
    #[must_use]
    pub const fn new(
        store_id: Option<i64>,
        actor: Actor,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            event_id: None,
            store_id,
            actor,
            action,
            before,
            after,
        }
    }

    /// Returns a copy of this event bound to the given store.
    ///
    /// Used when the store id is only known after the mutation has been
    /// written (store creation).
    #[must_use]
    pub fn with_store_id(mut self, store_id: i64) -> Self {
        self.store_id = Some(store_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_event() -> AuditEvent {
        AuditEvent::new(
            Some(7),
            Actor::user(&UserId::new("manager-1")),
            Action::new(String::from("AssignShift"), None),
            StateSnapshot::absent(),
            StateSnapshot::new(String::from("shift=3")),
        )
    }

    #[test]
    fn test_user_actor() {
        let actor: Actor = Actor::user(&UserId::new("user-123"));

        assert_eq!(actor.id, "user-123");
        assert_eq!(actor.actor_type, "user");
    }

    #[test]
    fn test_action_creation_with_details() {
        let action: Action = Action::new(
            String::from("DecideSwap"),
            Some(String::from("accepted")),
        );

        assert_eq!(action.name, "DecideSwap");
        assert_eq!(action.details, Some(String::from("accepted")));
    }

    #[test]
    fn test_new_event_is_not_yet_persisted() {
        let event: AuditEvent = create_test_event();

        assert_eq!(event.event_id, None);
        assert_eq!(event.store_id, Some(7));
        assert_eq!(event.before.data, "none");
        assert_eq!(event.after.data, "shift=3");
    }

    #[test]
    fn test_with_store_id_rebinds_store() {
        let event: AuditEvent = AuditEvent::new(
            None,
            Actor::user(&UserId::new("manager-1")),
            Action::new(String::from("CreateStore"), None),
            StateSnapshot::absent(),
            StateSnapshot::new(String::from("name=Cafe A")),
        );

        let bound: AuditEvent = event.with_store_id(12);
        assert_eq!(bound.store_id, Some(12));
        assert_eq!(bound.action.name, "CreateStore");
    }
}
