// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! Identity is supplied by an external provider; this module never sees
//! credentials. Authorization is always derived from the stored membership
//! of the caller, never from anything in the request.

use shiftly_audit::Actor;
use shiftly_domain::{Membership, Role, UserId};
use shiftly_persistence::{Persistence, ProfileData};

use crate::error::{ApiError, AuthError, translate_persistence_error};

/// An authenticated caller as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The provider's opaque identifier for this user.
    pub user_id: UserId,
    /// Display name, when the provider supplies one.
    pub display_name: Option<String>,
    /// Email address, when the provider supplies one.
    pub email: Option<String>,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The provider's identifier for this user
    /// * `display_name` - Optional display name
    /// * `email` - Optional email address
    #[must_use]
    pub const fn new(user_id: UserId, display_name: Option<String>, email: Option<String>) -> Self {
        Self {
            user_id,
            display_name,
            email,
        }
    }

    /// Converts this actor into an audit `Actor`.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::user(&self.user_id)
    }

    /// The profile row this actor's identity claims describe.
    #[must_use]
    pub fn to_profile(&self) -> ProfileData {
        ProfileData {
            user_id: self.user_id.value().to_string(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Turns identity-provider claims into an `AuthenticatedActor`.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Validates identity claims.
    ///
    /// Blank optional claims are treated as absent.
    ///
    /// # Arguments
    ///
    /// * `user_id` - The provider's user identifier, if any was supplied
    /// * `display_name` - The provider's display name claim
    /// * `email` - The provider's email claim
    ///
    /// # Errors
    ///
    /// Returns an error if no user identifier was supplied or it is blank.
    pub fn authenticate(
        user_id: Option<&str>,
        display_name: Option<&str>,
        email: Option<&str>,
    ) -> Result<AuthenticatedActor, AuthError> {
        let user_id: &str = user_id
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("no user identity was supplied"),
            })?;

        let claim = |value: Option<&str>| -> Option<String> {
            value
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(String::from)
        };

        Ok(AuthenticatedActor::new(
            UserId::new(user_id),
            claim(display_name),
            claim(email),
        ))
    }
}

/// Checks the caller's stored membership before store-scoped operations.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Requires the actor to hold any membership in the store.
    ///
    /// # Arguments
    ///
    /// * `persistence` - The persistence layer
    /// * `store_id` - The store being accessed
    /// * `actor` - The authenticated actor
    /// * `action` - The action name reported on refusal
    ///
    /// # Returns
    ///
    /// The actor's role in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The store does not exist
    /// - The actor is not a member
    /// - The database cannot be read
    pub fn require_member(
        persistence: &mut Persistence,
        store_id: i64,
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<Role, ApiError> {
        persistence
            .get_store(store_id)
            .map_err(translate_persistence_error)?;
        let membership: Option<Membership> = persistence
            .get_membership(store_id, &actor.user_id)
            .map_err(translate_persistence_error)?;

        membership.map(|membership| membership.role).ok_or_else(|| {
            AuthError::Unauthorized {
                action: String::from(action),
                required_role: String::from("store membership"),
            }
            .into()
        })
    }

    /// Requires the actor to be a manager of the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store does not exist, the actor is not a
    /// manager of it, or the database cannot be read.
    pub fn require_manager(
        persistence: &mut Persistence,
        store_id: i64,
        actor: &AuthenticatedActor,
        action: &str,
    ) -> Result<(), ApiError> {
        match Self::require_member(persistence, store_id, actor, action) {
            Ok(Role::Manager) => Ok(()),
            Ok(Role::Staff) | Err(ApiError::Unauthorized { .. }) => Err(AuthError::Unauthorized {
                action: String::from(action),
                required_role: String::from("manager"),
            }
            .into()),
            Err(err) => Err(err),
        }
    }
}
