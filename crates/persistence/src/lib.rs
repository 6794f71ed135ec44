// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for Shiftly.
//!
//! This crate stores stores, memberships, weeks, needs, availability,
//! shifts, swap requests and the audit trail in `SQLite` through Diesel.
//!
//! ## Writes
//!
//! Writes arrive as a `TransitionResult` (or a `StoreCreation`) produced by
//! the core engine. Each one is applied in a single immediate transaction
//! together with its audit event. Rules that concurrent writers could break
//! between the engine's check and the write are checked again inside that
//! transaction, and the schema backs the most important ones with
//! constraints:
//!
//! - `UNIQUE (store_id, week_start)` on weeks
//! - `shifts_one_per_slot` on `(week_id, user_id, weekday, start_time)`
//! - `swap_requests_one_pending` on pending requests per shift
//!
//! ## Testing
//!
//! Tests use `Persistence::new_in_memory()`; each call gets its own shared
//! in-memory database, so tests never see each other's rows.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use shiftly::{State, StoreCreation, TransitionResult};
use shiftly_audit::AuditEvent;
use shiftly_domain::{
    Availability, Membership, Need, Shift, Store, StoreConfig, SwapRequest, UserId, Week,
};
use time::Date;

mod backend;
mod data_models;
mod diesel_schema;
mod encoding;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    MemberData, PersistStoreResult, PersistTransitionResult, ProfileData, StoreMembershipData,
};
pub use error::PersistenceError;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the scheduling data and its audit trail.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::initialize_database(&shared_memory_url)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::initialize_database(path_str)?;
        backend::enable_wal_mode(&mut conn)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is active on this connection.
    ///
    /// # Errors
    ///
    /// Returns an error if enforcement is off or the check fails.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Persists a store creation with its manager membership, default
    /// configuration and audit event.
    ///
    /// # Errors
    ///
    /// Returns an error naming the failed step; nothing is committed.
    pub fn persist_store_creation(
        &mut self,
        creation: &StoreCreation,
    ) -> Result<PersistStoreResult, PersistenceError> {
        mutations::stores::persist_store_creation(&mut self.conn, creation)
    }

    /// Persists a transition result and its audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule no longer holds or the write fails.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistTransitionResult, PersistenceError> {
        mutations::transition::persist_transition(&mut self.conn, result)
    }

    /// Stores a user's profile, auditing the change when it differs.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn sync_profile(
        &mut self,
        profile: &ProfileData,
        audit_event: &AuditEvent,
    ) -> Result<bool, PersistenceError> {
        mutations::profiles::sync_profile(&mut self.conn, profile, audit_event)
    }

    // ========================================================================
    // Stores and members
    // ========================================================================

    /// Retrieves a store by id.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the store does not exist.
    pub fn get_store(&mut self, store_id: i64) -> Result<Store, PersistenceError> {
        queries::stores::get_store(&mut self.conn, store_id)
    }

    /// Lists the stores a user belongs to, with the user's role.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_stores_for_user(
        &mut self,
        user_id: &UserId,
    ) -> Result<Vec<StoreMembershipData>, PersistenceError> {
        queries::stores::list_stores_for_user(&mut self.conn, user_id)
    }

    /// Lists a store's memberships.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_memberships(&mut self, store_id: i64) -> Result<Vec<Membership>, PersistenceError> {
        queries::stores::list_memberships(&mut self.conn, store_id)
    }

    /// Lists a store's members with their profiles.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_members_with_profiles(
        &mut self,
        store_id: i64,
    ) -> Result<Vec<MemberData>, PersistenceError> {
        queries::stores::list_members_with_profiles(&mut self.conn, store_id)
    }

    /// Retrieves the membership of a user in a store, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_membership(
        &mut self,
        store_id: i64,
        user_id: &UserId,
    ) -> Result<Option<Membership>, PersistenceError> {
        queries::stores::get_membership(&mut self.conn, store_id, user_id)
    }

    /// Retrieves a store's configuration.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the store has none.
    pub fn get_store_config(&mut self, store_id: i64) -> Result<StoreConfig, PersistenceError> {
        queries::stores::get_store_config(&mut self.conn, store_id)
    }

    /// Retrieves a user's synced profile, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_profile(
        &mut self,
        user_id: &UserId,
    ) -> Result<Option<ProfileData>, PersistenceError> {
        queries::stores::get_profile(&mut self.conn, user_id)
    }

    // ========================================================================
    // Weeks
    // ========================================================================

    /// Retrieves a week by id.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the week does not exist.
    pub fn get_week(&mut self, week_id: i64) -> Result<Week, PersistenceError> {
        queries::weeks::get_week(&mut self.conn, week_id)
    }

    /// Looks up a store's week by its Monday.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_week(
        &mut self,
        store_id: i64,
        week_start: Date,
    ) -> Result<Option<Week>, PersistenceError> {
        queries::weeks::find_week(&mut self.conn, store_id, week_start)
    }

    /// Lists a store's most recent weeks, latest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_recent_weeks(
        &mut self,
        store_id: i64,
        limit: i64,
    ) -> Result<Vec<Week>, PersistenceError> {
        queries::weeks::list_recent_weeks(&mut self.conn, store_id, limit)
    }

    // ========================================================================
    // Needs, availability and shifts
    // ========================================================================

    /// Lists the needs of a week.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_needs(&mut self, week_id: i64) -> Result<Vec<Need>, PersistenceError> {
        queries::schedule::list_needs(&mut self.conn, week_id)
    }

    /// Retrieves a need by id.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the need does not exist.
    pub fn get_need(&mut self, need_id: i64) -> Result<Need, PersistenceError> {
        queries::schedule::get_need(&mut self.conn, need_id)
    }

    /// Lists the availability submitted for a week.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_availabilities(
        &mut self,
        week_id: i64,
    ) -> Result<Vec<Availability>, PersistenceError> {
        queries::schedule::list_availabilities(&mut self.conn, week_id)
    }

    /// Retrieves an availability entry by id.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the entry does not exist.
    pub fn get_availability(
        &mut self,
        availability_id: i64,
    ) -> Result<Availability, PersistenceError> {
        queries::schedule::get_availability(&mut self.conn, availability_id)
    }

    /// Lists the shifts of a week.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_shifts_for_week(&mut self, week_id: i64) -> Result<Vec<Shift>, PersistenceError> {
        queries::schedule::list_shifts_for_week(&mut self.conn, week_id)
    }

    /// Lists a user's shifts across weeks.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_shifts_for_user(
        &mut self,
        user_id: &UserId,
    ) -> Result<Vec<Shift>, PersistenceError> {
        queries::schedule::list_shifts_for_user(&mut self.conn, user_id)
    }

    /// Lists a user's shifts in one week.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_shifts_for_user_in_week(
        &mut self,
        week_id: i64,
        user_id: &UserId,
    ) -> Result<Vec<Shift>, PersistenceError> {
        queries::schedule::list_shifts_for_user_in_week(&mut self.conn, week_id, user_id)
    }

    /// Retrieves a shift by id.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the shift does not exist.
    pub fn get_shift(&mut self, shift_id: i64) -> Result<Shift, PersistenceError> {
        queries::schedule::get_shift(&mut self.conn, shift_id)
    }

    // ========================================================================
    // Swaps
    // ========================================================================

    /// Retrieves a swap request by id.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the request does not exist.
    pub fn get_swap_request(&mut self, swap_id: i64) -> Result<SwapRequest, PersistenceError> {
        queries::swaps::get_swap_request(&mut self.conn, swap_id)
    }

    /// Lists the swap requests of a store, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_swap_requests_for_store(
        &mut self,
        store_id: i64,
    ) -> Result<Vec<SwapRequest>, PersistenceError> {
        queries::swaps::list_swap_requests_for_store(&mut self.conn, store_id)
    }

    // ========================================================================
    // Audit and state
    // ========================================================================

    /// Retrieves an audit event by id.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the event does not exist.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, event_id)
    }

    /// Lists a store's audit events, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_audit_events(
        &mut self,
        store_id: i64,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::list_audit_events(&mut self.conn, store_id)
    }

    /// Loads the store-level state commands are applied against.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the store does not exist.
    pub fn load_store_state(&mut self, store_id: i64) -> Result<State, PersistenceError> {
        queries::state::load_store_state(&mut self.conn, store_id)
    }

    /// Loads the state of one week together with its store.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the week does not exist.
    pub fn load_week_state(&mut self, week_id: i64) -> Result<State, PersistenceError> {
        queries::state::load_week_state(&mut self.conn, week_id)
    }
}
