// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mutation modules.
//!
//! This module contains all state-changing operations for the persistence layer.
//! Each public entry point runs in its own immediate transaction and writes its
//! audit event in that same transaction.
//!
//! ## Module Organization
//!
//! - `audit`: Audit event persistence
//! - `stores`: Store creation and configuration writes
//! - `transition`: Applying a `TransitionResult` (`persist_transition`)
//! - `profiles`: Identity provider profile synchronisation

pub mod audit;
pub mod profiles;
pub mod stores;
pub mod transition;
