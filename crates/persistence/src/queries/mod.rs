// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for persistence layer.
//!
//! This module contains all read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `stores`: Stores, memberships, configuration and profiles
//! - `weeks`: Week lookups
//! - `schedule`: Needs, availability and shifts
//! - `swaps`: Swap requests
//! - `audit`: Audit events
//! - `state`: Loading the state commands are applied against

pub mod audit;
pub mod schedule;
pub mod state;
pub mod stores;
pub mod swaps;
pub mod weeks;
