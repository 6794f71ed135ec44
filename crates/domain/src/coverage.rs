// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Staffing coverage of a week's needs.
//!
//! Coverage is a read-only view: it compares each need against the shifts
//! assigned to it and the availability members have submitted. It never
//! assigns anyone.

use crate::types::{Availability, Membership, Need, Shift, UserId};
use crate::validation::find_overlapping_shift;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Coverage of a single need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedCoverage {
    /// The need.
    pub need: Need,
    /// Shifts assigned against the need.
    pub assigned: Vec<Shift>,
    /// Headcount still missing (zero when fully or over staffed).
    pub missing: u32,
    /// Current members whose availability covers the whole need window and
    /// who hold no overlapping shift that day.
    pub candidates: Vec<UserId>,
}

/// Computes coverage for every need, in the order the needs are given.
///
/// Availability left behind by users who are no longer in `memberships`
/// never produces a candidate.
#[must_use]
pub fn compute_coverage(
    needs: &[Need],
    availabilities: &[Availability],
    shifts: &[Shift],
    memberships: &[Membership],
) -> Vec<NeedCoverage> {
    let members: BTreeSet<&UserId> = memberships
        .iter()
        .map(|membership| &membership.user_id)
        .collect();

    needs
        .iter()
        .map(|need| {
            let assigned: Vec<Shift> = shifts
                .iter()
                .filter(|shift| shift.need_id == Some(need.need_id))
                .cloned()
                .collect();

            let assigned_count: u32 = u32::try_from(assigned.len()).unwrap_or(u32::MAX);
            let missing: u32 = need.required_staff.saturating_sub(assigned_count);

            let candidates: BTreeSet<UserId> = availabilities
                .iter()
                .filter(|entry| members.contains(&entry.user_id))
                .filter(|entry| entry.weekday == need.weekday && entry.range.contains(&need.range))
                .filter(|entry| {
                    find_overlapping_shift(shifts, &entry.user_id, need.weekday, &need.range, None)
                        .is_none()
                })
                .map(|entry| entry.user_id.clone())
                .collect();

            NeedCoverage {
                need: need.clone(),
                assigned,
                missing,
                candidates: candidates.into_iter().collect(),
            }
        })
        .collect()
}
