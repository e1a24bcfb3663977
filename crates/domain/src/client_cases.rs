// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-client projection of a staff member's case associations.
//!
//! When a staff member departs, the operator sees each of the staff
//! member's clients next to the cases the two of them share. These
//! functions derive that view from an already-loaded snapshot of the
//! staff member's associations. They never touch the store.
//!
//! ## Invariants
//!
//! - A staff member with no associations yields an empty mapping
//! - Every roster client has an entry, possibly empty
//! - A client's entry only lists cases the staff member handles for that client
//! - Case order follows association order; a case is listed at most once per client

use std::collections::{BTreeMap, BTreeSet};

use crate::association::StaffCaseAssociation;
use crate::types::{Case, CaseId, CaseRef, Client, ClientId, Staff, StaffId};

/// Maps every roster client to the cases they share with the staff member.
///
/// # Arguments
///
/// * `associations` - The staff member's case associations
/// * `roster` - The clients to report on
#[must_use]
pub fn compute_client_case_map(
    associations: &[StaffCaseAssociation],
    roster: &[ClientId],
) -> BTreeMap<ClientId, Vec<CaseRef>> {
    if associations.is_empty() {
        return BTreeMap::new();
    }

    let mut map: BTreeMap<ClientId, Vec<CaseRef>> = roster
        .iter()
        .map(|client_id| (client_id.clone(), Vec::new()))
        .collect();

    for association in associations {
        for client in &association.clients {
            let Some(cases) = map.get_mut(&client.client_id) else {
                continue;
            };
            if !cases.iter().any(|c| c.case_id == association.case.case_id) {
                cases.push(association.case.case_ref());
            }
        }
    }

    map
}

/// Same as [`compute_client_case_map`], with the roster derived from the
/// associations themselves.
#[must_use]
pub fn compute_staff_client_case_map(
    associations: &[StaffCaseAssociation],
) -> BTreeMap<ClientId, Vec<CaseRef>> {
    let roster: Vec<ClientId> = derive_client_roster(associations)
        .into_iter()
        .map(|client| client.client_id)
        .collect();
    compute_client_case_map(associations, &roster)
}

/// Returns the unique clients reachable through any association.
///
/// Clients are deduplicated by id and returned in first-seen order.
#[must_use]
pub fn derive_client_roster(associations: &[StaffCaseAssociation]) -> Vec<Client> {
    let mut seen: BTreeSet<&ClientId> = BTreeSet::new();
    let mut roster: Vec<Client> = Vec::new();

    for client in associations.iter().flat_map(|a| a.clients.iter()) {
        if seen.insert(&client.client_id) {
            roster.push(client.clone());
        }
    }

    roster
}

/// Returns the distinct cases a staff member is associated with.
#[must_use]
pub fn distinct_cases(associations: &[StaffCaseAssociation]) -> Vec<Case> {
    let mut seen: BTreeSet<&CaseId> = BTreeSet::new();
    associations
        .iter()
        .filter(|a| seen.insert(&a.case.case_id))
        .map(|a| a.case.clone())
        .collect()
}

/// Returns every staff member who may take over from `departing`.
#[must_use]
pub fn reassignment_targets(all_staff: &[Staff], departing: &StaffId) -> Vec<Staff> {
    all_staff
        .iter()
        .filter(|s| &s.staff_id != departing)
        .cloned()
        .collect()
}
