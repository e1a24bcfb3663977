// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use lexdesk_domain::{
    Case, CaseId, Client, ClientId, Decision, Staff, StaffCaseAssociation, StaffId,
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::{
    AssociationChange, CaseTransfer, CoordinatorConfig, ReassignmentCoordinator,
    ReassignmentStore, StoreError,
};

/// A client-scoped staff assignment: `(staff, case, client)`.
pub type Assignment = (StaffId, CaseId, ClientId);

/// In-memory store with hooks for injecting failures and delays.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub staff: BTreeMap<StaffId, Staff>,
    pub clients: BTreeMap<ClientId, Client>,
    pub cases: Vec<Case>,
    pub assignments: Vec<Assignment>,
    pub past_clients: Vec<Assignment>,
    /// Clients whose transfer fails with a backend error.
    pub failing_clients: BTreeSet<ClientId>,
    /// Per-client delay inside `apply_transfer`.
    pub apply_delays: BTreeMap<ClientId, Duration>,
    /// Cancelled as soon as the first transfer is applied.
    pub cancel_on_apply: Option<CancellationToken>,
    /// Number of transfers that modified the store.
    pub mutations: usize,
    /// Number of `apply_transfer` calls.
    pub transfer_calls: usize,
}

impl MemoryStore {
    pub fn add_staff(&mut self, id: &str) {
        let staff_id: StaffId = StaffId::new(id);
        self.staff.insert(
            staff_id.clone(),
            Staff::new(staff_id, &format!("Staff {id}"), "Associate"),
        );
    }

    pub fn add_client(&mut self, id: &str) {
        let client_id: ClientId = ClientId::new(id);
        self.clients.insert(
            client_id.clone(),
            Client::new(client_id, &format!("Client {id}"), "555-0100"),
        );
    }

    pub fn add_case(&mut self, id: &str) {
        self.cases.push(Case::new(
            CaseId::new(id),
            &format!("Case {id}"),
            "Civil",
        ));
    }

    pub fn assign(&mut self, staff: &str, case: &str, client: &str) {
        self.assignments.push((
            StaffId::new(staff),
            CaseId::new(case),
            ClientId::new(client),
        ));
    }

    pub fn holds(&self, staff: &str, case: &str, client: &str) -> bool {
        self.assignments.contains(&(
            StaffId::new(staff),
            CaseId::new(case),
            ClientId::new(client),
        ))
    }

    pub fn is_past_client(&self, client: &str, staff: &str, case: &str) -> bool {
        self.past_clients.contains(&(
            StaffId::new(staff),
            CaseId::new(case),
            ClientId::new(client),
        ))
    }

    /// Comparable view of the persistent state, hooks excluded.
    pub fn snapshot(&self) -> (Vec<Assignment>, Vec<Assignment>) {
        let mut assignments: Vec<Assignment> = self.assignments.clone();
        assignments.sort();
        let mut past: Vec<Assignment> = self.past_clients.clone();
        past.sort();
        (assignments, past)
    }
}

impl ReassignmentStore for MemoryStore {
    fn load_staff_associations(
        &mut self,
        staff_id: &StaffId,
    ) -> Result<Vec<StaffCaseAssociation>, StoreError> {
        if !self.staff.contains_key(staff_id) {
            return Err(StoreError::NotFound {
                entity: "staff",
                id: staff_id.value().to_string(),
            });
        }

        let mut associations: Vec<StaffCaseAssociation> = Vec::new();
        for case in &self.cases {
            let clients: Vec<Client> = self
                .assignments
                .iter()
                .filter(|(s, c, _)| s == staff_id && c == &case.case_id)
                .filter_map(|(_, _, client_id)| self.clients.get(client_id).cloned())
                .collect();
            if clients.is_empty() {
                continue;
            }
            let association = clients.into_iter().fold(
                StaffCaseAssociation::new(staff_id.clone(), case.clone()),
                StaffCaseAssociation::with_client,
            );
            associations.push(association);
        }
        Ok(associations)
    }

    fn list_staff(&mut self) -> Result<Vec<Staff>, StoreError> {
        Ok(self.staff.values().cloned().collect())
    }

    fn apply_transfer(
        &mut self,
        transfer: &CaseTransfer,
    ) -> Result<Vec<AssociationChange>, StoreError> {
        self.transfer_calls += 1;

        if let Some(token) = &self.cancel_on_apply {
            token.cancel();
        }
        if let Some(delay) = self.apply_delays.get(&transfer.client_id) {
            std::thread::sleep(*delay);
        }
        if self.failing_clients.contains(&transfer.client_id) {
            return Err(StoreError::Backend(String::from("injected failure")));
        }
        if !self.clients.contains_key(&transfer.client_id) {
            return Err(StoreError::NotFound {
                entity: "client",
                id: transfer.client_id.value().to_string(),
            });
        }
        if let Some(target) = &transfer.to_staff_id
            && !self.staff.contains_key(target)
        {
            return Err(StoreError::NotFound {
                entity: "staff",
                id: target.value().to_string(),
            });
        }

        let mut changes: Vec<AssociationChange> = Vec::new();
        for case_id in &transfer.case_ids {
            let held: Assignment = (
                transfer.from_staff_id.clone(),
                case_id.clone(),
                transfer.client_id.clone(),
            );
            let Some(pos) = self.assignments.iter().position(|a| a == &held) else {
                changes.push(AssociationChange::AlreadyApplied(case_id.clone()));
                continue;
            };
            self.assignments.remove(pos);

            match &transfer.to_staff_id {
                None => {
                    if !self.past_clients.contains(&held) {
                        self.past_clients.push(held);
                    }
                    changes.push(AssociationChange::Retired(case_id.clone()));
                }
                Some(target) => {
                    let replacement: Assignment =
                        (target.clone(), case_id.clone(), transfer.client_id.clone());
                    if !self.assignments.contains(&replacement) {
                        self.assignments.push(replacement);
                    }
                    changes.push(AssociationChange::Reassigned(case_id.clone()));
                }
            }
        }

        if changes.iter().any(AssociationChange::is_change) {
            self.mutations += 1;
        }
        Ok(changes)
    }
}

/// Staff X handles C1 for client A and C2 for clients A and B.
/// Staff Y exists as a replacement.
pub fn create_two_client_store() -> MemoryStore {
    let mut store: MemoryStore = MemoryStore::default();
    store.add_staff("X");
    store.add_staff("Y");
    store.add_client("A");
    store.add_client("B");
    store.add_case("C1");
    store.add_case("C2");
    store.assign("X", "C1", "A");
    store.assign("X", "C2", "A");
    store.assign("X", "C2", "B");
    store
}

pub fn create_coordinator(
    store: MemoryStore,
    config: CoordinatorConfig,
) -> ReassignmentCoordinator<MemoryStore> {
    ReassignmentCoordinator::new(Arc::new(Mutex::new(store)), config)
}

pub fn decisions(entries: &[(&str, Decision)]) -> BTreeMap<ClientId, Decision> {
    entries
        .iter()
        .map(|(client, decision)| (ClientId::new(client), decision.clone()))
        .collect()
}

pub fn reassign_to(staff: &str) -> Decision {
    Decision::reassign(StaffId::new(staff))
}
