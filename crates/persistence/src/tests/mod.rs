// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use lexdesk_domain::{Case, CaseId, Client, ClientId, Staff, StaffId};

use crate::Persistence;

pub fn create_test_staff(id: &str) -> Staff {
    Staff::new(StaffId::new(id), &format!("Staff {id}"), "Lawyer")
}

pub fn create_test_client(id: &str) -> Client {
    Client::new(ClientId::new(id), &format!("Client {id}"), "555-0100")
}

pub fn create_test_case(id: &str) -> Case {
    Case::new(CaseId::new(id), &format!("Case {id}"), "civil")
}

/// Seeds staff X and Y, clients A and B, and cases C1 (A) and C2 (A, B).
/// X handles C1 for A and C2 for both A and B.
pub fn create_seeded_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    for id in ["X", "Y"] {
        persistence.create_staff(&create_test_staff(id)).unwrap();
    }
    for id in ["A", "B"] {
        persistence.create_client(&create_test_client(id)).unwrap();
    }
    for id in ["C1", "C2"] {
        persistence.create_case(&create_test_case(id)).unwrap();
    }

    persistence
        .link_client_case(&ClientId::new("A"), &CaseId::new("C1"))
        .unwrap();
    persistence
        .link_client_case(&ClientId::new("A"), &CaseId::new("C2"))
        .unwrap();
    persistence
        .link_client_case(&ClientId::new("B"), &CaseId::new("C2"))
        .unwrap();

    persistence
        .assign_staff_to_case(&StaffId::new("X"), &CaseId::new("C1"))
        .unwrap();
    persistence
        .assign_staff_to_case(&StaffId::new("X"), &CaseId::new("C2"))
        .unwrap();

    persistence
}

/// Returns whether `staff` handles `case` on behalf of `client`.
pub fn holds(persistence: &mut Persistence, staff: &str, case: &str, client: &str) -> bool {
    persistence
        .list_case_staff(&CaseId::new(case))
        .unwrap()
        .iter()
        .any(|a| a.staff_id == staff && a.client_id == client)
}
