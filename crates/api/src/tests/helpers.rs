// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::sync::Arc;
use std::time::Duration;

use lexdesk::{CoordinatorConfig, ReassignmentCoordinator};
use lexdesk_domain::{Case, CaseId, CaseStatus, Client, ClientId, Staff, StaffId};
use lexdesk_persistence::Persistence;
use tokio::sync::Mutex;

use crate::{ClientDecisionRequest, SubmitDepartureRequest};

/// Seeds staff X and Y, clients A and B, and cases C1 (A), C2 (A, B) and
/// an inactive C3 (A). X handles every case for every linked client.
pub fn create_seeded_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    for id in ["X", "Y"] {
        persistence
            .create_staff(&Staff::new(StaffId::new(id), &format!("Staff {id}"), "Lawyer"))
            .unwrap();
    }
    for id in ["A", "B"] {
        persistence
            .create_client(&Client::new(
                ClientId::new(id),
                &format!("Client {id}"),
                "555-0100",
            ))
            .unwrap();
    }
    for id in ["C1", "C2", "C3"] {
        let mut case: Case = Case::new(CaseId::new(id), &format!("Case {id}"), "civil");
        if id == "C3" {
            case.status = CaseStatus::Inactive;
        }
        persistence.create_case(&case).unwrap();
    }

    for (client, case) in [("A", "C1"), ("A", "C2"), ("B", "C2"), ("A", "C3")] {
        persistence
            .link_client_case(&ClientId::new(client), &CaseId::new(case))
            .unwrap();
    }
    for case in ["C1", "C2", "C3"] {
        persistence
            .assign_staff_to_case(&StaffId::new("X"), &CaseId::new(case))
            .unwrap();
    }

    persistence
}

pub fn create_coordinator(persistence: Persistence) -> ReassignmentCoordinator<Persistence> {
    ReassignmentCoordinator::new(
        Arc::new(Mutex::new(persistence)),
        CoordinatorConfig::new(Duration::from_secs(5), 4),
    )
}

pub fn decision(client: &str, action: &str, target: Option<&str>) -> ClientDecisionRequest {
    ClientDecisionRequest {
        client_id: String::from(client),
        action: String::from(action),
        target_staff_id: target.map(String::from),
    }
}

pub fn departure(decisions: Vec<ClientDecisionRequest>) -> SubmitDepartureRequest {
    SubmitDepartureRequest { decisions }
}
