// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use crate::{ClientId, Decision, DecisionAction, DomainError, StaffId};

#[test]
fn test_action_accepts_legacy_spellings() {
    assert_eq!(
        DecisionAction::from_str("retire").unwrap(),
        DecisionAction::Retire
    );
    assert_eq!(
        DecisionAction::from_str("past client").unwrap(),
        DecisionAction::Retire
    );
    assert_eq!(
        DecisionAction::from_str("delete").unwrap(),
        DecisionAction::Retire
    );
    assert_eq!(
        DecisionAction::from_str("Reassign").unwrap(),
        DecisionAction::Reassign
    );
}

#[test]
fn test_action_rejects_unknown_value() {
    assert_eq!(
        DecisionAction::from_str("archive"),
        Err(DomainError::InvalidAction(String::from("archive")))
    );
}

#[test]
fn test_reassign_requires_target() {
    let client_id: ClientId = ClientId::new("client-a");
    let result: Result<Decision, DomainError> =
        DecisionAction::Reassign.into_decision(&client_id, None);

    assert_eq!(
        result,
        Err(DomainError::MissingReassignmentTarget {
            client_id: String::from("client-a"),
        })
    );
}

#[test]
fn test_retire_ignores_target() {
    let client_id: ClientId = ClientId::new("client-a");
    let decision: Decision = DecisionAction::Retire
        .into_decision(&client_id, Some(StaffId::new("staff-y")))
        .unwrap();

    assert_eq!(decision, Decision::Retire);
    assert!(decision.target().is_none());
}

#[test]
fn test_reassign_exposes_target() {
    let decision: Decision = Decision::reassign(StaffId::new("staff-y"));
    assert_eq!(decision.action(), DecisionAction::Reassign);
    assert_eq!(decision.target(), Some(&StaffId::new("staff-y")));
}
