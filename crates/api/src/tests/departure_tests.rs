// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use lexdesk_domain::{ClientId, Decision, StaffId};
use tokio_util::sync::CancellationToken;

use crate::{
    ApiError, OutcomeStatus, SubmitDepartureResponse, list_past_clients, list_staff_clients,
    parse_decisions, submit_departure,
};

use super::helpers::{create_coordinator, create_seeded_persistence, decision, departure};

// ============================================================================
// Decision Parsing
// ============================================================================

#[test]
fn test_parse_decisions_builds_one_decision_per_client() {
    let request = departure(vec![
        decision("A", "retire", None),
        decision("B", "reassign", Some("Y")),
    ]);
    let decisions: BTreeMap<ClientId, Decision> = parse_decisions(&request).unwrap();

    assert_eq!(decisions.len(), 2);
    assert_eq!(decisions[&ClientId::new("A")], Decision::Retire);
    assert_eq!(
        decisions[&ClientId::new("B")],
        Decision::reassign(StaffId::new("Y"))
    );
}

#[test]
fn test_parse_decisions_accepts_past_client_spelling() {
    let request = departure(vec![decision("A", "past client", None)]);
    let decisions = parse_decisions(&request).unwrap();
    assert_eq!(decisions[&ClientId::new("A")], Decision::Retire);
}

#[test]
fn test_parse_decisions_rejects_duplicate_client() {
    let request = departure(vec![
        decision("A", "retire", None),
        decision("A", "reassign", Some("Y")),
    ]);
    let err: ApiError = parse_decisions(&request).unwrap_err();
    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "one_decision_per_client"
    ));
}

#[test]
fn test_parse_decisions_rejects_unknown_action() {
    let request = departure(vec![decision("A", "archive", None)]);
    let err: ApiError = parse_decisions(&request).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "action"));
}

#[test]
fn test_parse_decisions_rejects_reassign_without_target() {
    let request = departure(vec![decision("A", "reassign", Some("  "))]);
    let err: ApiError = parse_decisions(&request).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "targetStaffId"));
}

#[test]
fn test_parse_decisions_rejects_blank_client_id() {
    let request = departure(vec![decision("", "retire", None)]);
    let err: ApiError = parse_decisions(&request).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "clientId"));
}

#[test]
fn test_departure_request_deserializes_camel_case() {
    let json = r#"{"decisions":[{"clientId":"A","action":"reassign","targetStaffId":"Y"},{"clientId":"B","action":"retire"}]}"#;
    let request: crate::SubmitDepartureRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.decisions.len(), 2);
    assert_eq!(request.decisions[0].target_staff_id.as_deref(), Some("Y"));
    assert_eq!(request.decisions[1].target_staff_id, None);
}

// ============================================================================
// Departure Submission
// ============================================================================

#[tokio::test]
async fn test_submit_departure_reassigns_client() {
    let coordinator = create_coordinator(create_seeded_persistence());
    let request = departure(vec![decision("A", "reassign", Some("Y"))]);

    let response: SubmitDepartureResponse =
        submit_departure(&coordinator, "X", &request, &CancellationToken::new())
            .await
            .unwrap();

    assert!(response.full_success);
    assert_eq!(response.succeeded, 1);
    assert_eq!(response.failed, 0);
    assert_eq!(response.message, "Successfully processed 1 client(s)");
    assert_eq!(response.outcomes.len(), 1);
    assert_eq!(response.outcomes[0].status, OutcomeStatus::Success);
    assert_eq!(response.outcomes[0].message, "Client A reassigned to Y (3 case(s))");
    assert_eq!(response.outcomes[0].error_kind, None);

    let mut persistence = coordinator.store().lock().await;
    let roster = list_staff_clients(&mut persistence, "Y").unwrap();
    assert_eq!(roster.clients.len(), 1);
    assert_eq!(roster.clients[0].client_id, "A");

    // B still shares C2 with X.
    let roster = list_staff_clients(&mut persistence, "X").unwrap();
    assert_eq!(roster.clients.len(), 1);
    assert_eq!(roster.clients[0].client_id, "B");
}

#[tokio::test]
async fn test_submit_departure_reports_partial_failure() {
    let coordinator = create_coordinator(create_seeded_persistence());
    let request = departure(vec![
        decision("B", "reassign", Some("Z")),
        decision("A", "retire", None),
    ]);

    let response = submit_departure(&coordinator, "X", &request, &CancellationToken::new())
        .await
        .unwrap();

    assert!(!response.full_success);
    assert_eq!(response.message, "Completed: 1 success, 1 failed");
    let ids: Vec<&str> = response
        .outcomes
        .iter()
        .map(|o| o.client_id.as_str())
        .collect();
    assert_eq!(ids, vec!["A", "B"]);
    assert_eq!(response.outcomes[0].status, OutcomeStatus::Success);
    assert_eq!(response.outcomes[1].status, OutcomeStatus::Failure);
    assert_eq!(
        response.outcomes[1].error_kind.as_deref(),
        Some("NotFoundError")
    );

    let mut persistence = coordinator.store().lock().await;
    let past = list_past_clients(&mut persistence, "X").unwrap();
    assert_eq!(past.past_clients.len(), 3);
    assert!(past.past_clients.iter().all(|p| p.client_id == "A"));
}

#[tokio::test]
async fn test_submit_departure_rejects_empty_decisions() {
    let coordinator = create_coordinator(create_seeded_persistence());
    let err = submit_departure(
        &coordinator,
        "X",
        &departure(Vec::new()),
        &CancellationToken::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "decisions"));
}

#[tokio::test]
async fn test_submit_departure_rejects_self_reassignment() {
    let coordinator = create_coordinator(create_seeded_persistence());
    let request = departure(vec![decision("A", "reassign", Some("X"))]);

    let err = submit_departure(&coordinator, "X", &request, &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::DomainRuleViolation { ref rule, .. } if rule == "no_self_reassignment"
    ));

    let mut persistence = coordinator.store().lock().await;
    assert_eq!(list_staff_clients(&mut persistence, "X").unwrap().clients.len(), 2);
}

#[tokio::test]
async fn test_submit_departure_for_unknown_staff_fails_each_client() {
    let coordinator = create_coordinator(create_seeded_persistence());
    let request = departure(vec![decision("A", "retire", None)]);

    let response = submit_departure(&coordinator, "NOBODY", &request, &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(response.failed, 1);
    assert_eq!(
        response.outcomes[0].error_kind.as_deref(),
        Some("NotFoundError")
    );
}

#[tokio::test]
async fn test_submit_departure_twice_is_idempotent() {
    let coordinator = create_coordinator(create_seeded_persistence());
    let request = departure(vec![decision("A", "retire", None)]);
    let cancel = CancellationToken::new();

    let first = submit_departure(&coordinator, "X", &request, &cancel)
        .await
        .unwrap();
    let second = submit_departure(&coordinator, "X", &request, &cancel)
        .await
        .unwrap();

    assert!(first.full_success);
    assert!(second.full_success);

    let mut persistence = coordinator.store().lock().await;
    assert_eq!(
        list_past_clients(&mut persistence, "X")
            .unwrap()
            .past_clients
            .len(),
        3
    );
}

#[tokio::test]
async fn test_submit_departure_after_cancel_reports_cancelled() {
    let coordinator = create_coordinator(create_seeded_persistence());
    let request = departure(vec![decision("A", "retire", None)]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let response = submit_departure(&coordinator, "X", &request, &cancel)
        .await
        .unwrap();

    assert_eq!(response.failed, 1);
    assert_eq!(
        response.outcomes[0].error_kind.as_deref(),
        Some("CancelledError")
    );
}

#[test]
fn test_departure_response_serializes_camel_case() {
    let response = SubmitDepartureResponse {
        staff_id: String::from("X"),
        succeeded: 1,
        failed: 0,
        full_success: true,
        message: String::from("Successfully processed 1 client(s)"),
        outcomes: Vec::new(),
    };
    let json: serde_json::Value = serde_json::to_value(&response).unwrap();
    assert_eq!(json["fullSuccess"], serde_json::Value::Bool(true));
    assert_eq!(json["staffId"], "X");
}
