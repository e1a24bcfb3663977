// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for the departure workflow and its read-only views.

use std::collections::BTreeMap;
use std::str::FromStr;

use lexdesk::{ReassignmentCoordinator, ReassignmentReport, ReassignmentStore, UnitOutcome};
use lexdesk_domain::{
    Case, CaseRef, ClientId, Decision, DecisionAction, DomainError, StaffCaseAssociation, StaffId,
    derive_client_roster, distinct_cases, validate_identifier,
};
use lexdesk_persistence::{PastClientData, Persistence};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    CaseInfo, ClientCaseMapResponse, ClientCasesInfo, ClientDecisionRequest, ClientInfo,
    ClientOutcomeInfo, ListPastClientsResponse, ListStaffCasesResponse, ListStaffClientsResponse,
    ListStaffResponse, OutcomeStatus, PastClientInfo, ReassignmentTargetsResponse, StaffInfo,
    SubmitDepartureRequest, SubmitDepartureResponse,
};

/// Parses and validates a staff identifier taken from a request path.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` if the identifier is blank or too long.
pub fn parse_staff_id(raw: &str) -> Result<StaffId, ApiError> {
    validate_identifier(StaffId::KIND, raw).map_err(translate_domain_error)?;
    Ok(StaffId::new(raw))
}

fn parse_decision(request: &ClientDecisionRequest) -> Result<(ClientId, Decision), DomainError> {
    validate_identifier(ClientId::KIND, &request.client_id)?;
    let client_id: ClientId = ClientId::new(&request.client_id);
    let action: DecisionAction = DecisionAction::from_str(&request.action)?;
    let target: Option<StaffId> = request
        .target_staff_id
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(StaffId::new);
    let decision: Decision = action.into_decision(&client_id, target)?;
    Ok((client_id, decision))
}

/// Converts the wire decision list into one decision per client.
///
/// # Errors
///
/// Returns an error if:
/// - A decision names an unknown action
/// - A `reassign` decision has no target
/// - The same client appears more than once
pub fn parse_decisions(
    request: &SubmitDepartureRequest,
) -> Result<BTreeMap<ClientId, Decision>, ApiError> {
    let mut decisions: BTreeMap<ClientId, Decision> = BTreeMap::new();
    for entry in &request.decisions {
        let (client_id, decision) = parse_decision(entry).map_err(translate_domain_error)?;
        if decisions.contains_key(&client_id) {
            return Err(translate_domain_error(
                DomainError::DuplicateClientDecision(client_id.value().to_string()),
            ));
        }
        decisions.insert(client_id, decision);
    }
    Ok(decisions)
}

/// Builds the wire response for a finished batch.
#[must_use]
pub fn build_departure_response(report: &ReassignmentReport) -> SubmitDepartureResponse {
    let outcomes: Vec<ClientOutcomeInfo> = report
        .outcomes
        .iter()
        .map(|outcome| match outcome {
            UnitOutcome::Success { client_id, message } => ClientOutcomeInfo {
                client_id: client_id.value().to_string(),
                status: OutcomeStatus::Success,
                message: message.clone(),
                error_kind: None,
            },
            UnitOutcome::Failure { client_id, reason } => ClientOutcomeInfo {
                client_id: client_id.value().to_string(),
                status: OutcomeStatus::Failure,
                message: reason.to_string(),
                error_kind: Some(reason.kind().to_string()),
            },
        })
        .collect();

    SubmitDepartureResponse {
        staff_id: report.staff_id.value().to_string(),
        succeeded: report.succeeded(),
        failed: report.failed(),
        full_success: report.is_full_success(),
        message: report.summary(),
        outcomes,
    }
}

/// Processes a staff member's departure.
///
/// Partial failure is not an error: the response carries one outcome per
/// submitted client.
///
/// # Arguments
///
/// * `coordinator` - The reassignment coordinator
/// * `staff_id` - The departing staff member
/// * `request` - The per-client decisions
/// * `cancel` - Cancels units that have not started yet
///
/// # Errors
///
/// Returns an error if the request is rejected before any client is
/// processed.
pub async fn submit_departure<S: ReassignmentStore>(
    coordinator: &ReassignmentCoordinator<S>,
    staff_id: &str,
    request: &SubmitDepartureRequest,
    cancel: &CancellationToken,
) -> Result<SubmitDepartureResponse, ApiError> {
    let departing: StaffId = parse_staff_id(staff_id)?;
    let decisions: BTreeMap<ClientId, Decision> = parse_decisions(request)?;

    let report: ReassignmentReport = coordinator
        .apply_reassignment(&departing, decisions, cancel)
        .await
        .map_err(translate_core_error)?;

    info!(
        staff_id = %departing,
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Departure processed"
    );

    Ok(build_departure_response(&report))
}

/// Returns every roster client with the cases they share with `staff_id`.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the staff member does not exist.
pub async fn get_client_case_map<S: ReassignmentStore>(
    coordinator: &ReassignmentCoordinator<S>,
    staff_id: &str,
) -> Result<ClientCaseMapResponse, ApiError> {
    let staff_id: StaffId = parse_staff_id(staff_id)?;
    let map: BTreeMap<ClientId, Vec<CaseRef>> = coordinator
        .client_case_map(&staff_id)
        .await
        .map_err(translate_core_error)?;

    let clients: Vec<ClientCasesInfo> = map
        .into_iter()
        .map(|(client_id, cases)| ClientCasesInfo {
            client_id: client_id.value().to_string(),
            cases: cases.into_iter().map(Into::into).collect(),
        })
        .collect();

    Ok(ClientCaseMapResponse {
        staff_id: staff_id.value().to_string(),
        clients,
    })
}

/// Lists the staff members that may take over from `staff_id`.
///
/// # Errors
///
/// Returns an error if the identifier is malformed or the store fails.
pub async fn list_reassignment_targets<S: ReassignmentStore>(
    coordinator: &ReassignmentCoordinator<S>,
    staff_id: &str,
) -> Result<ReassignmentTargetsResponse, ApiError> {
    let staff_id: StaffId = parse_staff_id(staff_id)?;
    let targets = coordinator
        .reassignment_targets(&staff_id)
        .await
        .map_err(translate_core_error)?;

    Ok(ReassignmentTargetsResponse {
        staff_id: staff_id.value().to_string(),
        targets: targets.into_iter().map(StaffInfo::from).collect(),
    })
}

/// Lists all staff members.
///
/// # Errors
///
/// Returns an error if the database cannot be read.
pub fn list_staff(persistence: &mut Persistence) -> Result<ListStaffResponse, ApiError> {
    let staff = persistence
        .list_staff()
        .map_err(translate_persistence_error)?;
    debug!(count = staff.len(), "Listed staff");
    Ok(ListStaffResponse {
        staff: staff.into_iter().map(StaffInfo::from).collect(),
    })
}

/// Lists the distinct cases a staff member handles.
///
/// `INACTIVE` cases are left out unless `include_inactive` is set.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the staff member does not exist.
pub fn list_staff_cases(
    persistence: &mut Persistence,
    staff_id: &str,
    include_inactive: bool,
) -> Result<ListStaffCasesResponse, ApiError> {
    let staff_id: StaffId = parse_staff_id(staff_id)?;
    let associations: Vec<StaffCaseAssociation> = persistence
        .load_staff_associations(&staff_id)
        .map_err(translate_persistence_error)?;

    let cases: Vec<CaseInfo> = distinct_cases(&associations)
        .into_iter()
        .filter(|case: &Case| include_inactive || case.status.is_listed())
        .map(CaseInfo::from)
        .collect();

    Ok(ListStaffCasesResponse {
        staff_id: staff_id.value().to_string(),
        cases,
    })
}

/// Lists the unique clients a staff member handles, in first-seen order.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the staff member does not exist.
pub fn list_staff_clients(
    persistence: &mut Persistence,
    staff_id: &str,
) -> Result<ListStaffClientsResponse, ApiError> {
    let staff_id: StaffId = parse_staff_id(staff_id)?;
    let associations: Vec<StaffCaseAssociation> = persistence
        .load_staff_associations(&staff_id)
        .map_err(translate_persistence_error)?;

    Ok(ListStaffClientsResponse {
        staff_id: staff_id.value().to_string(),
        clients: derive_client_roster(&associations)
            .into_iter()
            .map(ClientInfo::from)
            .collect(),
    })
}

/// Lists the relationships retired for a staff member.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` if the staff member does not exist.
pub fn list_past_clients(
    persistence: &mut Persistence,
    staff_id: &str,
) -> Result<ListPastClientsResponse, ApiError> {
    let staff_id: StaffId = parse_staff_id(staff_id)?;
    persistence
        .get_staff(&staff_id)
        .map_err(translate_persistence_error)?;
    let rows: Vec<PastClientData> = persistence
        .list_past_clients(&staff_id)
        .map_err(translate_persistence_error)?;

    Ok(ListPastClientsResponse {
        staff_id: staff_id.value().to_string(),
        past_clients: rows
            .into_iter()
            .map(|row| PastClientInfo {
                client_id: row.client_id,
                case_id: row.case_id,
                recorded_at: row.recorded_at,
            })
            .collect(),
    })
}
