// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Field names are camelCase on the wire.

use lexdesk_domain::{Case, CaseRef, Client, Staff};

/// One client decision in a departure submission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDecisionRequest {
    /// The client the decision applies to.
    pub client_id: String,
    /// `retire` (or `past client`) or `reassign`.
    pub action: String,
    /// The replacement staff member; required for `reassign`.
    #[serde(default)]
    pub target_staff_id: Option<String>,
}

/// API request to process a staff member's departure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDepartureRequest {
    /// One decision per client.
    pub decisions: Vec<ClientDecisionRequest>,
}

/// Status of one client in a departure response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// The client's decision was applied (or had already been applied).
    Success,
    /// The client's decision could not be applied.
    Failure,
}

/// The outcome for one client.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOutcomeInfo {
    /// The client identifier.
    pub client_id: String,
    /// Success or failure.
    pub status: OutcomeStatus,
    /// The success message, or the failure reason.
    pub message: String,
    /// The failure kind (e.g. `NotFoundError`), absent on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

/// API response for a processed departure.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitDepartureResponse {
    /// The departing staff member.
    pub staff_id: String,
    /// Number of clients processed successfully.
    pub succeeded: usize,
    /// Number of clients that failed.
    pub failed: usize,
    /// Whether every client succeeded.
    pub full_success: bool,
    /// Aggregate status line.
    pub message: String,
    /// Per-client outcomes, ordered by client id.
    pub outcomes: Vec<ClientOutcomeInfo>,
}

/// Staff member information.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffInfo {
    pub staff_id: String,
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

impl From<Staff> for StaffInfo {
    fn from(staff: Staff) -> Self {
        Self {
            staff_id: staff.staff_id.value().to_string(),
            name: staff.name,
            role: staff.role,
            designation: staff.designation,
        }
    }
}

/// API response listing staff members.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStaffResponse {
    pub staff: Vec<StaffInfo>,
}

/// Case information.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseInfo {
    pub case_id: String,
    pub title: String,
    pub case_type: String,
    /// Stored status string (`Active`, `Pending`, `Closed`, `INACTIVE`).
    pub status: String,
}

impl From<Case> for CaseInfo {
    fn from(case: Case) -> Self {
        Self {
            case_id: case.case_id.value().to_string(),
            title: case.title,
            case_type: case.case_type,
            status: case.status.as_str().to_string(),
        }
    }
}

/// API response listing the distinct cases a staff member handles.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStaffCasesResponse {
    pub staff_id: String,
    pub cases: Vec<CaseInfo>,
}

/// Client information.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    pub client_id: String,
    pub name: String,
    pub phone_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl From<Client> for ClientInfo {
    fn from(client: Client) -> Self {
        Self {
            client_id: client.client_id.value().to_string(),
            name: client.name,
            phone_no: client.phone_no,
            address: client.address,
            email: client.email,
        }
    }
}

/// API response with a staff member's client roster.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStaffClientsResponse {
    pub staff_id: String,
    pub clients: Vec<ClientInfo>,
}

/// A `{caseId, title}` reference.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRefInfo {
    pub case_id: String,
    pub title: String,
}

impl From<CaseRef> for CaseRefInfo {
    fn from(case_ref: CaseRef) -> Self {
        Self {
            case_id: case_ref.case_id.value().to_string(),
            title: case_ref.title,
        }
    }
}

/// The cases one client shares with a staff member.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCasesInfo {
    pub client_id: String,
    pub cases: Vec<CaseRefInfo>,
}

/// API response with the client-to-shared-cases map for a staff member.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCaseMapResponse {
    pub staff_id: String,
    /// One entry per roster client, ordered by client id.
    pub clients: Vec<ClientCasesInfo>,
}

/// API response listing the staff members a departing staff member's
/// clients may be handed to.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReassignmentTargetsResponse {
    pub staff_id: String,
    pub targets: Vec<StaffInfo>,
}

/// One historical staff/client/case relationship.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PastClientInfo {
    pub client_id: String,
    pub case_id: String,
    /// RFC 3339 timestamp of the retirement.
    pub recorded_at: String,
}

/// API response listing a staff member's past clients.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPastClientsResponse {
    pub staff_id: String,
    pub past_clients: Vec<PastClientInfo>,
}
