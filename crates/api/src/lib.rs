// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the departure workflow.
//!
//! Translates wire requests into domain decisions, drives the
//! reassignment coordinator and the read-only persistence queries, and
//! maps every lower-layer error into an [`ApiError`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
    translate_store_error,
};
pub use handlers::{
    build_departure_response, get_client_case_map, list_past_clients, list_reassignment_targets,
    list_staff, list_staff_cases, list_staff_clients, parse_decisions, parse_staff_id,
    submit_departure,
};
pub use request_response::{
    CaseInfo, CaseRefInfo, ClientCaseMapResponse, ClientCasesInfo, ClientDecisionRequest,
    ClientInfo, ClientOutcomeInfo, ListPastClientsResponse, ListStaffCasesResponse,
    ListStaffClientsResponse, ListStaffResponse, OutcomeStatus, PastClientInfo,
    ReassignmentTargetsResponse, StaffInfo, SubmitDepartureRequest, SubmitDepartureResponse,
};
