// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod association;
mod client_cases;
mod decision;
mod error;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use association::StaffCaseAssociation;
pub use client_cases::{
    compute_client_case_map, compute_staff_client_case_map, derive_client_roster, distinct_cases,
    reassignment_targets,
};
pub use decision::{Decision, DecisionAction};

// Re-export public types
pub use error::DomainError;
pub use types::{Case, CaseId, CaseRef, CaseStatus, Client, ClientId, Staff, StaffId};
pub use validation::{MAX_IDENTIFIER_LEN, validate_decisions, validate_identifier, validate_name};
