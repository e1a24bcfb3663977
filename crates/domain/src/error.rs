// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier is empty or otherwise malformed.
    InvalidIdentifier {
        /// The kind of identifier (e.g. "staff", "client").
        kind: &'static str,
        /// The offending value.
        value: String,
    },
    /// A batch of reassignment decisions was empty.
    EmptyDecisionSet,
    /// A reassignment targets the staff member who is departing.
    SelfReassignment {
        /// The client whose decision is invalid.
        client_id: String,
        /// The departing staff member.
        staff_id: String,
    },
    /// The same client appears more than once in a decision set.
    DuplicateClientDecision(String),
    /// A decision action string was not recognized.
    InvalidAction(String),
    /// A reassignment decision was submitted without a target staff member.
    MissingReassignmentTarget {
        /// The client whose decision is incomplete.
        client_id: String,
    },
    /// A case status string was not recognized.
    InvalidCaseStatus(String),
    /// A name field is empty.
    InvalidName(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidIdentifier { kind, value } => {
                write!(f, "Invalid {kind} identifier: '{value}'")
            }
            Self::EmptyDecisionSet => {
                write!(f, "At least one client decision is required")
            }
            Self::SelfReassignment {
                client_id,
                staff_id,
            } => {
                write!(
                    f,
                    "Client '{client_id}' cannot be reassigned to departing staff member '{staff_id}'"
                )
            }
            Self::DuplicateClientDecision(client_id) => {
                write!(f, "Client '{client_id}' has more than one decision")
            }
            Self::InvalidAction(action) => {
                write!(
                    f,
                    "Invalid action: '{action}'. Must be 'retire', 'past client' or 'reassign'"
                )
            }
            Self::MissingReassignmentTarget { client_id } => {
                write!(
                    f,
                    "Reassignment for client '{client_id}' requires a target staff member"
                )
            }
            Self::InvalidCaseStatus(status) => write!(f, "Invalid case status: '{status}'"),
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
        }
    }
}

impl std::error::Error for DomainError {}
