// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use lexdesk::{CoreError, StoreError};
use lexdesk_domain::DomainError;
use lexdesk_persistence::PersistenceError;
use tracing::error;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
#[allow(clippy::needless_pass_by_value)]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidIdentifier { kind, .. } => ApiError::InvalidInput {
            field: format!("{kind}Id"),
            message,
        },
        DomainError::EmptyDecisionSet => ApiError::InvalidInput {
            field: String::from("decisions"),
            message,
        },
        DomainError::SelfReassignment { .. } => ApiError::DomainRuleViolation {
            rule: String::from("no_self_reassignment"),
            message,
        },
        DomainError::DuplicateClientDecision(_) => ApiError::DomainRuleViolation {
            rule: String::from("one_decision_per_client"),
            message,
        },
        DomainError::InvalidAction(_) => ApiError::InvalidInput {
            field: String::from("action"),
            message,
        },
        DomainError::MissingReassignmentTarget { .. } => ApiError::InvalidInput {
            field: String::from("targetStaffId"),
            message,
        },
        DomainError::InvalidCaseStatus(_) => ApiError::InvalidInput {
            field: String::from("status"),
            message,
        },
        DomainError::InvalidName(_) => ApiError::InvalidInput {
            field: String::from("name"),
            message,
        },
    }
}

/// Translates a store error into an API error.
#[must_use]
pub fn translate_store_error(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound { entity, id } => ApiError::ResourceNotFound {
            resource_type: capitalize(entity),
            message: format!("{entity} '{id}' does not exist"),
        },
        StoreError::Backend(msg) => {
            error!(error = %msg, "Store backend failure");
            ApiError::Internal { message: msg }
        }
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::Validation(domain_err) => translate_domain_error(domain_err),
        CoreError::Store(store_err) => translate_store_error(store_err),
        CoreError::Aborted(msg) => ApiError::Internal {
            message: format!("Batch aborted: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Missing records become `ResourceNotFound`; everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::StaffNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Staff"),
            message: format!("staff '{id}' does not exist"),
        },
        PersistenceError::ClientNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Client"),
            message: format!("client '{id}' does not exist"),
        },
        PersistenceError::CaseNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Case"),
            message: format!("case '{id}' does not exist"),
        },
        PersistenceError::NotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: msg,
        },
        other => {
            error!(error = %other, "Persistence error");
            ApiError::Internal {
                message: format!("Persistence error: {other}"),
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
