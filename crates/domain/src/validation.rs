// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::decision::Decision;
use crate::error::DomainError;
use crate::types::{ClientId, StaffId};
use std::collections::BTreeMap;

/// Maximum identifier length accepted by the store.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Validates an identifier value.
///
/// # Arguments
///
/// * `kind` - The identifier kind, for error reporting
/// * `value` - The identifier value
///
/// # Errors
///
/// Returns an error if the value is empty, longer than
/// `MAX_IDENTIFIER_LEN`, or contains whitespace or control characters.
pub fn validate_identifier(kind: &'static str, value: &str) -> Result<(), DomainError> {
    let invalid: bool = value.is_empty()
        || value.len() > MAX_IDENTIFIER_LEN
        || value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control());

    if invalid {
        return Err(DomainError::InvalidIdentifier {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Validates that a name field is present.
///
/// # Errors
///
/// Returns an error if the name is empty or only whitespace.
pub fn validate_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name cannot be empty",
        )));
    }
    Ok(())
}

/// Validates a departure decision set before any of it is applied.
///
/// # Arguments
///
/// * `departing` - The staff member who is leaving
/// * `decisions` - One decision per client
///
/// # Errors
///
/// Returns an error if:
/// - The decision set is empty
/// - Any staff or client identifier is malformed
/// - A reassignment targets the departing staff member
pub fn validate_decisions(
    departing: &StaffId,
    decisions: &BTreeMap<ClientId, Decision>,
) -> Result<(), DomainError> {
    validate_identifier(StaffId::KIND, departing.value())?;

    if decisions.is_empty() {
        return Err(DomainError::EmptyDecisionSet);
    }

    for (client_id, decision) in decisions {
        validate_identifier(ClientId::KIND, client_id.value())?;

        if let Decision::Reassign { target_staff_id } = decision {
            validate_identifier(StaffId::KIND, target_staff_id.value())?;
            if target_staff_id == departing {
                return Err(DomainError::SelfReassignment {
                    client_id: client_id.value().to_string(),
                    staff_id: departing.value().to_string(),
                });
            }
        }
    }

    Ok(())
}
