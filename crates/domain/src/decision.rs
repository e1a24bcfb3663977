// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{ClientId, StaffId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What to do with one client when their staff member departs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// End the relationship and keep it as a past-client record.
    Retire,
    /// Hand the client's shared cases to another staff member.
    Reassign {
        /// The staff member taking over.
        target_staff_id: StaffId,
    },
}

impl Decision {
    /// Creates a `Reassign` decision.
    #[must_use]
    pub const fn reassign(target_staff_id: StaffId) -> Self {
        Self::Reassign { target_staff_id }
    }

    /// Returns the action kind of this decision.
    #[must_use]
    pub const fn action(&self) -> DecisionAction {
        match self {
            Self::Retire => DecisionAction::Retire,
            Self::Reassign { .. } => DecisionAction::Reassign,
        }
    }

    /// Returns the replacement staff member, if any.
    #[must_use]
    pub const fn target(&self) -> Option<&StaffId> {
        match self {
            Self::Retire => None,
            Self::Reassign { target_staff_id } => Some(target_staff_id),
        }
    }
}

/// The action named in a submitted decision record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionAction {
    /// Retire the client relationship.
    Retire,
    /// Reassign the client to another staff member.
    Reassign,
}

impl FromStr for DecisionAction {
    type Err = DomainError;

    /// Accepts `retire`, plus the `past client` and `delete` spellings
    /// emitted by older clients.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retire" | "past client" | "past_client" | "delete" => Ok(Self::Retire),
            "reassign" => Ok(Self::Reassign),
            _ => Err(DomainError::InvalidAction(s.to_string())),
        }
    }
}

impl std::fmt::Display for DecisionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl DecisionAction {
    /// Converts this action to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Retire => "retire",
            Self::Reassign => "reassign",
        }
    }

    /// Builds a `Decision` from this action and an optional target.
    ///
    /// A target supplied alongside `Retire` is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if `Reassign` is requested without a target.
    pub fn into_decision(
        self,
        client_id: &ClientId,
        target_staff_id: Option<StaffId>,
    ) -> Result<Decision, DomainError> {
        match (self, target_staff_id) {
            (Self::Retire, _) => Ok(Decision::Retire),
            (Self::Reassign, Some(target_staff_id)) => Ok(Decision::Reassign { target_staff_id }),
            (Self::Reassign, None) => Err(DomainError::MissingReassignmentTarget {
                client_id: client_id.value().to_string(),
            }),
        }
    }
}
