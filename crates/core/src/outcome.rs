// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;
use std::time::Duration;

use lexdesk_domain::{ClientId, StaffId};
use thiserror::Error;

use crate::store::StoreError;

/// Why a single client unit failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// A staff member, client or case no longer exists.
    #[error("{entity} '{id}' not found")]
    NotFound {
        /// The kind of record.
        entity: &'static str,
        /// The missing identifier.
        id: String,
    },
    /// The store rejected or failed the operation.
    #[error("store error: {0}")]
    Store(String),
    /// The unit did not finish within the configured timeout.
    #[error("timed out after {after:?} while {stage}")]
    Timeout {
        /// The timeout that elapsed.
        after: Duration,
        /// How far the unit got before the timeout.
        stage: UnitStage,
    },
    /// The batch was cancelled before this unit started.
    #[error("batch cancelled before this client was processed")]
    Cancelled,
    /// The worker running the unit ended abnormally.
    #[error("unit aborted: {0}")]
    Aborted(String),
}

impl UnitError {
    /// Returns a stable name for the error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NotFoundError",
            Self::Store(_) => "StoreError",
            Self::Timeout { .. } => "TimeoutError",
            Self::Cancelled => "CancelledError",
            Self::Aborted(_) => "AbortedError",
        }
    }
}

impl From<StoreError> for UnitError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::Backend(msg) => Self::Store(msg),
        }
    }
}

/// Where a unit was when its timeout elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitStage {
    /// Still waiting for the store; nothing was read or written.
    Queued,
    /// Holding the store; the transfer may still commit.
    Running,
}

impl UnitStage {
    /// Returns a short description of the stage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "waiting for the store",
            Self::Running => "applying the transfer",
        }
    }
}

impl std::fmt::Display for UnitStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of one client unit within a batch.
///
/// Valid transitions are `Pending → Succeeded` and `Pending → Failed`.
/// Both end states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnitStatus {
    /// Not yet finished.
    #[default]
    Pending,
    /// Finished and applied (or already applied).
    Succeeded,
    /// Finished without applying.
    Failed,
}

impl UnitStatus {
    /// Checks if a transition from this state to another is valid.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Succeeded) | (Self::Pending, Self::Failed)
        )
    }

    /// Returns whether this is an end state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// The result of processing one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// The decision was applied, or was already in effect.
    Success {
        /// The client.
        client_id: ClientId,
        /// A human-readable description of what happened.
        message: String,
    },
    /// The decision could not be applied.
    Failure {
        /// The client.
        client_id: ClientId,
        /// Why it failed.
        reason: UnitError,
    },
}

impl UnitOutcome {
    /// Creates a success outcome.
    #[must_use]
    pub const fn success(client_id: ClientId, message: String) -> Self {
        Self::Success { client_id, message }
    }

    /// Creates a failure outcome.
    #[must_use]
    pub const fn failure(client_id: ClientId, reason: UnitError) -> Self {
        Self::Failure { client_id, reason }
    }

    /// Returns the client this outcome belongs to.
    #[must_use]
    pub const fn client_id(&self) -> &ClientId {
        match self {
            Self::Success { client_id, .. } | Self::Failure { client_id, .. } => client_id,
        }
    }

    /// Returns whether the unit succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the terminal status this outcome represents.
    #[must_use]
    pub const fn status(&self) -> UnitStatus {
        if self.is_success() {
            UnitStatus::Succeeded
        } else {
            UnitStatus::Failed
        }
    }
}

/// Tracks unit status across a running batch.
#[derive(Debug, Clone, Default)]
pub struct BatchProgress {
    statuses: BTreeMap<ClientId, UnitStatus>,
}

impl BatchProgress {
    /// Starts tracking every client as pending.
    #[must_use]
    pub fn new<'a>(clients: impl Iterator<Item = &'a ClientId>) -> Self {
        Self {
            statuses: clients.map(|c| (c.clone(), UnitStatus::Pending)).collect(),
        }
    }

    /// Records a finished unit.
    ///
    /// Returns `false` if the client is unknown or already finished.
    pub fn record(&mut self, outcome: &UnitOutcome) -> bool {
        let Some(status) = self.statuses.get_mut(outcome.client_id()) else {
            return false;
        };
        let target: UnitStatus = outcome.status();
        if !status.can_transition_to(target) {
            return false;
        }
        *status = target;
        true
    }

    /// Returns how many units are still pending.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.statuses.values().filter(|s| !s.is_terminal()).count()
    }
}

/// Combined result of a departure batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignmentReport {
    /// The departing staff member.
    pub staff_id: StaffId,
    /// One outcome per decision, ordered by client id.
    pub outcomes: Vec<UnitOutcome>,
}

impl ReassignmentReport {
    /// Creates a report, ordering outcomes by client id.
    #[must_use]
    pub fn new(staff_id: StaffId, mut outcomes: Vec<UnitOutcome>) -> Self {
        outcomes.sort_by(|a, b| a.client_id().cmp(b.client_id()));
        Self { staff_id, outcomes }
    }

    /// Number of clients processed successfully.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of clients that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Returns whether every client succeeded.
    #[must_use]
    pub fn is_full_success(&self) -> bool {
        self.failed() == 0
    }

    /// Iterates over the failed clients and their reasons.
    pub fn failures(&self) -> impl Iterator<Item = (&ClientId, &UnitError)> {
        self.outcomes.iter().filter_map(|o| match o {
            UnitOutcome::Failure { client_id, reason } => Some((client_id, reason)),
            UnitOutcome::Success { .. } => None,
        })
    }

    /// One-line status suitable for showing to an operator.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_full_success() {
            format!("Successfully processed {} client(s)", self.succeeded())
        } else {
            format!(
                "Completed: {} success, {} failed",
                self.succeeded(),
                self.failed()
            )
        }
    }
}
