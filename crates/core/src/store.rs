// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The persistent store as seen by the reassignment coordinator.
//!
//! The coordinator reads a staff member's associations, lists staff, and
//! applies one transfer per client. Everything else about the store
//! (seeding, CRUD, backends) lives in the persistence crate.

use lexdesk_domain::{CaseId, ClientId, Staff, StaffCaseAssociation, StaffId};

/// Errors reported by a `ReassignmentStore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A referenced record does not exist.
    NotFound {
        /// The kind of record ("staff", "client", "case").
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },
    /// The backend failed (connection, constraint, commit).
    Backend(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} '{id}' not found"),
            Self::Backend(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Moves one client's shared cases away from a departing staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseTransfer {
    /// The client whose cases are affected.
    pub client_id: ClientId,
    /// The departing staff member.
    pub from_staff_id: StaffId,
    /// The replacement, or `None` to retire the client relationship.
    pub to_staff_id: Option<StaffId>,
    /// The shared cases, as read before the transfer.
    pub case_ids: Vec<CaseId>,
}

impl CaseTransfer {
    /// Returns whether this transfer retires the relationship.
    #[must_use]
    pub const fn is_retirement(&self) -> bool {
        self.to_staff_id.is_none()
    }
}

/// What a transfer did to one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssociationChange {
    /// The departing staff's association was removed and a past-client
    /// record kept.
    Retired(CaseId),
    /// The departing staff's association was replaced by the target's.
    Reassigned(CaseId),
    /// The departing staff no longer held the association; nothing changed.
    AlreadyApplied(CaseId),
}

impl AssociationChange {
    /// Returns the case this change applies to.
    #[must_use]
    pub const fn case_id(&self) -> &CaseId {
        match self {
            Self::Retired(case_id) | Self::Reassigned(case_id) | Self::AlreadyApplied(case_id) => {
                case_id
            }
        }
    }

    /// Returns whether the store was modified for this case.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::AlreadyApplied(_))
    }
}

/// Store operations consumed by the coordinator.
///
/// Implementations are synchronous; the coordinator drives them from
/// blocking worker threads while holding the store's lock.
pub trait ReassignmentStore: Send + 'static {
    /// Loads a staff member's case associations, each with the clients the
    /// staff member handles on that case.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the staff member does not exist.
    fn load_staff_associations(
        &mut self,
        staff_id: &StaffId,
    ) -> Result<Vec<StaffCaseAssociation>, StoreError>;

    /// Lists every staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list_staff(&mut self) -> Result<Vec<Staff>, StoreError>;

    /// Applies a transfer atomically.
    ///
    /// Either every listed case is processed or none is. A case the
    /// departing staff no longer holds for the client is reported as
    /// `AssociationChange::AlreadyApplied`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the client or the target staff
    /// member does not exist, or `StoreError::Backend` if the transaction
    /// fails.
    fn apply_transfer(
        &mut self,
        transfer: &CaseTransfer,
    ) -> Result<Vec<AssociationChange>, StoreError>;
}
