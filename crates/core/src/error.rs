// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use lexdesk_domain::DomainError;

use crate::store::StoreError;

/// Errors that abort a coordinator operation as a whole.
///
/// Per-client failures during a batch are never reported through this
/// type; they are collected as `UnitOutcome::Failure` instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The request was rejected before any work started.
    Validation(DomainError),
    /// A read against the store failed.
    Store(StoreError),
    /// A worker task ended without producing a result.
    Aborted(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "Validation failed: {err}"),
            Self::Store(err) => write!(f, "Store error: {err}"),
            Self::Aborted(msg) => write!(f, "Operation aborted: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err)
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}
