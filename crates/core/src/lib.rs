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

mod config;
mod coordinator;
mod error;
mod outcome;
mod store;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use config::CoordinatorConfig;
pub use coordinator::ReassignmentCoordinator;
pub use error::CoreError;
pub use outcome::{ReassignmentReport, UnitError, UnitOutcome, UnitStage, UnitStatus};
pub use store::{AssociationChange, CaseTransfer, ReassignmentStore, StoreError};
