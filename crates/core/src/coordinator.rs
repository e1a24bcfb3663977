// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Batch application of staff-departure decisions.
//!
//! Every `(client, decision)` pair is an independent unit. Units fan out
//! with bounded concurrency; each one takes the store lock once, reads the
//! departing staff member's associations, projects the client's shared
//! cases and applies a single transfer. A unit that fails, times out or is
//! cancelled produces a `Failure` outcome and never affects the others.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::StreamExt;
use lexdesk_domain::{
    CaseRef, ClientId, Decision, Staff, StaffCaseAssociation, StaffId,
    compute_client_case_map, compute_staff_client_case_map, reassignment_targets,
    validate_decisions, validate_identifier,
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::CoordinatorConfig;
use crate::error::CoreError;
use crate::outcome::{BatchProgress, ReassignmentReport, UnitError, UnitOutcome, UnitStage};
use crate::store::{AssociationChange, CaseTransfer, ReassignmentStore};

/// Applies departure decisions against a shared store.
#[derive(Debug)]
pub struct ReassignmentCoordinator<S> {
    store: Arc<Mutex<S>>,
    config: CoordinatorConfig,
}

impl<S> Clone for ReassignmentCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: self.config,
        }
    }
}

impl<S: ReassignmentStore> ReassignmentCoordinator<S> {
    /// Creates a coordinator over a shared store.
    #[must_use]
    pub const fn new(store: Arc<Mutex<S>>, config: CoordinatorConfig) -> Self {
        Self { store, config }
    }

    /// Returns the shared store handle.
    #[must_use]
    pub const fn store(&self) -> &Arc<Mutex<S>> {
        &self.store
    }

    /// Returns the configuration this coordinator was built with.
    #[must_use]
    pub const fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Loads a staff member's associations.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for a malformed id and
    /// `CoreError::Store` if the staff member does not exist.
    pub async fn load_associations(
        &self,
        staff_id: &StaffId,
    ) -> Result<Vec<StaffCaseAssociation>, CoreError> {
        validate_identifier(StaffId::KIND, staff_id.value())?;
        let staff_id: StaffId = staff_id.clone();
        let associations = self
            .with_store(move |store| store.load_staff_associations(&staff_id))
            .await??;
        debug!(count = associations.len(), "Loaded staff associations");
        Ok(associations)
    }

    /// Maps each client of a staff member to the cases they share.
    ///
    /// # Errors
    ///
    /// Returns an error if the associations cannot be loaded.
    pub async fn client_case_map(
        &self,
        staff_id: &StaffId,
    ) -> Result<BTreeMap<ClientId, Vec<CaseRef>>, CoreError> {
        let associations: Vec<StaffCaseAssociation> = self.load_associations(staff_id).await?;
        Ok(compute_staff_client_case_map(&associations))
    }

    /// Lists the staff members who can take over from `staff_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the staff list cannot be read.
    pub async fn reassignment_targets(&self, staff_id: &StaffId) -> Result<Vec<Staff>, CoreError> {
        validate_identifier(StaffId::KIND, staff_id.value())?;
        let all_staff: Vec<Staff> = self.with_store(|store: &mut S| store.list_staff()).await??;
        Ok(reassignment_targets(&all_staff, staff_id))
    }

    /// Applies one decision per client for a departing staff member.
    ///
    /// Returns one outcome per decision, ordered by client id. Once `cancel`
    /// fires, units that have not started are reported as cancelled;
    /// units already holding the store run to completion.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if the decision set is rejected. No
    /// unit runs in that case.
    pub async fn apply_reassignment(
        &self,
        departing: &StaffId,
        decisions: BTreeMap<ClientId, Decision>,
        cancel: &CancellationToken,
    ) -> Result<ReassignmentReport, CoreError> {
        validate_decisions(departing, &decisions)?;

        info!(
            staff_id = %departing,
            clients = decisions.len(),
            max_concurrency = self.config.effective_concurrency(),
            "Starting departure batch"
        );

        let mut progress: BatchProgress = BatchProgress::new(decisions.keys());

        let mut outcomes_stream = futures::stream::iter(decisions.into_iter().map(
            |(client_id, decision)| {
                let unit: ReassignmentUnit = ReassignmentUnit {
                    departing: departing.clone(),
                    client_id,
                    decision,
                };
                self.run_unit(unit, cancel.clone())
            },
        ))
        .buffer_unordered(self.config.effective_concurrency());

        let mut outcomes: Vec<UnitOutcome> = Vec::new();
        while let Some(outcome) = outcomes_stream.next().await {
            match &outcome {
                UnitOutcome::Success { client_id, message } => {
                    debug!(client_id = %client_id, message = %message, "Unit succeeded");
                }
                UnitOutcome::Failure { client_id, reason } => {
                    warn!(
                        client_id = %client_id,
                        kind = reason.kind(),
                        error = %reason,
                        "Unit failed"
                    );
                }
            }
            if !progress.record(&outcome) {
                return Err(CoreError::Aborted(format!(
                    "duplicate outcome for client '{}'",
                    outcome.client_id()
                )));
            }
            outcomes.push(outcome);
        }

        if progress.pending() > 0 {
            return Err(CoreError::Aborted(format!(
                "{} unit(s) finished without an outcome",
                progress.pending()
            )));
        }

        let report: ReassignmentReport = ReassignmentReport::new(departing.clone(), outcomes);
        info!(
            staff_id = %departing,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Departure batch complete"
        );
        Ok(report)
    }

    async fn run_unit(&self, unit: ReassignmentUnit, cancel: CancellationToken) -> UnitOutcome {
        let client_id: ClientId = unit.client_id.clone();
        let timeout = self.config.unit_timeout;
        let acquired: AtomicBool = AtomicBool::new(false);

        match tokio::time::timeout(timeout, self.execute_unit(unit, cancel, &acquired)).await {
            Ok(Ok(message)) => UnitOutcome::success(client_id, message),
            Ok(Err(reason)) => UnitOutcome::failure(client_id, reason),
            Err(_) => {
                let stage: UnitStage = if acquired.load(Ordering::Acquire) {
                    UnitStage::Running
                } else {
                    UnitStage::Queued
                };
                UnitOutcome::failure(
                    client_id,
                    UnitError::Timeout {
                        after: timeout,
                        stage,
                    },
                )
            }
        }
    }

    async fn execute_unit(
        &self,
        unit: ReassignmentUnit,
        cancel: CancellationToken,
        acquired: &AtomicBool,
    ) -> Result<String, UnitError> {
        if cancel.is_cancelled() {
            return Err(UnitError::Cancelled);
        }

        let mut guard = Arc::clone(&self.store).lock_owned().await;

        // The lock wait may have outlived the batch.
        if cancel.is_cancelled() {
            return Err(UnitError::Cancelled);
        }
        acquired.store(true, Ordering::Release);

        tokio::task::spawn_blocking(move || unit.execute(&mut *guard))
            .await
            .map_err(|e| UnitError::Aborted(e.to_string()))?
    }

    async fn with_store<T, F>(&self, f: F) -> Result<T, CoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut S) -> T + Send + 'static,
    {
        let mut guard = Arc::clone(&self.store).lock_owned().await;
        tokio::task::spawn_blocking(move || f(&mut *guard))
            .await
            .map_err(|e| CoreError::Aborted(e.to_string()))
    }
}

/// One client's share of a departure batch.
#[derive(Debug, Clone)]
struct ReassignmentUnit {
    departing: StaffId,
    client_id: ClientId,
    decision: Decision,
}

impl ReassignmentUnit {
    /// Reads the shared cases and applies the transfer under one store
    /// acquisition.
    fn execute<S: ReassignmentStore>(self, store: &mut S) -> Result<String, UnitError> {
        let associations: Vec<StaffCaseAssociation> =
            store.load_staff_associations(&self.departing)?;
        let shared: Vec<CaseRef> =
            compute_client_case_map(&associations, std::slice::from_ref(&self.client_id))
                .remove(&self.client_id)
                .unwrap_or_default();

        let no_shared_cases: bool = shared.is_empty();

        // An empty transfer still checks that the client and target exist.
        let transfer: CaseTransfer = CaseTransfer {
            client_id: self.client_id.clone(),
            from_staff_id: self.departing.clone(),
            to_staff_id: self.decision.target().cloned(),
            case_ids: shared.into_iter().map(|c| c.case_id).collect(),
        };

        let changes: Vec<AssociationChange> = store.apply_transfer(&transfer)?;
        let changed: usize = changes.iter().filter(|c| c.is_change()).count();

        if no_shared_cases {
            return Ok(format!(
                "Client {} shares no cases with {}; nothing to do",
                self.client_id, self.departing
            ));
        }

        Ok(match (&self.decision, changed) {
            (_, 0) => format!(
                "Client {} already processed; no changes needed",
                self.client_id
            ),
            (Decision::Retire, n) => format!(
                "Client {} moved to past clients ({n} case(s))",
                self.client_id
            ),
            (Decision::Reassign { target_staff_id }, n) => format!(
                "Client {} reassigned to {target_staff_id} ({n} case(s))",
                self.client_id
            ),
        })
    }
}
