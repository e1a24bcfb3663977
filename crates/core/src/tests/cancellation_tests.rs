// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use lexdesk_domain::{Decision, StaffId};
use tokio_util::sync::CancellationToken;

use crate::tests::helpers::{
    MemoryStore, create_coordinator, create_two_client_store, decisions, reassign_to,
};
use crate::{CoordinatorConfig, ReassignmentReport, UnitError};

#[tokio::test]
async fn test_cancelled_before_start_touches_nothing() {
    let coordinator = create_coordinator(create_two_client_store(), CoordinatorConfig::default());
    let cancel: CancellationToken = CancellationToken::new();
    cancel.cancel();

    let report: ReassignmentReport = coordinator
        .apply_reassignment(
            &StaffId::new("X"),
            decisions(&[("A", Decision::Retire), ("B", reassign_to("Y"))]),
            &cancel,
        )
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.failed(), 2);
    for (_, reason) in report.failures() {
        assert_eq!(reason, &UnitError::Cancelled);
    }

    let store = coordinator.store().lock().await;
    assert_eq!(store.transfer_calls, 0);
    assert_eq!(store.snapshot(), create_two_client_store().snapshot());
}

#[tokio::test]
async fn test_cancel_during_batch_lets_in_flight_unit_finish() {
    let cancel: CancellationToken = CancellationToken::new();
    let mut store: MemoryStore = create_two_client_store();
    store.cancel_on_apply = Some(cancel.clone());
    let config: CoordinatorConfig =
        CoordinatorConfig::new(CoordinatorConfig::DEFAULT_UNIT_TIMEOUT, 1);
    let coordinator = create_coordinator(store, config);

    let report: ReassignmentReport = coordinator
        .apply_reassignment(
            &StaffId::new("X"),
            decisions(&[("A", Decision::Retire), ("B", Decision::Retire)]),
            &cancel,
        )
        .await
        .unwrap();

    // With one worker, A runs first and fires the token mid-transfer.
    assert_eq!(report.outcomes.len(), 2);
    assert!(report.outcomes[0].is_success());
    assert_eq!(
        report.failures().map(|(_, r)| r.clone()).collect::<Vec<_>>(),
        vec![UnitError::Cancelled]
    );

    let store = coordinator.store().lock().await;
    assert_eq!(store.transfer_calls, 1);
    assert!(store.is_past_client("A", "X", "C1"));
    assert!(store.holds("X", "C2", "B"));
}
