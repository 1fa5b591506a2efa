use crate::fixtures::{candidate, hardware_signed, Harness, MockPreparer, PrepareOutcome, TEST_DESTINATION_ADDRESS};
use std::sync::atomic::Ordering;
use sweep_core::domain::{SignatureRole, SweepMode, SweepStage, SweepState};
use sweep_core::foundation::{AccountId, SweepError};

fn account() -> AccountId {
    AccountId::new(crate::fixtures::TEST_ACCOUNT)
}

#[tokio::test]
async fn happy_path_single_app_and_server_candidate() {
    let harness = Harness::new(MockPreparer::candidates(vec![candidate(1, SignatureRole::AppAndServer)]));
    harness.mark_owed(&account());
    let mut orchestrator = harness.orchestrator(SweepMode::StandardRecovery, false);

    let state = orchestrator.prepare().await.expect("prepare");
    match state {
        SweepState::ReadyForReview { aggregate } => {
            assert_eq!(aggregate.total_fee_sats, 10);
            assert_eq!(aggregate.total_transferred_sats, 990);
            assert_eq!(aggregate.destination_address, TEST_DESTINATION_ADDRESS);
        }
        other => panic!("expected ReadyForReview, got {:?}", other),
    }

    let state = orchestrator.start_sweep().await.expect("start");
    match state {
        SweepState::Completed { aggregate } => {
            assert_eq!(aggregate.total_fee_sats, 10);
            assert_eq!(aggregate.total_transferred_sats, 990);
        }
        other => panic!("expected Completed, got {:?}", other),
    }

    assert!(!harness.is_owed(&account()), "owed flag must clear on full broadcast");
    assert_eq!(harness.observer.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(harness.co_signer.calls(), 1);

    // App signature lands before the server signature in the broadcast bytes.
    let sent = harness.broadcaster.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].ends_with(b"+app+server"));

    orchestrator.proceed().expect("proceed");
    orchestrator.proceed().expect("proceed is idempotent");
    assert_eq!(harness.observer.successes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_result_without_prior_attempt_is_informational() {
    let harness = Harness::new(MockPreparer::empty());
    harness.mark_owed(&account());
    let mut orchestrator = harness.orchestrator(SweepMode::StandardRecovery, false);

    let state = orchestrator.prepare().await.expect("prepare");
    assert!(matches!(state, SweepState::EmptyFound));
    assert_eq!(orchestrator.stage(), SweepStage::EmptyFound);
    assert!(harness.is_owed(&account()), "owed flag untouched on EmptyFound");
    assert_eq!(harness.observer.successes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_result_with_prior_attempt_completes_and_clears_flag() {
    let harness = Harness::new(MockPreparer::empty());
    harness.mark_owed(&account());
    let mut orchestrator = harness.orchestrator(SweepMode::StandardRecovery, true);

    let state = orchestrator.prepare().await.expect("prepare");
    assert!(matches!(state, SweepState::CompletedEmpty));
    assert!(!harness.is_owed(&account()));

    // Success is acknowledged explicitly.
    assert_eq!(harness.observer.successes.load(Ordering::SeqCst), 0);
    orchestrator.proceed().expect("proceed");
    assert_eq!(harness.observer.successes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_result_in_private_migration_succeeds_silently() {
    let harness = Harness::new(MockPreparer::empty());
    harness.mark_owed(&account());
    let mut orchestrator = harness.orchestrator(SweepMode::PrivateWalletMigration, false);

    let state = orchestrator.prepare().await.expect("prepare");
    assert!(matches!(state, SweepState::CompletedEmpty));
    assert!(!harness.is_owed(&account()), "flag cleared without user acknowledgement");
    assert_eq!(harness.observer.successes.load(Ordering::SeqCst), 1, "success fires immediately");

    // A later acknowledgement must not double-fire.
    orchestrator.proceed().expect("proceed");
    assert_eq!(harness.observer.successes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn hardware_candidates_pause_for_the_device_then_complete() {
    let hardware = candidate(1, SignatureRole::HardwareAndServer);
    let app = candidate(2, SignatureRole::AppAndServer);
    let harness = Harness::new(MockPreparer::candidates(vec![hardware.clone(), app]));
    harness.mark_owed(&account());
    let mut orchestrator = harness.orchestrator(SweepMode::StandardRecovery, false);

    let state = orchestrator.prepare().await.expect("prepare");
    match state {
        SweepState::ReadyForReview { aggregate } => {
            assert_eq!(aggregate.total_fee_sats, 20);
            assert_eq!(aggregate.total_transferred_sats, 1980);
        }
        other => panic!("expected ReadyForReview, got {:?}", other),
    }

    let state = orchestrator.start_sweep().await.expect("start");
    let needs_hardware = match state {
        SweepState::AwaitingHardwareSignatures { needs_hardware } => needs_hardware,
        other => panic!("expected AwaitingHardwareSignatures, got {:?}", other),
    };
    assert_eq!(needs_hardware.len(), 1);
    assert_eq!(needs_hardware[0].candidate_id, hardware.candidate_id);
    assert_eq!(harness.observer.attempts.load(Ordering::SeqCst), 1, "attempt recorded before the hardware phase");

    let state = orchestrator
        .supply_hardware_signatures(vec![hardware_signed(&needs_hardware[0])])
        .await
        .expect("supply");
    assert!(matches!(state, SweepState::Completed { .. }));

    // One co-sign per candidate, one app-signer lookup for the app candidate.
    assert_eq!(harness.co_signer.calls(), 2);
    assert_eq!(harness.signer_provider.lookups(), 1);

    let sent = harness.broadcaster.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].ends_with(b"+hw+server"), "hardware candidate carries device then server signatures");
    assert!(sent[1].ends_with(b"+app+server"));
    assert!(!harness.is_owed(&account()));
}

#[tokio::test]
async fn app_and_hardware_candidate_never_reaches_the_co_signer() {
    let private = candidate(1, SignatureRole::AppAndHardware);
    let shared = candidate(2, SignatureRole::AppAndServer);
    let harness = Harness::new(MockPreparer::candidates(vec![private.clone(), shared]));
    let mut orchestrator = harness.orchestrator(SweepMode::PrivateWalletMigration, false);

    orchestrator.prepare().await.expect("prepare");
    let state = orchestrator.start_sweep().await.expect("start");
    let needs_hardware = match state {
        SweepState::AwaitingHardwareSignatures { needs_hardware } => needs_hardware,
        other => panic!("expected AwaitingHardwareSignatures, got {:?}", other),
    };
    let state = orchestrator
        .supply_hardware_signatures(vec![hardware_signed(&needs_hardware[0])])
        .await
        .expect("supply");
    assert!(matches!(state, SweepState::Completed { .. }));

    assert_eq!(harness.co_signer.calls(), 1, "only the AppAndServer candidate is co-signed");
    let server_entries: Vec<_> = harness.log.entries().into_iter().filter(|e| e.starts_with("server:")).collect();
    assert_eq!(server_entries, vec!["server:keyset-2".to_string()]);

    let sent = harness.broadcaster.sent();
    assert!(sent[0].ends_with(b"+hw+app"), "private candidate carries device then app signatures only");
}

#[tokio::test]
async fn co_sign_failure_fails_the_sweep_and_retry_restarts_from_preparation() {
    let harness = Harness::new(MockPreparer::candidates(vec![candidate(1, SignatureRole::AppAndServer)]));
    harness.mark_owed(&account());
    harness.co_signer.fail_next(1);
    let mut orchestrator = harness.orchestrator(SweepMode::StandardRecovery, false);

    orchestrator.prepare().await.expect("prepare");
    let state = orchestrator.start_sweep().await.expect("start");
    match state {
        SweepState::Failed { cause } => assert!(matches!(cause, SweepError::RemoteConnectivity { .. })),
        other => panic!("expected Failed, got {:?}", other),
    }
    assert!(harness.is_owed(&account()), "owed flag untouched on failure");
    assert_eq!(harness.observer.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(harness.observer.failures.load(Ordering::SeqCst), 1);

    let state = orchestrator.retry().await.expect("retry");
    assert!(matches!(state, SweepState::ReadyForReview { .. }));
    assert_eq!(harness.preparer.calls(), 2, "retry requests a fresh candidate set");

    let state = orchestrator.start_sweep().await.expect("start again");
    assert!(matches!(state, SweepState::Completed { .. }));
    assert_eq!(harness.observer.attempts.load(Ordering::SeqCst), 2, "each confirmation records an attempt");
    assert!(!harness.is_owed(&account()));
}

#[tokio::test]
async fn attempt_is_recorded_even_when_broadcast_fails() {
    let harness = Harness::new(MockPreparer::candidates(vec![candidate(1, SignatureRole::AppAndServer)]));
    harness.mark_owed(&account());
    harness.broadcaster.accept_only(0);
    let mut orchestrator = harness.orchestrator(SweepMode::StandardRecovery, false);

    orchestrator.prepare().await.expect("prepare");
    let state = orchestrator.start_sweep().await.expect("start");
    match state {
        SweepState::Failed { cause } => assert!(matches!(cause, SweepError::BroadcastRejected { .. })),
        other => panic!("expected Failed, got {:?}", other),
    }
    assert_eq!(harness.observer.attempts.load(Ordering::SeqCst), 1);
    assert!(harness.is_owed(&account()));
}

#[tokio::test]
async fn preparer_failure_is_terminal_and_retryable() {
    let harness = Harness::new(MockPreparer::with_script(vec![
        PrepareOutcome::Fail(SweepError::preparation("backend unavailable")),
        PrepareOutcome::Empty,
    ]));
    let mut orchestrator = harness.orchestrator(SweepMode::StandardRecovery, false);

    let state = orchestrator.prepare().await.expect("prepare");
    match state {
        SweepState::PreparationFailed { cause } => assert!(matches!(cause, SweepError::PreparationFailed { .. })),
        other => panic!("expected PreparationFailed, got {:?}", other),
    }

    let state = orchestrator.retry().await.expect("retry");
    assert!(matches!(state, SweepState::EmptyFound));
}

#[tokio::test]
async fn mixed_destinations_fail_preparation() {
    let mut other = candidate(2, SignatureRole::AppAndServer);
    other.destination_address = "bc1qsomewhere-else".to_string();
    let harness = Harness::new(MockPreparer::candidates(vec![candidate(1, SignatureRole::AppAndServer), other]));
    let mut orchestrator = harness.orchestrator(SweepMode::StandardRecovery, false);

    let state = orchestrator.prepare().await.expect("prepare");
    match state {
        SweepState::PreparationFailed { cause } => assert!(matches!(cause, SweepError::MixedDestinations { .. })),
        other => panic!("expected PreparationFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn driver_methods_out_of_order_are_rejected() {
    let harness = Harness::new(MockPreparer::candidates(vec![candidate(1, SignatureRole::AppAndServer)]));
    let mut orchestrator = harness.orchestrator(SweepMode::StandardRecovery, false);

    let err = orchestrator.start_sweep().await.expect_err("start before prepare");
    assert!(matches!(err, SweepError::InvalidStateTransition { .. }));

    orchestrator.prepare().await.expect("prepare");
    let err = orchestrator.prepare().await.expect_err("prepare twice");
    assert!(matches!(err, SweepError::InvalidStateTransition { .. }));

    let err = orchestrator
        .supply_hardware_signatures(Vec::new())
        .await
        .expect_err("supply without hardware phase");
    assert!(matches!(err, SweepError::InvalidStateTransition { .. }));

    let err = orchestrator.proceed().expect_err("proceed before completion");
    assert!(matches!(err, SweepError::InvalidStateTransition { .. }));
}

#[tokio::test]
async fn incomplete_hardware_set_is_rejected_and_can_be_corrected() {
    let hardware = candidate(1, SignatureRole::HardwareAndServer);
    let harness = Harness::new(MockPreparer::candidates(vec![hardware.clone()]));
    let mut orchestrator = harness.orchestrator(SweepMode::StandardRecovery, false);

    orchestrator.prepare().await.expect("prepare");
    let state = orchestrator.start_sweep().await.expect("start");
    let needs_hardware = match state {
        SweepState::AwaitingHardwareSignatures { needs_hardware } => needs_hardware,
        other => panic!("expected AwaitingHardwareSignatures, got {:?}", other),
    };

    let err = orchestrator
        .supply_hardware_signatures(Vec::new())
        .await
        .expect_err("empty signed set");
    assert!(matches!(err, SweepError::HardwareSignatureMissing { .. }));
    assert_eq!(orchestrator.stage(), SweepStage::AwaitingHardwareSignatures, "still waiting after a bad set");

    let state = orchestrator
        .supply_hardware_signatures(vec![hardware_signed(&needs_hardware[0])])
        .await
        .expect("corrected set");
    assert!(matches!(state, SweepState::Completed { .. }));
}
