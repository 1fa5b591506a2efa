//! Full sweep flows against the file-backed status store: the closest this
//! core gets to the real recovery experience without the external services.

use crate::fixtures::{candidate, hardware_signed, MockAppSignerProvider, MockBroadcaster, MockCoSigner, MockPreparer, RecordingObserver, SigningLog, TEST_ACCOUNT};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use sweep_core::application::{SweepCollaborators, SweepOrchestrator};
use sweep_core::domain::{SignatureRole, SweepMode, SweepSession, SweepStage, SweepState};
use sweep_core::foundation::AccountId;
use sweep_core::infrastructure::broadcast::BroadcastPriority;
use sweep_core::infrastructure::status::{FileStatusStore, SweepStatusStore};

#[tokio::test]
async fn recovery_sweep_across_three_keysets_with_hardware_phase() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status_path = dir.path().join("sweep-status.json");
    let account = AccountId::new(TEST_ACCOUNT);

    let status = Arc::new(FileStatusStore::open(&status_path).expect("open status"));
    status.mark_sweep_owed(&account).expect("mark owed");

    let log = Arc::new(SigningLog::default());
    let preparer = Arc::new(MockPreparer::candidates(vec![
        candidate(1, SignatureRole::AppAndServer),
        candidate(2, SignatureRole::HardwareAndServer),
        candidate(3, SignatureRole::AppAndHardware),
    ]));
    let signer_provider = Arc::new(MockAppSignerProvider::new(log.clone()));
    let co_signer = Arc::new(MockCoSigner::new(log.clone()));
    let broadcaster = Arc::new(MockBroadcaster::new(log.clone()));
    let observer = Arc::new(RecordingObserver::default());

    let mut orchestrator = SweepOrchestrator::with_observer(
        SweepSession { account: account.clone(), mode: SweepMode::StandardRecovery, has_prior_attempt: false },
        SweepCollaborators {
            preparer: preparer.clone(),
            signer_provider: signer_provider.clone(),
            co_signer: co_signer.clone(),
            broadcaster: broadcaster.clone(),
            status_store: status.clone(),
        },
        observer.clone(),
    );
    orchestrator.set_broadcast_priority(BroadcastPriority::Elevated);

    let state = orchestrator.prepare().await.expect("prepare");
    let aggregate = match state {
        SweepState::ReadyForReview { aggregate } => aggregate,
        other => panic!("expected ReadyForReview, got {:?}", other),
    };
    assert_eq!(aggregate.total_fee_sats, 30);
    assert_eq!(aggregate.total_transferred_sats, 2970);

    let state = orchestrator.start_sweep().await.expect("start");
    let needs_hardware = match state {
        SweepState::AwaitingHardwareSignatures { needs_hardware } => needs_hardware,
        other => panic!("expected AwaitingHardwareSignatures, got {:?}", other),
    };
    assert_eq!(needs_hardware.len(), 2, "both hardware-role candidates wait for the device");

    let signed_set: Vec<_> = needs_hardware.iter().map(hardware_signed).collect();
    let state = orchestrator.supply_hardware_signatures(signed_set).await.expect("supply");
    let completed = match state {
        SweepState::Completed { aggregate } => aggregate,
        other => panic!("expected Completed, got {:?}", other),
    };
    assert_eq!(completed, aggregate);

    // All three consolidations broadcast, in prepared order, with the right
    // signature sets.
    let sent = broadcaster.sent();
    assert_eq!(sent.len(), 3);
    assert!(sent[0].ends_with(b"+app+server"));
    assert!(sent[1].ends_with(b"+hw+server"));
    assert!(sent[2].ends_with(b"+hw+app"), "private-migration-role candidate never touches the server");
    assert_eq!(co_signer.calls(), 2);

    assert_eq!(observer.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(observer.broadcasts.load(Ordering::SeqCst), 3);

    orchestrator.proceed().expect("proceed");
    assert_eq!(observer.successes.load(Ordering::SeqCst), 1);

    // The cleared flag survives a restart.
    drop(orchestrator);
    let reopened = FileStatusStore::open(&status_path).expect("reopen status");
    assert!(!reopened.is_sweep_owed(&account).expect("read"));
}

#[tokio::test]
async fn failed_sweep_leaves_the_owed_flag_for_the_next_launch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status_path = dir.path().join("sweep-status.json");
    let account = AccountId::new(TEST_ACCOUNT);

    let status = Arc::new(FileStatusStore::open(&status_path).expect("open status"));
    status.mark_sweep_owed(&account).expect("mark owed");

    let log = Arc::new(SigningLog::default());
    let co_signer = Arc::new(MockCoSigner::new(log.clone()));
    co_signer.fail_next(1);

    let mut orchestrator = SweepOrchestrator::new(
        SweepSession { account: account.clone(), mode: SweepMode::StandardRecovery, has_prior_attempt: false },
        SweepCollaborators {
            preparer: Arc::new(MockPreparer::candidates(vec![candidate(1, SignatureRole::AppAndServer)])),
            signer_provider: Arc::new(MockAppSignerProvider::new(log.clone())),
            co_signer,
            broadcaster: Arc::new(MockBroadcaster::new(log.clone())),
            status_store: status.clone(),
        },
    );

    orchestrator.prepare().await.expect("prepare");
    let state = orchestrator.start_sweep().await.expect("start");
    assert!(matches!(state, SweepState::Failed { .. }));
    assert_eq!(orchestrator.stage(), SweepStage::Failed);

    let reopened = FileStatusStore::open(&status_path).expect("reopen status");
    assert!(reopened.is_sweep_owed(&account).expect("read"), "crash or error never drops an owed sweep");
}
