use crate::application::completion::CompletionTracker;
use crate::application::lifecycle::{NoopObserver, SweepLifecycleObserver};
use crate::application::signing_pipeline::SigningPipeline;
use crate::domain::state::ensure_transition;
use crate::domain::{
    compute_aggregate, hardware_subset, merge_hardware_signatures, HardwareSignedTransaction, PreparedSweep,
    SweepAggregate, SweepCandidate, SweepMode, SweepSession, SweepStage, SweepState,
};
use crate::foundation::util::time::now_nanos;
use crate::foundation::{Result, SweepError};
use crate::infrastructure::audit::{audit, AuditEvent};
use crate::infrastructure::broadcast::{BroadcastPriority, TransactionBroadcaster};
use crate::infrastructure::preparer::SweepPreparer;
use crate::infrastructure::signer::{AppSignerProvider, RemoteCoSigner};
use crate::infrastructure::status::SweepStatusStore;
use log::{info, warn};
use std::sync::Arc;

/// External collaborators the orchestrator drives. All fallible, all owned by
/// other components; the orchestrator holds no ambient state.
pub struct SweepCollaborators {
    pub preparer: Arc<dyn SweepPreparer>,
    pub signer_provider: Arc<dyn AppSignerProvider>,
    pub co_signer: Arc<dyn RemoteCoSigner>,
    pub broadcaster: Arc<dyn TransactionBroadcaster>,
    pub status_store: Arc<dyn SweepStatusStore>,
}

/// Drives one sweep session end to end: preparation, user confirmation, the
/// optional hardware phase, signing, broadcast, and the durable owed flag.
///
/// One logical flow per session; each driver method suspends at its external
/// calls and returns the next [`SweepState`]. Driver methods called out of
/// order fail with `InvalidStateTransition` and leave the sweep untouched.
pub struct SweepOrchestrator {
    session: SweepSession,
    preparer: Arc<dyn SweepPreparer>,
    pipeline: SigningPipeline,
    completion: CompletionTracker,
    observer: Arc<dyn SweepLifecycleObserver>,
    stage: SweepStage,
    candidates: Vec<SweepCandidate>,
    aggregate: Option<SweepAggregate>,
    success_notified: bool,
}

impl SweepOrchestrator {
    pub fn new(session: SweepSession, collaborators: SweepCollaborators) -> Self {
        Self::with_observer(session, collaborators, Arc::new(NoopObserver))
    }

    pub fn with_observer(
        session: SweepSession,
        collaborators: SweepCollaborators,
        observer: Arc<dyn SweepLifecycleObserver>,
    ) -> Self {
        let pipeline = SigningPipeline::with_observer(
            collaborators.signer_provider,
            collaborators.co_signer,
            collaborators.broadcaster,
            observer.clone(),
        );
        let completion = CompletionTracker::new(session.account.clone(), collaborators.status_store, observer.clone());
        Self {
            session,
            preparer: collaborators.preparer,
            pipeline,
            completion,
            observer,
            stage: SweepStage::default(),
            candidates: Vec::new(),
            aggregate: None,
            success_notified: false,
        }
    }

    pub fn set_broadcast_priority(&mut self, priority: BroadcastPriority) {
        self.pipeline.set_broadcast_priority(priority);
    }

    pub fn stage(&self) -> SweepStage {
        self.stage
    }

    pub fn session(&self) -> &SweepSession {
        &self.session
    }

    pub fn aggregate(&self) -> Option<&SweepAggregate> {
        self.aggregate.as_ref()
    }

    /// Ask the preparer for candidates and settle into review, an empty
    /// outcome, or a preparation failure.
    pub async fn prepare(&mut self) -> Result<SweepState> {
        self.transition_to(SweepStage::Preparing)?;
        let preparer = self.preparer.clone();
        let outcome = preparer.prepare_sweep(&self.session.account).await;
        match outcome {
            Err(cause) => self.preparation_failed(cause),
            Ok(None) => self.handle_empty(),
            Ok(Some(prepared)) => self.handle_prepared(prepared),
        }
    }

    /// Confirm the sweep. Records the attempt synchronously before any
    /// signing or network I/O, then either pauses for hardware signatures or
    /// runs the signing pipeline to a terminal state.
    pub async fn start_sweep(&mut self) -> Result<SweepState> {
        if self.stage != SweepStage::ReadyForReview {
            return Err(SweepError::InvalidStateTransition {
                from: format!("{:?}", self.stage),
                to: format!("{:?}", SweepStage::SigningAndBroadcasting),
            });
        }
        self.completion.record_attempt();

        let needs_hardware = hardware_subset(&self.candidates);
        if !needs_hardware.is_empty() {
            self.transition_to(SweepStage::AwaitingHardwareSignatures)?;
            return Ok(SweepState::AwaitingHardwareSignatures { needs_hardware });
        }
        self.transition_to(SweepStage::SigningAndBroadcasting)?;
        self.sign_and_broadcast().await
    }

    /// Hand back the hardware-signed transactions from the caller-owned
    /// device interaction. The set must cover exactly the candidates listed
    /// in `AwaitingHardwareSignatures`; a mismatch is an error and leaves the
    /// orchestrator waiting so a corrected set can be supplied.
    pub async fn supply_hardware_signatures(&mut self, signed: Vec<HardwareSignedTransaction>) -> Result<SweepState> {
        if self.stage != SweepStage::AwaitingHardwareSignatures {
            return Err(SweepError::InvalidStateTransition {
                from: format!("{:?}", self.stage),
                to: format!("{:?}", SweepStage::SigningAndBroadcasting),
            });
        }
        self.candidates = merge_hardware_signatures(&self.candidates, signed)?;
        self.transition_to(SweepStage::SigningAndBroadcasting)?;
        self.sign_and_broadcast().await
    }

    /// Discard this attempt and restart from preparation. Nothing from the
    /// failed batch is reused: the preparer is asked for a fresh candidate
    /// set, which it must build idempotently against the same funds.
    pub async fn retry(&mut self) -> Result<SweepState> {
        ensure_transition(self.stage, SweepStage::Preparing)?;
        self.candidates.clear();
        self.aggregate = None;
        self.completion.reset_attempt();
        self.prepare().await
    }

    /// Acknowledge a successful outcome from `Completed` or `CompletedEmpty`.
    pub fn proceed(&mut self) -> Result<()> {
        if !matches!(self.stage, SweepStage::Completed | SweepStage::CompletedEmpty) {
            return Err(SweepError::InvalidStateTransition {
                from: format!("{:?}", self.stage),
                to: "acknowledged".to_string(),
            });
        }
        self.notify_success();
        Ok(())
    }

    fn handle_prepared(&mut self, prepared: PreparedSweep) -> Result<SweepState> {
        let candidates = prepared.into_candidates();
        let aggregate = match compute_aggregate(&candidates) {
            Ok(aggregate) => aggregate,
            Err(cause) => return self.preparation_failed(cause),
        };
        info!(
            "sweep prepared account={} candidates={} fee_sats={} transferred_sats={}",
            self.session.account,
            candidates.len(),
            aggregate.total_fee_sats,
            aggregate.total_transferred_sats
        );
        audit(AuditEvent::SweepPrepared {
            account: self.session.account.to_string(),
            candidate_count: candidates.len(),
            total_fee_sats: aggregate.total_fee_sats,
            total_transferred_sats: aggregate.total_transferred_sats,
            destination: aggregate.destination_address.clone(),
            timestamp_ns: now_nanos(),
        });
        self.candidates = candidates;
        self.aggregate = Some(aggregate.clone());
        self.transition_to(SweepStage::ReadyForReview)?;
        Ok(SweepState::ReadyForReview { aggregate })
    }

    fn handle_empty(&mut self) -> Result<SweepState> {
        audit(AuditEvent::SweepEmpty {
            account: self.session.account.to_string(),
            prior_attempt: self.session.has_prior_attempt,
            timestamp_ns: now_nanos(),
        });
        if self.session.mode == SweepMode::PrivateWalletMigration {
            // Migration flows finish quietly when there is nothing to move:
            // the owed flag clears and the success callback fires without a
            // user-facing terminal screen.
            self.resolve_owed_flag();
            self.transition_to(SweepStage::CompletedEmpty)?;
            self.notify_success();
            return Ok(SweepState::CompletedEmpty);
        }
        if self.session.has_prior_attempt {
            self.resolve_owed_flag();
            self.transition_to(SweepStage::CompletedEmpty)?;
            return Ok(SweepState::CompletedEmpty);
        }
        self.transition_to(SweepStage::EmptyFound)?;
        Ok(SweepState::EmptyFound)
    }

    async fn sign_and_broadcast(&mut self) -> Result<SweepState> {
        let sign_outcome = self.pipeline.sign_all(self.candidates.clone()).await;
        let signed = match sign_outcome {
            Ok(signed) => signed,
            Err(cause) => return self.sweep_failed(cause),
        };
        let broadcast_outcome = self.pipeline.broadcast_all(&signed).await;
        if let Err(cause) = broadcast_outcome {
            return self.sweep_failed(cause);
        }
        self.candidates = signed;
        self.resolve_owed_flag();
        self.transition_to(SweepStage::Completed)?;
        let aggregate = self
            .aggregate
            .clone()
            .ok_or_else(|| SweepError::Message("aggregate missing after broadcast".to_string()))?;
        info!(
            "sweep completed account={} candidates={} transferred_sats={}",
            self.session.account,
            self.candidates.len(),
            aggregate.total_transferred_sats
        );
        audit(AuditEvent::SweepCompleted {
            account: self.session.account.to_string(),
            candidate_count: self.candidates.len(),
            total_transferred_sats: aggregate.total_transferred_sats,
            timestamp_ns: now_nanos(),
        });
        Ok(SweepState::Completed { aggregate })
    }

    fn preparation_failed(&mut self, cause: SweepError) -> Result<SweepState> {
        self.transition_to(SweepStage::PreparationFailed)?;
        warn!("sweep preparation failed account={} error={}", self.session.account, cause);
        self.audit_failure(&cause);
        self.observer.on_sweep_failed(&cause);
        Ok(SweepState::PreparationFailed { cause })
    }

    fn sweep_failed(&mut self, cause: SweepError) -> Result<SweepState> {
        self.transition_to(SweepStage::Failed)?;
        warn!("sweep failed account={} error={}", self.session.account, cause);
        self.audit_failure(&cause);
        self.observer.on_sweep_failed(&cause);
        Ok(SweepState::Failed { cause })
    }

    fn audit_failure(&self, cause: &SweepError) {
        audit(AuditEvent::SweepFailed {
            account: self.session.account.to_string(),
            code: format!("{:?}", cause.code()),
            reason: cause.to_string(),
            timestamp_ns: now_nanos(),
        });
    }

    /// Best-effort flag clear. Funds have already moved (or were never
    /// there), so a storage error must not turn the outcome into a failure;
    /// an uncleared flag re-prompts on the next launch, where the preparer
    /// reports "no funds" and the empty path clears it.
    fn resolve_owed_flag(&self) {
        if let Err(err) = self.completion.mark_resolved() {
            warn!("failed to clear sweep owed flag account={} error={}", self.session.account, err);
        }
    }

    fn notify_success(&mut self) {
        if self.success_notified {
            return;
        }
        self.success_notified = true;
        self.observer.on_sweep_succeeded();
    }

    fn transition_to(&mut self, to: SweepStage) -> Result<()> {
        ensure_transition(self.stage, to)?;
        self.observer.on_state_changed(self.stage, to);
        self.stage = to;
        Ok(())
    }
}
