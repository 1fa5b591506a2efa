use crate::application::lifecycle::{NoopObserver, SweepLifecycleObserver};
use crate::domain::SweepCandidate;
use crate::foundation::util::time::now_nanos;
use crate::foundation::{KeysetId, Result, SweepError};
use crate::infrastructure::audit::{audit, AuditEvent};
use crate::infrastructure::broadcast::{BroadcastPriority, TransactionBroadcaster};
use crate::infrastructure::signer::{AppSigner, AppSignerProvider, RemoteCoSigner};
use log::{debug, info};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SigningPhase {
    App,
    Server,
}

impl fmt::Display for SigningPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App => write!(f, "app"),
            Self::Server => write!(f, "server"),
        }
    }
}

/// Executes the role-specific signing phases over a candidate batch, then
/// broadcasts the results.
///
/// Phases are batched across candidates rather than interleaved: every
/// app-key signature lands before the first co-signer round trip, keeping the
/// remote call count stable and making "has the app already committed a
/// signature" independent of server availability. Within each phase,
/// candidates run in their prepared order.
pub struct SigningPipeline {
    signer_provider: Arc<dyn AppSignerProvider>,
    co_signer: Arc<dyn RemoteCoSigner>,
    broadcaster: Arc<dyn TransactionBroadcaster>,
    observer: Arc<dyn SweepLifecycleObserver>,
    priority: BroadcastPriority,
    signers: Mutex<HashMap<KeysetId, Arc<dyn AppSigner>>>,
}

impl SigningPipeline {
    pub fn new(
        signer_provider: Arc<dyn AppSignerProvider>,
        co_signer: Arc<dyn RemoteCoSigner>,
        broadcaster: Arc<dyn TransactionBroadcaster>,
    ) -> Self {
        Self::with_observer(signer_provider, co_signer, broadcaster, Arc::new(NoopObserver))
    }

    pub fn with_observer(
        signer_provider: Arc<dyn AppSignerProvider>,
        co_signer: Arc<dyn RemoteCoSigner>,
        broadcaster: Arc<dyn TransactionBroadcaster>,
        observer: Arc<dyn SweepLifecycleObserver>,
    ) -> Self {
        Self {
            signer_provider,
            co_signer,
            broadcaster,
            observer,
            priority: BroadcastPriority::default(),
            signers: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_broadcast_priority(&mut self, priority: BroadcastPriority) {
        self.priority = priority;
    }

    /// Run the app phase for every candidate, then the server phase for every
    /// candidate. Any failure aborts the whole batch with its original cause.
    pub async fn sign_all(&self, candidates: Vec<SweepCandidate>) -> Result<Vec<SweepCandidate>> {
        let mut app_signed = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            app_signed.push(self.app_phase(candidate).await?);
        }

        let mut fully_signed = Vec::with_capacity(app_signed.len());
        for candidate in app_signed {
            fully_signed.push(self.server_phase(candidate).await?);
        }
        Ok(fully_signed)
    }

    /// Broadcast every candidate's final transaction, in order. A single
    /// failure aborts the batch; there is no partial-broadcast success state.
    pub async fn broadcast_all(&self, candidates: &[SweepCandidate]) -> Result<()> {
        for candidate in candidates {
            self.broadcaster.broadcast(&candidate.transaction.raw, self.priority).await?;
            info!(
                "transaction broadcast candidate_id={} keyset={} priority={}",
                candidate.candidate_id, candidate.source_keyset, self.priority
            );
            audit(AuditEvent::TransactionBroadcast {
                candidate_id: candidate.candidate_id.to_string(),
                fee_sats: candidate.transaction.fee_sats,
                amount_sats: candidate.transaction.amount_sats,
                timestamp_ns: now_nanos(),
            });
            self.observer.on_transaction_broadcast(&candidate.candidate_id);
        }
        Ok(())
    }

    async fn app_phase(&self, candidate: SweepCandidate) -> Result<SweepCandidate> {
        if !candidate.signature_role.requires_app() {
            return Ok(candidate);
        }
        let signer = self.app_signer(&candidate.source_keyset).await?;
        let raw = signer.sign(&candidate.transaction.raw).await?;
        self.signed(&candidate, SigningPhase::App);
        Ok(candidate.with_transaction(raw))
    }

    async fn server_phase(&self, candidate: SweepCandidate) -> Result<SweepCandidate> {
        // AppAndHardware candidates stay off the co-signing service entirely.
        if !candidate.signature_role.requires_server() {
            return Ok(candidate);
        }
        let raw = self.co_signer.co_sign(&candidate.transaction.raw, &candidate.source_keyset).await?;
        self.signed(&candidate, SigningPhase::Server);
        Ok(candidate.with_transaction(raw))
    }

    /// App-key signers are derived lazily and reused for every candidate that
    /// shares a keyset, for the lifetime of this pipeline.
    async fn app_signer(&self, keyset: &KeysetId) -> Result<Arc<dyn AppSigner>> {
        if let Some(signer) = self.lock_signers()?.get(keyset) {
            return Ok(signer.clone());
        }
        let signer = self.signer_provider.signer_for(keyset).await?;
        self.lock_signers()?.insert(keyset.clone(), signer.clone());
        Ok(signer)
    }

    fn lock_signers(&self) -> Result<MutexGuard<'_, HashMap<KeysetId, Arc<dyn AppSigner>>>> {
        self.signers
            .lock()
            .map_err(|_| SweepError::storage("signer cache lock", "poisoned"))
    }

    fn signed(&self, candidate: &SweepCandidate, phase: SigningPhase) {
        debug!(
            "candidate signed candidate_id={} keyset={} phase={}",
            candidate.candidate_id, candidate.source_keyset, phase
        );
        audit(AuditEvent::CandidateSigned {
            candidate_id: candidate.candidate_id.to_string(),
            keyset: candidate.source_keyset.to_string(),
            phase: phase.to_string(),
            timestamp_ns: now_nanos(),
        });
        self.observer.on_candidate_signed(&candidate.candidate_id, phase);
    }
}
