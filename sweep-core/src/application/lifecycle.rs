use crate::application::signing_pipeline::SigningPhase;
use crate::domain::SweepStage;
use crate::foundation::{CandidateId, SweepError};
use std::sync::Arc;

/// Hooks into the sweep lifecycle.
///
/// The owning flow's one-shot callbacks (attempt recorded, success) are
/// delivered through this trait; the orchestrator guards them against double
/// invocation.
pub trait SweepLifecycleObserver: Send + Sync {
    fn on_state_changed(&self, _from: SweepStage, _to: SweepStage) {}
    fn on_attempt_recorded(&self) {}
    fn on_candidate_signed(&self, _candidate_id: &CandidateId, _phase: SigningPhase) {}
    fn on_transaction_broadcast(&self, _candidate_id: &CandidateId) {}
    fn on_sweep_succeeded(&self) {}
    fn on_sweep_failed(&self, _cause: &SweepError) {}
}

pub struct NoopObserver;

impl SweepLifecycleObserver for NoopObserver {}

pub struct CompositeObserver {
    observers: Vec<Arc<dyn SweepLifecycleObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub fn add_observer(&mut self, observer: Arc<dyn SweepLifecycleObserver>) {
        self.observers.push(observer);
    }
}

impl Default for CompositeObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepLifecycleObserver for CompositeObserver {
    fn on_state_changed(&self, from: SweepStage, to: SweepStage) {
        for observer in &self.observers {
            observer.on_state_changed(from, to);
        }
    }

    fn on_attempt_recorded(&self) {
        for observer in &self.observers {
            observer.on_attempt_recorded();
        }
    }

    fn on_candidate_signed(&self, candidate_id: &CandidateId, phase: SigningPhase) {
        for observer in &self.observers {
            observer.on_candidate_signed(candidate_id, phase);
        }
    }

    fn on_transaction_broadcast(&self, candidate_id: &CandidateId) {
        for observer in &self.observers {
            observer.on_transaction_broadcast(candidate_id);
        }
    }

    fn on_sweep_succeeded(&self) {
        for observer in &self.observers {
            observer.on_sweep_succeeded();
        }
    }

    fn on_sweep_failed(&self, cause: &SweepError) {
        for observer in &self.observers {
            observer.on_sweep_failed(cause);
        }
    }
}
