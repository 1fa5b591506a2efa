use crate::application::lifecycle::SweepLifecycleObserver;
use crate::foundation::util::time::now_nanos;
use crate::foundation::{AccountId, Result};
use crate::infrastructure::audit::{audit, AuditEvent};
use crate::infrastructure::status::SweepStatusStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Tracks the two durability signals of a sweep attempt.
///
/// Attempt recording and owed-flag lifecycle are independent: the attempt is
/// recorded the moment the user confirms, before any signing or network I/O,
/// while the owed flag is cleared only from unconditional-success exits and
/// never on failure.
pub struct CompletionTracker {
    account: AccountId,
    store: Arc<dyn SweepStatusStore>,
    observer: Arc<dyn SweepLifecycleObserver>,
    attempt_recorded: AtomicBool,
}

impl CompletionTracker {
    pub fn new(account: AccountId, store: Arc<dyn SweepStatusStore>, observer: Arc<dyn SweepLifecycleObserver>) -> Self {
        Self { account, store, observer, attempt_recorded: AtomicBool::new(false) }
    }

    /// Record that the user confirmed this attempt. One-shot: the latch keeps
    /// a re-entrant confirmation from firing the callback twice.
    pub fn record_attempt(&self) {
        if self.attempt_recorded.swap(true, Ordering::SeqCst) {
            return;
        }
        audit(AuditEvent::AttemptRecorded { account: self.account.to_string(), timestamp_ns: now_nanos() });
        self.observer.on_attempt_recorded();
    }

    pub fn attempt_recorded(&self) -> bool {
        self.attempt_recorded.load(Ordering::SeqCst)
    }

    /// Re-arm the latch for a fresh attempt after a failed one.
    pub fn reset_attempt(&self) {
        self.attempt_recorded.store(false, Ordering::SeqCst);
    }

    /// Clear the durable owed flag. Only called from the unconditional
    /// success exits: full broadcast, or a confirmed-empty result.
    pub fn mark_resolved(&self) -> Result<()> {
        self.store.clear_sweep_owed(&self.account)?;
        audit(AuditEvent::OwedFlagCleared { account: self.account.to_string(), timestamp_ns: now_nanos() });
        Ok(())
    }

    pub fn is_sweep_owed(&self) -> Result<bool> {
        self.store.is_sweep_owed(&self.account)
    }
}
