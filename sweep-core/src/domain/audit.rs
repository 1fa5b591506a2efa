//! Audit event types for the sweep lifecycle (no logging in domain).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    SweepPrepared {
        account: String,
        candidate_count: usize,
        total_fee_sats: u64,
        total_transferred_sats: u64,
        destination: String,
        timestamp_ns: u64,
    },
    SweepEmpty {
        account: String,
        prior_attempt: bool,
        timestamp_ns: u64,
    },
    AttemptRecorded {
        account: String,
        timestamp_ns: u64,
    },
    CandidateSigned {
        candidate_id: String,
        keyset: String,
        phase: String,
        timestamp_ns: u64,
    },
    TransactionBroadcast {
        candidate_id: String,
        fee_sats: u64,
        amount_sats: u64,
        timestamp_ns: u64,
    },
    SweepCompleted {
        account: String,
        candidate_count: usize,
        total_transferred_sats: u64,
        timestamp_ns: u64,
    },
    SweepFailed {
        account: String,
        code: String,
        reason: String,
        timestamp_ns: u64,
    },
    OwedFlagCleared {
        account: String,
        timestamp_ns: u64,
    },
}
