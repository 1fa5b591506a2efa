use crate::foundation::{AccountId, CandidateId, KeysetId, SweepError, MAX_SWEEP_CANDIDATES};
use serde::{Deserialize, Serialize};

/// Why a sweep is running. Fixed when the owning recovery/migration flow
/// reaches the sweep step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMode {
    StandardRecovery,
    InactiveWalletCleanup,
    PrivateWalletMigration,
}

/// Which signer parties must authorize a candidate before broadcast.
///
/// Fixed by the preparer when the candidate is built; the orchestrator only
/// consumes it, never computes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureRole {
    AppAndServer,
    HardwareAndServer,
    AppAndHardware,
}

impl SignatureRole {
    pub fn requires_app(self) -> bool {
        matches!(self, SignatureRole::AppAndServer | SignatureRole::AppAndHardware)
    }

    pub fn requires_server(self) -> bool {
        matches!(self, SignatureRole::AppAndServer | SignatureRole::HardwareAndServer)
    }

    pub fn requires_hardware(self) -> bool {
        matches!(self, SignatureRole::HardwareAndServer | SignatureRole::AppAndHardware)
    }
}

/// PSBT-equivalent payload: opaque transaction bytes plus the totals shown
/// at review time. The binary format is owned by the preparer and signers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepTransaction {
    pub raw: Vec<u8>,
    pub fee_sats: u64,
    pub amount_sats: u64,
}

/// One unsigned consolidation transaction, moving everything spendable under
/// `source_keyset` to `destination_address`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepCandidate {
    pub candidate_id: CandidateId,
    pub transaction: SweepTransaction,
    pub source_keyset: KeysetId,
    pub destination_address: String,
    pub signature_role: SignatureRole,
}

impl SweepCandidate {
    /// Signing never mutates in place: a signed candidate is a new value
    /// carrying the updated transaction bytes. Fee and amount are unchanged.
    pub fn with_transaction(mut self, raw: Vec<u8>) -> Self {
        self.transaction.raw = raw;
        self
    }
}

/// One hardware-signed transaction handed back by the caller after the
/// physical device interaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HardwareSignedTransaction {
    pub candidate_id: CandidateId,
    pub raw: Vec<u8>,
}

/// A non-empty candidate set produced by the preparer.
#[derive(Clone, Debug)]
pub struct PreparedSweep {
    candidates: Vec<SweepCandidate>,
}

impl PreparedSweep {
    /// Preparers signal "nothing to sweep" with an absent sweep, never an
    /// empty one.
    pub fn new(candidates: Vec<SweepCandidate>) -> Result<Self, SweepError> {
        if candidates.is_empty() {
            return Err(SweepError::EmptySweep);
        }
        if candidates.len() > MAX_SWEEP_CANDIDATES {
            return Err(SweepError::CandidateLimitExceeded { count: candidates.len(), max: MAX_SWEEP_CANDIDATES });
        }
        Ok(Self { candidates })
    }

    pub fn candidates(&self) -> &[SweepCandidate] {
        &self.candidates
    }

    pub fn into_candidates(self) -> Vec<SweepCandidate> {
        self.candidates
    }
}

/// Transient context for one sweep attempt. Lives only for the duration of
/// the owning recovery/migration flow; never persisted.
#[derive(Clone, Debug)]
pub struct SweepSession {
    pub account: AccountId,
    pub mode: SweepMode,
    pub has_prior_attempt: bool,
}
