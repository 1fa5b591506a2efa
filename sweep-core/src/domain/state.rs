use crate::domain::aggregate::SweepAggregate;
use crate::domain::model::SweepCandidate;
use crate::foundation::SweepError;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Payload-free stage marker for the sweep lifecycle, used to validate
/// driver-method ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepStage {
    #[default]
    Created,
    Preparing,
    PreparationFailed,
    EmptyFound,
    CompletedEmpty,
    ReadyForReview,
    AwaitingHardwareSignatures,
    SigningAndBroadcasting,
    Completed,
    Failed,
}

const VALID_TRANSITIONS: &[(SweepStage, SweepStage)] = &[
    (SweepStage::Created, SweepStage::Preparing),
    (SweepStage::Preparing, SweepStage::PreparationFailed),
    (SweepStage::Preparing, SweepStage::EmptyFound),
    (SweepStage::Preparing, SweepStage::CompletedEmpty),
    (SweepStage::Preparing, SweepStage::ReadyForReview),
    (SweepStage::ReadyForReview, SweepStage::AwaitingHardwareSignatures),
    (SweepStage::ReadyForReview, SweepStage::SigningAndBroadcasting),
    (SweepStage::AwaitingHardwareSignatures, SweepStage::SigningAndBroadcasting),
    (SweepStage::SigningAndBroadcasting, SweepStage::Completed),
    (SweepStage::SigningAndBroadcasting, SweepStage::Failed),
    // A retry always restarts from preparation; partially-signed batches are
    // never resumed.
    (SweepStage::PreparationFailed, SweepStage::Preparing),
    (SweepStage::Failed, SweepStage::Preparing),
];

impl SweepStage {
    pub fn can_transition_to(self, target: SweepStage) -> bool {
        VALID_TRANSITIONS.contains(&(self, target))
    }

    /// Terminal for this attempt. `PreparationFailed` and `Failed` can still
    /// re-enter `Preparing` via retry.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SweepStage::PreparationFailed
                | SweepStage::EmptyFound
                | SweepStage::CompletedEmpty
                | SweepStage::Completed
                | SweepStage::Failed
        )
    }

    /// Every terminal stage except the two failure stages counts as success
    /// from the caller's perspective.
    pub fn is_success(self) -> bool {
        matches!(self, SweepStage::EmptyFound | SweepStage::CompletedEmpty | SweepStage::Completed)
    }
}

pub fn ensure_transition(from: SweepStage, to: SweepStage) -> Result<(), SweepError> {
    if from.can_transition_to(to) {
        info!("sweep stage transition from={:?} to={:?}", from, to);
        return Ok(());
    }
    warn!("invalid sweep stage transition from={:?} to={:?}", from, to);
    Err(SweepError::InvalidStateTransition { from: format!("{:?}", from), to: format!("{:?}", to) })
}

/// The state sequence exposed to the caller, with per-state payloads.
///
/// Matched exhaustively at every consumption point; the driver methods on the
/// orchestrator (`start_sweep`, `supply_hardware_signatures`, `retry`,
/// `proceed`) take over the role of the per-state callbacks.
#[derive(Clone, Debug)]
pub enum SweepState {
    Preparing,
    /// Preparation failed; `retry` re-enters `Preparing`.
    PreparationFailed { cause: SweepError },
    /// Nothing spendable and no prior attempt: informational, flag untouched.
    EmptyFound,
    /// Nothing spendable after an earlier attempt: the owed flag is cleared
    /// and `proceed` acknowledges success.
    CompletedEmpty,
    /// Totals for user confirmation; `start_sweep` continues.
    ReadyForReview { aggregate: SweepAggregate },
    /// Waiting for the caller-owned hardware interaction over exactly these
    /// candidates; `supply_hardware_signatures` continues.
    AwaitingHardwareSignatures { needs_hardware: Vec<SweepCandidate> },
    SigningAndBroadcasting,
    /// Every candidate broadcast; the owed flag is cleared.
    Completed { aggregate: SweepAggregate },
    /// Signing or broadcast failed; `retry` re-enters `Preparing`.
    Failed { cause: SweepError },
}

impl SweepState {
    pub fn stage(&self) -> SweepStage {
        match self {
            SweepState::Preparing => SweepStage::Preparing,
            SweepState::PreparationFailed { .. } => SweepStage::PreparationFailed,
            SweepState::EmptyFound => SweepStage::EmptyFound,
            SweepState::CompletedEmpty => SweepStage::CompletedEmpty,
            SweepState::ReadyForReview { .. } => SweepStage::ReadyForReview,
            SweepState::AwaitingHardwareSignatures { .. } => SweepStage::AwaitingHardwareSignatures,
            SweepState::SigningAndBroadcasting => SweepStage::SigningAndBroadcasting,
            SweepState::Completed { .. } => SweepStage::Completed,
            SweepState::Failed { .. } => SweepStage::Failed,
        }
    }
}
