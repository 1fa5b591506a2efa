use crate::domain::model::SweepCandidate;
use crate::foundation::SweepError;
use serde::{Deserialize, Serialize};

/// Totals for one sweep, shown to the user before confirmation.
///
/// Derived from the candidate set on every preparation; never stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepAggregate {
    pub total_fee_sats: u64,
    pub total_transferred_sats: u64,
    pub destination_address: String,
}

/// Sum fees and transferred amounts over all candidates.
///
/// The preparer guarantees a single destination for the whole sweep; a
/// candidate set that disagrees is rejected here instead of being reported
/// under a silently-wrong address.
pub fn compute_aggregate(candidates: &[SweepCandidate]) -> Result<SweepAggregate, SweepError> {
    let first = candidates.first().ok_or(SweepError::EmptySweep)?;
    let destination_address = first.destination_address.clone();
    let mut total_fee_sats = 0u64;
    let mut total_transferred_sats = 0u64;
    for candidate in candidates {
        if candidate.destination_address != destination_address {
            return Err(SweepError::MixedDestinations {
                expected: destination_address,
                found: candidate.destination_address.clone(),
            });
        }
        total_fee_sats = total_fee_sats.saturating_add(candidate.transaction.fee_sats);
        total_transferred_sats = total_transferred_sats.saturating_add(candidate.transaction.amount_sats);
    }
    Ok(SweepAggregate { total_fee_sats, total_transferred_sats, destination_address })
}
