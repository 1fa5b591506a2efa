use crate::domain::model::{HardwareSignedTransaction, SweepCandidate};
use crate::foundation::{CandidateId, SweepError};
use std::collections::HashMap;

/// The candidates that need a hardware signature before the signing pipeline
/// can run, in their prepared order.
pub fn hardware_subset(candidates: &[SweepCandidate]) -> Vec<SweepCandidate> {
    candidates.iter().filter(|c| c.signature_role.requires_hardware()).cloned().collect()
}

/// Merge hardware-signed transaction bytes back into the full candidate set.
///
/// The supplied set must cover exactly the hardware subset: every
/// hardware-role candidate gets its bytes replaced, candidates outside the
/// subset are untouched, and any stray or duplicate entry is an error.
/// Candidate order is preserved.
pub fn merge_hardware_signatures(
    candidates: &[SweepCandidate],
    signed: Vec<HardwareSignedTransaction>,
) -> Result<Vec<SweepCandidate>, SweepError> {
    let mut by_id: HashMap<CandidateId, Vec<u8>> = HashMap::with_capacity(signed.len());
    for entry in signed {
        if by_id.insert(entry.candidate_id, entry.raw).is_some() {
            return Err(SweepError::DuplicateHardwareSignature { candidate_id: entry.candidate_id.to_string() });
        }
    }

    let mut merged = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if candidate.signature_role.requires_hardware() {
            let raw = by_id
                .remove(&candidate.candidate_id)
                .ok_or_else(|| SweepError::HardwareSignatureMissing { candidate_id: candidate.candidate_id.to_string() })?;
            merged.push(candidate.clone().with_transaction(raw));
        } else {
            merged.push(candidate.clone());
        }
    }

    if let Some(stray) = by_id.keys().next() {
        return Err(SweepError::UnknownCandidate { candidate_id: stray.to_string() });
    }
    Ok(merged)
}
