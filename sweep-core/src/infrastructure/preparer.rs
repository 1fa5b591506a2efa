use crate::domain::PreparedSweep;
use crate::foundation::{AccountId, Result};
use async_trait::async_trait;

/// Builds the candidate set for an account's outstanding legacy keysets.
///
/// The preparer owns UTXO selection, candidate construction, and the
/// uniform-destination guarantee. It must be safe to call repeatedly against
/// the same funds: an already-swept keyset simply yields no candidates on the
/// next pass, which is what makes whole-sweep retries idempotent.
#[async_trait]
pub trait SweepPreparer: Send + Sync {
    /// `Ok(None)` means nothing is spendable under any legacy keyset.
    async fn prepare_sweep(&self, account: &AccountId) -> Result<Option<PreparedSweep>>;
}
