use crate::foundation::{KeysetId, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// App-key signer for one legacy keyset.
#[async_trait]
pub trait AppSigner: Send + Sync {
    /// Add the app-key signature to the transaction, returning the updated
    /// bytes. The input may already carry a hardware signature.
    async fn sign(&self, raw: &[u8]) -> Result<Vec<u8>>;
}

/// Looks up (or derives) the app-key signer for a legacy keyset.
///
/// Lookup is fallible: key material for an old keyset may be gone entirely,
/// which surfaces as `SweepError::SignerUnavailable`.
#[async_trait]
pub trait AppSignerProvider: Send + Sync {
    async fn signer_for(&self, keyset: &KeysetId) -> Result<Arc<dyn AppSigner>>;
}

/// Network-resident co-signing service contributing the server signature.
///
/// Implementations distinguish connectivity failures
/// (`SweepError::RemoteConnectivity`) from server-side rejections
/// (`SweepError::RemoteRejected`) so the caller can message them differently.
#[async_trait]
pub trait RemoteCoSigner: Send + Sync {
    async fn co_sign(&self, raw: &[u8], keyset: &KeysetId) -> Result<Vec<u8>>;
}
