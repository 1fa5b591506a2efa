use crate::foundation::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fee/relay priority hint forwarded to the blockchain layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadcastPriority {
    #[default]
    Standard,
    Elevated,
}

impl fmt::Display for BroadcastPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Elevated => write!(f, "elevated"),
        }
    }
}

/// Submits a fully-signed transaction to the blockchain layer.
///
/// Failures are `SweepError::BroadcastRejected` - a distinct family from
/// signing and network errors.
#[async_trait]
pub trait TransactionBroadcaster: Send + Sync {
    async fn broadcast(&self, raw: &[u8], priority: BroadcastPriority) -> Result<()>;
}
