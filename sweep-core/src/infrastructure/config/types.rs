use crate::foundation::{Result, SweepError, MAX_SWEEP_CANDIDATES, MAX_TRANSACTION_BLOB_SIZE};
use crate::infrastructure::broadcast::BroadcastPriority;
use serde::{Deserialize, Serialize};

/// Base configuration for sweep orchestration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Directory for the sweep-status file and audit log.
    #[serde(default)]
    pub data_dir: String,
    /// Optional directory for log files. Console-only when absent.
    #[serde(default)]
    pub log_dir: Option<String>,
    /// Log filter expression (e.g. `"info"`, `"sweep_core=debug"`).
    #[serde(default = "default_log_filters")]
    pub log_filters: String,
    /// Priority hint forwarded with every broadcast.
    #[serde(default)]
    pub broadcast_priority: BroadcastPriority,
    /// Upper bound on candidates accepted from the preparer.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    /// Upper bound on a single candidate's transaction blob.
    #[serde(default = "default_max_transaction_bytes")]
    pub max_transaction_bytes: usize,
}

fn default_log_filters() -> String {
    "info".to_string()
}

fn default_max_candidates() -> usize {
    MAX_SWEEP_CANDIDATES
}

fn default_max_transaction_bytes() -> usize {
    MAX_TRANSACTION_BLOB_SIZE
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            log_dir: None,
            log_filters: default_log_filters(),
            broadcast_priority: BroadcastPriority::default(),
            max_candidates: default_max_candidates(),
            max_transaction_bytes: default_max_transaction_bytes(),
        }
    }
}

impl SweepConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_candidates == 0 {
            return Err(SweepError::ConfigError("max_candidates must be at least 1".to_string()));
        }
        if self.max_candidates > MAX_SWEEP_CANDIDATES {
            return Err(SweepError::ConfigError(format!(
                "max_candidates {} exceeds hard cap {}",
                self.max_candidates, MAX_SWEEP_CANDIDATES
            )));
        }
        if self.max_transaction_bytes == 0 {
            return Err(SweepError::ConfigError("max_transaction_bytes must be at least 1".to_string()));
        }
        Ok(())
    }
}
