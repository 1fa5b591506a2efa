//! Durable sweep-owed flag storage.
//!
//! The single persisted artifact this core touches: one boolean per account,
//! set by whatever flow discovers an unresolved sweep obligation, cleared
//! only by the completion tracker on unconditional success.

use crate::foundation::{AccountId, Result, SweepError};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

pub trait SweepStatusStore: Send + Sync {
    fn is_sweep_owed(&self, account: &AccountId) -> Result<bool>;
    fn mark_sweep_owed(&self, account: &AccountId) -> Result<()>;
    fn clear_sweep_owed(&self, account: &AccountId) -> Result<()>;
}

/// In-memory store, used by tests and short-lived tooling.
pub struct MemoryStatusStore {
    owed: Mutex<HashSet<AccountId>>,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self { owed: Mutex::new(HashSet::new()) }
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, HashSet<AccountId>>> {
        self.owed
            .lock()
            .map_err(|_| SweepError::storage("memory status lock", "poisoned"))
    }
}

impl Default for MemoryStatusStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepStatusStore for MemoryStatusStore {
    fn is_sweep_owed(&self, account: &AccountId) -> Result<bool> {
        Ok(self.lock_inner()?.contains(account))
    }

    fn mark_sweep_owed(&self, account: &AccountId) -> Result<()> {
        self.lock_inner()?.insert(account.clone());
        Ok(())
    }

    fn clear_sweep_owed(&self, account: &AccountId) -> Result<()> {
        self.lock_inner()?.remove(account);
        Ok(())
    }
}

/// File-backed store: a JSON map of account id to owed flag, rewritten
/// atomically (write to a temp file, then rename).
pub struct FileStatusStore {
    path: PathBuf,
    inner: Mutex<HashMap<AccountId, bool>>,
}

impl FileStatusStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let inner = Self::load(&path)?;
        Ok(Self { path, inner: Mutex::new(inner) })
    }

    fn load(path: &Path) -> Result<HashMap<AccountId, bool>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let bytes = std::fs::read(path)?;
        if bytes.is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn persist(&self, inner: &HashMap<AccountId, bool>) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        let bytes = serde_json::to_vec(inner)?;
        std::fs::write(&tmp, bytes)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, HashMap<AccountId, bool>>> {
        self.inner
            .lock()
            .map_err(|_| SweepError::storage("file status lock", "poisoned"))
    }
}

impl SweepStatusStore for FileStatusStore {
    fn is_sweep_owed(&self, account: &AccountId) -> Result<bool> {
        Ok(self.lock_inner()?.get(account).copied().unwrap_or(false))
    }

    fn mark_sweep_owed(&self, account: &AccountId) -> Result<()> {
        let mut inner = self.lock_inner()?;
        inner.insert(account.clone(), true);
        self.persist(&inner)
    }

    fn clear_sweep_owed(&self, account: &AccountId) -> Result<()> {
        let mut inner = self.lock_inner()?;
        inner.insert(account.clone(), false);
        self.persist(&inner)
    }
}
