use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use super::{Lock, LockError, LockManager};
use crate::key::StockKey;

/// In-memory lock backed by `Mutex<bool>` + `Condvar`.
///
/// Carries its key's display form so timeout errors can name the row.
pub struct InMemoryLock {
    key: String,
    state: Mutex<bool>,
    wake: Condvar,
}

impl InMemoryLock {
    pub fn new(key: impl Into<String>) -> Self {
        InMemoryLock {
            key: key.into(),
            state: Mutex::new(false),
            wake: Condvar::new(),
        }
    }
}

impl Lock for InMemoryLock {
    fn lock(&self) -> Result<(), LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        while *locked {
            locked = self
                .wake
                .wait(locked)
                .map_err(|e| LockError::Poisoned(e.to_string()))?;
        }
        *locked = true;
        Ok(())
    }

    fn lock_timeout(&self, timeout: Duration) -> Result<(), LockError> {
        let deadline = Instant::now() + timeout;
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        while *locked {
            let now = Instant::now();
            if now >= deadline {
                return Err(LockError::Timeout {
                    key: self.key.clone(),
                    waited: timeout,
                });
            }
            let (guard, _) = self
                .wake
                .wait_timeout(locked, deadline - now)
                .map_err(|e| LockError::Poisoned(e.to_string()))?;
            locked = guard;
        }
        *locked = true;
        Ok(())
    }

    fn try_lock(&self) -> Result<bool, LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        if *locked {
            Ok(false)
        } else {
            *locked = true;
            Ok(true)
        }
    }

    fn unlock(&self) -> Result<(), LockError> {
        let mut locked = self
            .state
            .lock()
            .map_err(|e| LockError::Poisoned(e.to_string()))?;
        if *locked {
            *locked = false;
            self.wake.notify_one();
        }
        Ok(())
    }
}

/// In-memory lock manager: one lazily created lock per stock key.
///
/// Repeated lookups return the same `Arc`, so all writers for a key contend
/// on the same primitive. Locks are never evicted — one entry per touched
/// key for the life of the process, matching the record store's
/// never-delete lifecycle.
pub struct InMemoryLockManager {
    locks: Mutex<HashMap<StockKey, Arc<InMemoryLock>>>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        InMemoryLockManager {
            locks: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryLockManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LockManager for InMemoryLockManager {
    type Lock = InMemoryLock;

    fn get_lock(&self, key: &StockKey) -> Result<Arc<InMemoryLock>, LockError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LockError::Poisoned("lock manager map".into()))?;
        Ok(locks
            .entry(*key)
            .or_insert_with(|| Arc::new(InMemoryLock::new(key.to_string())))
            .clone())
    }
}
