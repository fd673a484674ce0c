use std::sync::Arc;

use super::{Lock, LockError};
use crate::key::StockKey;

/// Factory trait for obtaining per-key locks.
///
/// The inventory core obtains one lock per stock key before every mutation.
/// Repeated calls with the same key must return the same logical lock (the
/// same `Arc` for in-memory, or the same distributed key).
pub trait LockManager: Send + Sync {
    /// The concrete lock type returned by this manager.
    type Lock: Lock;

    /// Get (or lazily create) the lock for the given key.
    fn get_lock(&self, key: &StockKey) -> Result<Arc<Self::Lock>, LockError>;
}
