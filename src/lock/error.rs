use std::fmt;
use std::time::Duration;

/// Error type for lock operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    /// The underlying lock primitive was poisoned (a thread panicked while
    /// holding it).
    Poisoned(String),
    /// The bounded wait elapsed before the holder released the row.
    Timeout { key: String, waited: Duration },
    /// Failed to acquire the lock.
    AcquireFailed(String),
    /// Failed to release the lock.
    ReleaseFailed(String),
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockError::Poisoned(msg) => write!(f, "lock poisoned: {}", msg),
            LockError::Timeout { key, waited } => write!(
                f,
                "timed out after {:?} waiting for lock on {}",
                waited, key
            ),
            LockError::AcquireFailed(msg) => write!(f, "lock acquire failed: {}", msg),
            LockError::ReleaseFailed(msg) => write!(f, "lock release failed: {}", msg),
        }
    }
}

impl std::error::Error for LockError {}
