use std::fmt;

/// Error type for record store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The underlying storage lock was poisoned.
    Poisoned(String),
    /// A stored record failed to serialize or deserialize.
    Serde(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Poisoned(msg) => write!(f, "store lock poisoned: {}", msg),
            StoreError::Serde(msg) => write!(f, "record serde failed: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}
