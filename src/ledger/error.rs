use std::fmt;

/// Error type for movement ledger operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// The underlying log lock was poisoned.
    Poisoned(String),
    /// An entry failed to encode for storage.
    Encode(String),
    /// A stored entry failed to decode.
    Decode(String),
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::Poisoned(msg) => write!(f, "ledger lock poisoned: {}", msg),
            LedgerError::Encode(msg) => write!(f, "movement encode failed: {}", msg),
            LedgerError::Decode(msg) => write!(f, "movement decode failed: {}", msg),
        }
    }
}

impl std::error::Error for LedgerError {}
