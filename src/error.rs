use std::fmt;

use crate::key::StockKey;
use crate::ledger::LedgerError;
use crate::lock::LockError;
use crate::store::StoreError;

/// Error type for inventory operations.
///
/// All failures are synchronous and scoped to the single attempt — the
/// subsystem never retries internally. `is_transient` tells callers which
/// failures are worth retrying on their side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// No stock record exists for the key (read paths only; write paths
    /// create the record at zero instead of erroring).
    NotFound(StockKey),
    /// An outbound movement asked for more than is on hand.
    InsufficientStock {
        key: StockKey,
        requested: u64,
        on_hand: u64,
    },
    /// A reservation asked for more than is available (on-hand minus reserved).
    InsufficientAvailableStock {
        key: StockKey,
        requested: u64,
        available: u64,
    },
    /// A mutating operation was given a zero quantity.
    InvalidQuantity(u64),
    /// A movement kind string did not match any known kind.
    UnknownKind(String),
    /// A direction string was neither `in` nor `out`.
    UnknownDirection(String),
    /// A stock key string did not parse as `product/warehouse`.
    MalformedKey(String),
    /// Failure acquiring or releasing the per-key lock.
    Lock(LockError),
    /// Record store failure.
    Store(StoreError),
    /// Movement ledger failure.
    Ledger(LedgerError),
}

impl InventoryError {
    /// Whether the caller should treat this failure as retryable.
    ///
    /// Only lock-wait timeouts qualify: the row was busy, not wrong.
    /// Everything else is a rejection of this specific request.
    pub fn is_transient(&self) -> bool {
        matches!(self, InventoryError::Lock(LockError::Timeout { .. }))
    }
}

impl fmt::Display for InventoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InventoryError::NotFound(key) => {
                write!(f, "no stock record for {}", key)
            }
            InventoryError::InsufficientStock {
                key,
                requested,
                on_hand,
            } => write!(
                f,
                "insufficient stock for {}: requested {}, on hand {}",
                key, requested, on_hand
            ),
            InventoryError::InsufficientAvailableStock {
                key,
                requested,
                available,
            } => write!(
                f,
                "insufficient available stock for {}: requested {}, available {}",
                key, requested, available
            ),
            InventoryError::InvalidQuantity(qty) => {
                write!(f, "quantity must be positive, got {}", qty)
            }
            InventoryError::UnknownKind(kind) => {
                write!(f, "unknown movement kind: {}", kind)
            }
            InventoryError::UnknownDirection(direction) => {
                write!(f, "unknown movement direction: {}", direction)
            }
            InventoryError::MalformedKey(key) => {
                write!(f, "malformed stock key: {}", key)
            }
            InventoryError::Lock(e) => write!(f, "lock error: {}", e),
            InventoryError::Store(e) => write!(f, "store error: {}", e),
            InventoryError::Ledger(e) => write!(f, "ledger error: {}", e),
        }
    }
}

impl std::error::Error for InventoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InventoryError::Lock(e) => Some(e),
            InventoryError::Store(e) => Some(e),
            InventoryError::Ledger(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LockError> for InventoryError {
    fn from(err: LockError) -> Self {
        InventoryError::Lock(err)
    }
}

impl From<StoreError> for InventoryError {
    fn from(err: StoreError) -> Self {
        InventoryError::Store(err)
    }
}

impl From<LedgerError> for InventoryError {
    fn from(err: LedgerError) -> Self {
        InventoryError::Ledger(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn lock_timeout_is_transient() {
        let err = InventoryError::Lock(LockError::Timeout {
            key: "7/2".to_string(),
            waited: Duration::from_secs(5),
        });
        assert!(err.is_transient());
    }

    #[test]
    fn rejections_are_not_transient() {
        let key = StockKey::new(7, 2);
        assert!(!InventoryError::NotFound(key).is_transient());
        assert!(!InventoryError::InsufficientStock {
            key,
            requested: 5,
            on_hand: 3,
        }
        .is_transient());
        assert!(!InventoryError::InvalidQuantity(0).is_transient());
    }

    #[test]
    fn display_names_the_key() {
        let err = InventoryError::InsufficientAvailableStock {
            key: StockKey::new(7, 2),
            requested: 95,
            available: 90,
        };
        let msg = err.to_string();
        assert!(msg.contains("7/2"));
        assert!(msg.contains("95"));
        assert!(msg.contains("90"));
    }
}
