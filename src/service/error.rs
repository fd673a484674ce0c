use std::fmt;

use crate::error::InventoryError;
use crate::lock::LockError;

/// Error type for command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    /// No handler registered for this command name.
    UnknownCommand(String),
    /// Payload decode / deserialization failed.
    DecodeFailed(String),
    /// The request was well-formed but invalid (zero quantity, unknown
    /// movement kind, malformed key).
    Rejected(String),
    /// The request conflicts with current stock levels (insufficient
    /// on-hand or available quantity).
    Conflict(String),
    /// Referenced record does not exist.
    NotFound(String),
    /// Missing or invalid actor identity.
    Unauthorized(String),
    /// The row was busy past the lock-wait bound; worth retrying.
    Transient(String),
    /// Infrastructure failure (store, ledger, lock poisoning).
    Internal(String),
}

impl HandlerError {
    /// HTTP status for this error, for transports that speak HTTP.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownCommand(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::Rejected(_) => 422,
            HandlerError::Conflict(_) => 409,
            HandlerError::NotFound(_) => 404,
            HandlerError::Unauthorized(_) => 401,
            HandlerError::Transient(_) => 503,
            HandlerError::Internal(_) => 500,
        }
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerError::UnknownCommand(name) => write!(f, "unknown command: {}", name),
            HandlerError::DecodeFailed(msg) => write!(f, "decode failed: {}", msg),
            HandlerError::Rejected(msg) => write!(f, "rejected: {}", msg),
            HandlerError::Conflict(msg) => write!(f, "conflict: {}", msg),
            HandlerError::NotFound(msg) => write!(f, "not found: {}", msg),
            HandlerError::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
            HandlerError::Transient(msg) => write!(f, "transient failure: {}", msg),
            HandlerError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for HandlerError {}

impl From<InventoryError> for HandlerError {
    fn from(err: InventoryError) -> Self {
        match &err {
            InventoryError::NotFound(_) => HandlerError::NotFound(err.to_string()),
            InventoryError::InsufficientStock { .. }
            | InventoryError::InsufficientAvailableStock { .. } => {
                HandlerError::Conflict(err.to_string())
            }
            InventoryError::InvalidQuantity(_)
            | InventoryError::UnknownKind(_)
            | InventoryError::UnknownDirection(_)
            | InventoryError::MalformedKey(_) => HandlerError::Rejected(err.to_string()),
            InventoryError::Lock(LockError::Timeout { .. }) => {
                HandlerError::Transient(err.to_string())
            }
            InventoryError::Lock(_) | InventoryError::Store(_) | InventoryError::Ledger(_) => {
                HandlerError::Internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::StockKey;
    use std::time::Duration;

    #[test]
    fn status_codes() {
        assert_eq!(HandlerError::UnknownCommand("x".into()).status_code(), 404);
        assert_eq!(HandlerError::DecodeFailed("x".into()).status_code(), 400);
        assert_eq!(HandlerError::Rejected("x".into()).status_code(), 422);
        assert_eq!(HandlerError::Conflict("x".into()).status_code(), 409);
        assert_eq!(HandlerError::Unauthorized("x".into()).status_code(), 401);
        assert_eq!(HandlerError::Transient("x".into()).status_code(), 503);
        assert_eq!(HandlerError::Internal("x".into()).status_code(), 500);
    }

    #[test]
    fn insufficient_stock_maps_to_conflict() {
        let err: HandlerError = InventoryError::InsufficientStock {
            key: StockKey::new(7, 2),
            requested: 5,
            on_hand: 3,
        }
        .into();
        assert!(matches!(err, HandlerError::Conflict(_)));
    }

    #[test]
    fn lock_timeout_maps_to_transient() {
        let err: HandlerError = InventoryError::Lock(LockError::Timeout {
            key: "7/2".into(),
            waited: Duration::from_secs(5),
        })
        .into();
        assert!(matches!(err, HandlerError::Transient(_)));
    }

    #[test]
    fn invalid_quantity_maps_to_rejected() {
        let err: HandlerError = InventoryError::InvalidQuantity(0).into();
        assert!(matches!(err, HandlerError::Rejected(_)));
    }
}
