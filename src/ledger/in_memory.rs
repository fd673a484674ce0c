use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::key::StockKey;
use crate::movement::Movement;

use super::error::LedgerError;
use super::log::MovementLog;

#[derive(Debug)]
struct LogInner {
    /// Bitcode-encoded entries in global append order.
    entries: Vec<Vec<u8>>,
    /// Next sequence number per key.
    sequences: HashMap<StockKey, u64>,
}

/// In-memory movement ledger.
///
/// Entries are stored as compact bitcode bytes in an append-only vector and
/// decoded on scan. Sequence stamping and the append share one lock, so two
/// writers can never interleave a sequence number with someone else's
/// entry. Clone-friendly via Arc.
#[derive(Clone, Debug)]
pub struct InMemoryMovementLog {
    inner: Arc<RwLock<LogInner>>,
}

impl Default for InMemoryMovementLog {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMovementLog {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(LogInner {
                entries: Vec::new(),
                sequences: HashMap::new(),
            })),
        }
    }

    /// Raw encoded entries, for snapshot export.
    pub(crate) fn raw_entries(&self) -> Result<Vec<Vec<u8>>, LedgerError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LedgerError::Poisoned("movement log".into()))?;
        Ok(inner.entries.clone())
    }

    fn decode(bytes: &[u8]) -> Result<Movement, LedgerError> {
        bitcode::deserialize(bytes).map_err(|e| LedgerError::Decode(e.to_string()))
    }
}

impl MovementLog for InMemoryMovementLog {
    fn append(&self, mut movement: Movement) -> Result<Movement, LedgerError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| LedgerError::Poisoned("movement log".into()))?;

        let sequence = inner
            .sequences
            .get(&movement.key)
            .copied()
            .unwrap_or(0)
            + 1;
        movement.sequence = sequence;

        let bytes =
            bitcode::serialize(&movement).map_err(|e| LedgerError::Encode(e.to_string()))?;

        inner.sequences.insert(movement.key, sequence);
        inner.entries.push(bytes);

        Ok(movement)
    }

    fn for_key(&self, key: &StockKey) -> Result<Vec<Movement>, LedgerError> {
        self.find(&|m| m.key == *key)
    }

    fn find(&self, predicate: &dyn Fn(&Movement) -> bool) -> Result<Vec<Movement>, LedgerError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LedgerError::Poisoned("movement log".into()))?;

        let mut matches = Vec::new();
        for bytes in &inner.entries {
            let movement = Self::decode(bytes)?;
            if predicate(&movement) {
                matches.push(movement);
            }
        }
        Ok(matches)
    }

    fn len(&self) -> Result<usize, LedgerError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LedgerError::Poisoned("movement log".into()))?;
        Ok(inner.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::{MovementDraft, MovementKind};

    fn draft(kind: MovementKind, quantity: u64, reference_no: &str) -> MovementDraft {
        MovementDraft::new(kind, quantity, reference_no, "", "tester")
    }

    fn append(log: &InMemoryMovementLog, key: StockKey, kind: MovementKind, qty: u64) -> Movement {
        let before = log.replayed_quantity(&key).unwrap().max(0) as u64;
        let after = match kind.direction() {
            crate::movement::Direction::Inbound => before + qty,
            crate::movement::Direction::Outbound => before - qty,
        };
        log.append(draft(kind, qty, "REF-1").into_movement(key, before, after))
            .unwrap()
    }

    #[test]
    fn append_assigns_per_key_sequences() {
        let log = InMemoryMovementLog::new();
        let a = StockKey::new(1, 1);
        let b = StockKey::new(2, 1);

        assert_eq!(append(&log, a, MovementKind::InitialStock, 10).sequence, 1);
        assert_eq!(append(&log, a, MovementKind::PurchaseReceipt, 5).sequence, 2);
        assert_eq!(append(&log, b, MovementKind::InitialStock, 3).sequence, 1);
        assert_eq!(append(&log, a, MovementKind::SalesShipment, 4).sequence, 3);
    }

    #[test]
    fn for_key_preserves_append_order() {
        let log = InMemoryMovementLog::new();
        let key = StockKey::new(7, 2);
        append(&log, key, MovementKind::InitialStock, 10);
        append(&log, key, MovementKind::SalesShipment, 4);
        append(&log, key, MovementKind::PurchaseReceipt, 6);

        let history = log.for_key(&key).unwrap();
        let sequences: Vec<u64> = history.iter().map(|m| m.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);
    }

    #[test]
    fn replayed_quantity_sums_signed_deltas() {
        let log = InMemoryMovementLog::new();
        let key = StockKey::new(7, 2);
        append(&log, key, MovementKind::InitialStock, 100);
        append(&log, key, MovementKind::SalesShipment, 30);
        append(&log, key, MovementKind::AdjustmentIn, 7);

        assert_eq!(log.replayed_quantity(&key).unwrap(), 77);
        assert_eq!(log.replayed_quantity(&StockKey::new(9, 9)).unwrap(), 0);
    }

    #[test]
    fn find_scans_across_keys() {
        let log = InMemoryMovementLog::new();
        append(&log, StockKey::new(1, 1), MovementKind::InitialStock, 1);
        append(&log, StockKey::new(1, 2), MovementKind::InitialStock, 1);
        append(&log, StockKey::new(2, 1), MovementKind::InitialStock, 1);

        let product_one = log.find(&|m| m.key.product_id == 1).unwrap();
        assert_eq!(product_one.len(), 2);
        assert_eq!(log.len().unwrap(), 3);
    }
}
