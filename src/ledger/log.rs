use std::time::SystemTime;

use crate::key::StockKey;
use crate::movement::Movement;

use super::error::LedgerError;

/// Abstract append-only storage for movements.
///
/// `append` assigns the per-key sequence number and returns the stamped
/// entry. Everything else is a read; there is deliberately no way to update
/// or delete an entry.
pub trait MovementLog: Send + Sync {
    /// Append a movement, stamping its per-key sequence. Returns the entry
    /// as stored.
    fn append(&self, movement: Movement) -> Result<Movement, LedgerError>;

    /// All movements for one key, in append order.
    fn for_key(&self, key: &StockKey) -> Result<Vec<Movement>, LedgerError>;

    /// All movements matching a predicate, in append order.
    fn find(&self, predicate: &dyn Fn(&Movement) -> bool) -> Result<Vec<Movement>, LedgerError>;

    /// Total number of entries in the ledger.
    fn len(&self) -> Result<usize, LedgerError>;

    fn is_empty(&self) -> Result<bool, LedgerError> {
        Ok(self.len()? == 0)
    }

    /// Fold the signed deltas for a key from zero.
    ///
    /// For a consistent system this equals the record's on-hand quantity —
    /// the reconciliation invariant the ledger exists to provide.
    fn replayed_quantity(&self, key: &StockKey) -> Result<i64, LedgerError> {
        Ok(self
            .for_key(key)?
            .iter()
            .map(Movement::signed_delta)
            .sum())
    }

    /// Movement history matching a filter, in append order.
    fn history(&self, filter: &MovementFilter) -> Result<Vec<Movement>, LedgerError> {
        self.find(&|m| filter.matches(m))
    }
}

/// Combinable movement-history filter: product, warehouse, reference and
/// time range, all optional.
#[derive(Clone, Debug, Default)]
pub struct MovementFilter {
    product_id: Option<u64>,
    warehouse_id: Option<u64>,
    reference_no: Option<String>,
    from: Option<SystemTime>,
    to: Option<SystemTime>,
}

impl MovementFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product(mut self, product_id: u64) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn warehouse(mut self, warehouse_id: u64) -> Self {
        self.warehouse_id = Some(warehouse_id);
        self
    }

    pub fn key(self, key: StockKey) -> Self {
        self.product(key.product_id).warehouse(key.warehouse_id)
    }

    pub fn reference(mut self, reference_no: impl Into<String>) -> Self {
        self.reference_no = Some(reference_no.into());
        self
    }

    /// Inclusive lower bound on `recorded_at`.
    pub fn from(mut self, from: SystemTime) -> Self {
        self.from = Some(from);
        self
    }

    /// Inclusive upper bound on `recorded_at`.
    pub fn to(mut self, to: SystemTime) -> Self {
        self.to = Some(to);
        self
    }

    pub fn matches(&self, movement: &Movement) -> bool {
        if let Some(product_id) = self.product_id {
            if movement.key.product_id != product_id {
                return false;
            }
        }
        if let Some(warehouse_id) = self.warehouse_id {
            if movement.key.warehouse_id != warehouse_id {
                return false;
            }
        }
        if let Some(reference_no) = &self.reference_no {
            if &movement.reference_no != reference_no {
                return false;
            }
        }
        if let Some(from) = self.from {
            if movement.recorded_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if movement.recorded_at > to {
                return false;
            }
        }
        true
    }
}
