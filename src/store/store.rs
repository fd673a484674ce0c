use crate::key::StockKey;
use crate::record::StockRecord;

use super::error::StoreError;

/// A record plus the storage version it was read at.
#[derive(Clone, Debug, PartialEq)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Abstract storage for current stock records.
///
/// `save` is an upsert and bumps the version. Callers that need
/// read-modify-write consistency must hold the per-key lock around the
/// whole cycle — the store does not serialize writers itself.
pub trait RecordStore: Send + Sync {
    /// Get the record for a key. Returns None if no movement has ever
    /// touched the key.
    fn get(&self, key: &StockKey) -> Result<Option<Versioned<StockRecord>>, StoreError>;

    /// Insert or update a record, bumping its version.
    fn save(&self, record: &StockRecord) -> Result<Versioned<StockRecord>, StoreError>;

    /// All records, in unspecified order.
    fn all(&self) -> Result<Vec<StockRecord>, StoreError>;

    /// Records matching a predicate.
    fn find(
        &self,
        predicate: &dyn Fn(&StockRecord) -> bool,
    ) -> Result<Vec<StockRecord>, StoreError>;
}
