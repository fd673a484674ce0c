use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::key::StockKey;
use crate::record::StockRecord;

use super::error::StoreError;
use super::store::{RecordStore, Versioned};

/// Internal stored representation of a record.
#[derive(Debug)]
struct StoredRecord {
    bytes: Vec<u8>,
    version: u64,
}

/// In-memory record store backed by a HashMap.
///
/// Storage key is `"stock:<product>/<warehouse>"`; values are JSON bytes
/// plus a per-key version counter. Clone-friendly via Arc.
#[derive(Clone, Debug)]
pub struct InMemoryRecordStore {
    storage: Arc<RwLock<HashMap<String, StoredRecord>>>,
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn make_key(key: &StockKey) -> String {
        format!("stock:{}", key)
    }

    fn decode(stored: &StoredRecord) -> Result<Versioned<StockRecord>, StoreError> {
        let data: StockRecord =
            serde_json::from_slice(&stored.bytes).map_err(|e| StoreError::Serde(e.to_string()))?;
        Ok(Versioned {
            data,
            version: stored.version,
        })
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, key: &StockKey) -> Result<Option<Versioned<StockRecord>>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Poisoned("record storage".into()))?;

        storage
            .get(&Self::make_key(key))
            .map(Self::decode)
            .transpose()
    }

    fn save(&self, record: &StockRecord) -> Result<Versioned<StockRecord>, StoreError> {
        let key = Self::make_key(&record.key());
        let bytes = serde_json::to_vec(record).map_err(|e| StoreError::Serde(e.to_string()))?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Poisoned("record storage".into()))?;

        let new_version = storage.get(&key).map(|s| s.version + 1).unwrap_or(1);

        storage.insert(
            key,
            StoredRecord {
                bytes,
                version: new_version,
            },
        );

        Ok(Versioned {
            data: record.clone(),
            version: new_version,
        })
    }

    fn all(&self) -> Result<Vec<StockRecord>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Poisoned("record storage".into()))?;

        storage
            .values()
            .map(|stored| Self::decode(stored).map(|v| v.data))
            .collect()
    }

    fn find(
        &self,
        predicate: &dyn Fn(&StockRecord) -> bool,
    ) -> Result<Vec<StockRecord>, StoreError> {
        Ok(self.all()?.into_iter().filter(|r| predicate(r)).collect())
    }
}
