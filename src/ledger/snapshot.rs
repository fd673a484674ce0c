//! Ledger snapshot and restore.
//!
//! The snapshot is a JSON envelope of base64-encoded bitcode entries.
//! Restore re-appends every movement and rebuilds record state by replaying
//! signed deltas from zero — reservations are allocations, not movements,
//! so restored records carry no reservation.

use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::InventoryError;
use crate::key::StockKey;
use crate::movement::Movement;
use crate::record::StockRecord;
use crate::store::{InMemoryRecordStore, RecordStore};

use super::error::LedgerError;
use super::in_memory::InMemoryMovementLog;
use super::log::MovementLog;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct LedgerSnapshot {
    version: u32,
    entries: Vec<String>,
}

/// Export the full ledger as a JSON snapshot string.
pub fn snapshot(log: &InMemoryMovementLog) -> Result<String, LedgerError> {
    let entries = log
        .raw_entries()?
        .iter()
        .map(|bytes| STANDARD.encode(bytes))
        .collect();

    let envelope = LedgerSnapshot {
        version: SNAPSHOT_VERSION,
        entries,
    };
    serde_json::to_string(&envelope).map_err(|e| LedgerError::Encode(e.to_string()))
}

/// Rebuild a ledger and its record store from a snapshot.
///
/// Movements are re-appended in their original order (per-key sequences
/// come out identical) and each is replayed into its record. A snapshot
/// whose deltas would take a record negative is corrupt and is rejected.
pub fn restore(json: &str) -> Result<(InMemoryMovementLog, InMemoryRecordStore), InventoryError> {
    let envelope: LedgerSnapshot =
        serde_json::from_str(json).map_err(|e| LedgerError::Decode(e.to_string()))?;
    if envelope.version != SNAPSHOT_VERSION {
        return Err(InventoryError::Ledger(LedgerError::Decode(format!(
            "unsupported snapshot version {}",
            envelope.version
        ))));
    }

    let log = InMemoryMovementLog::new();
    let store = InMemoryRecordStore::new();
    let mut records: HashMap<StockKey, StockRecord> = HashMap::new();

    for encoded in &envelope.entries {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| LedgerError::Decode(e.to_string()))?;
        let movement: Movement =
            bitcode::deserialize(&bytes).map_err(|e| LedgerError::Decode(e.to_string()))?;

        let record = records
            .entry(movement.key)
            .or_insert_with(|| StockRecord::new(movement.key));
        record.apply(&movement)?;

        log.append(movement)?;
    }

    for record in records.values() {
        store.save(record)?;
    }

    Ok((log, store))
}
