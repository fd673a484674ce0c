//! # stock_ledger
//!
//! An inventory quantity subsystem: per-(product, warehouse) stock records
//! with reservation semantics, an append-only movement ledger, and per-key
//! pessimistic locking.
//!
//! Every mutating operation serializes on its row's lock, updates the
//! record, and (for movements) appends one ledger entry — all as a single
//! unit of work. The record's on-hand quantity is always reconcilable by
//! replaying the ledger from zero. Reads never lock and may observe a
//! slightly stale snapshot.
//!
//! ```
//! use std::sync::Arc;
//! use stock_ledger::{
//!     AdjustmentProcessor, Inventory, MovementKind, ReservationManager, StockKey,
//! };
//!
//! let inventory = Arc::new(Inventory::in_memory());
//! let adjustments = AdjustmentProcessor::new(inventory.clone());
//! let reservations = ReservationManager::new(inventory.clone());
//! let key = StockKey::new(7, 2);
//!
//! adjustments
//!     .execute(key, MovementKind::PurchaseReceipt, 100, "PO-1001", "", "buyer-1")
//!     .unwrap();
//! reservations.reserve(key, 10).unwrap();
//!
//! let record = inventory.expect_record(&key).unwrap();
//! assert_eq!(record.quantity(), 100);
//! assert_eq!(record.available(), 90);
//! assert!(inventory.is_reconciled(&key).unwrap());
//! ```

#[cfg(feature = "bus")]
pub mod bus;
mod error;
mod inventory;
mod key;
pub mod ledger;
pub mod lock;
mod movement;
pub mod notify;
mod record;
pub mod service;
mod store;

pub use error::InventoryError;
pub use inventory::{AdjustmentProcessor, Inventory, ReservationManager};
pub use key::StockKey;
pub use ledger::{InMemoryMovementLog, LedgerError, MovementFilter, MovementLog};
pub use lock::{InMemoryLockManager, Lock, LockError, LockManager, LockPolicy};
pub use movement::{Direction, Movement, MovementDraft, MovementKind};
pub use record::StockRecord;
pub use store::{InMemoryRecordStore, RecordStore, StoreError, Versioned};

// Re-export the EventEmitter from the event_emitter_rs crate for
// subscribers wiring up `notify::LocalEmitterPublisher`.
#[cfg(feature = "emitter")]
pub use event_emitter_rs::EventEmitter;
