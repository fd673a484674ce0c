//! Inventory core — the locked unit of work plus the read side.
//!
//! [`Inventory`] composes a record store, a movement ledger, and a lock
//! manager. Every mutation goes through one of two internal primitives that
//! implement the locking discipline:
//!
//! 1. acquire the per-key lock (bounded wait per [`LockPolicy`]);
//! 2. load the record, or create it at zero inside the same locked scope;
//! 3. run the operation; a domain error aborts with nothing persisted;
//! 4. persist the record and append the ledger entry while still holding
//!    the lock;
//! 5. release the lock, then publish the notification.
//!
//! Read queries never lock: they may observe a slightly stale snapshot,
//! which is fine for dashboards but not as the basis for a reservation
//! decision — deciders go through the locked path.

mod adjustment;
mod reservation;

use std::sync::Mutex;

use crate::error::InventoryError;
use crate::key::StockKey;
use crate::ledger::{InMemoryMovementLog, MovementFilter, MovementLog};
use crate::lock::{InMemoryLockManager, LockGuard, LockManager, LockPolicy};
use crate::movement::{Movement, MovementDraft};
use crate::notify::{MovementNotice, MovementPublisher, MOVEMENT_RECORDED};
use crate::record::StockRecord;
use crate::store::{InMemoryRecordStore, RecordStore};

pub use adjustment::AdjustmentProcessor;
pub use reservation::ReservationManager;

/// The inventory subsystem: current records, movement ledger, per-key locks.
pub struct Inventory<S = InMemoryRecordStore, G = InMemoryMovementLog, L = InMemoryLockManager>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    store: S,
    ledger: G,
    locks: L,
    policy: LockPolicy,
    publisher: Option<Mutex<Box<dyn MovementPublisher>>>,
}

impl Inventory {
    /// A fully in-memory inventory with the default lock policy.
    pub fn in_memory() -> Self {
        Inventory::new(
            InMemoryRecordStore::new(),
            InMemoryMovementLog::new(),
            InMemoryLockManager::new(),
        )
    }
}

impl<S, G, L> Inventory<S, G, L>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    pub fn new(store: S, ledger: G, locks: L) -> Self {
        Inventory {
            store,
            ledger,
            locks,
            policy: LockPolicy::default(),
            publisher: None,
        }
    }

    /// Replace the lock policy. Builder pattern — returns `self`.
    pub fn with_policy(mut self, policy: LockPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Attach a movement publisher. Builder pattern — returns `self`.
    pub fn with_publisher(mut self, publisher: Box<dyn MovementPublisher>) -> Self {
        self.publisher = Some(Mutex::new(publisher));
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ledger(&self) -> &G {
        &self.ledger
    }

    pub fn policy(&self) -> LockPolicy {
        self.policy
    }

    // ------------------------------------------------------------------
    // Locked unit of work
    // ------------------------------------------------------------------

    /// Mutate reservation counters under the key's lock. No ledger entry —
    /// an allocation is not a movement. Returns the persisted record.
    pub(crate) fn allocate<F>(
        &self,
        op: &'static str,
        key: StockKey,
        f: F,
    ) -> Result<StockRecord, InventoryError>
    where
        F: FnOnce(&mut StockRecord) -> Result<(), InventoryError>,
    {
        let lock = self.locks.get_lock(&key)?;
        let _guard = LockGuard::acquire(lock, &self.policy)?;

        let mut record = self.load_or_create(&key)?;
        f(&mut record)?;
        self.store.save(&record)?;

        tracing::debug!(
            op,
            product = key.product_id,
            warehouse = key.warehouse_id,
            quantity = record.quantity(),
            reserved = record.reserved(),
            "allocation updated"
        );
        Ok(record)
    }

    /// Execute one movement under the key's lock: mutate the on-hand
    /// counter, persist the record, and append the ledger entry as one unit
    /// of work. Returns the stamped ledger entry.
    pub(crate) fn move_stock<F>(
        &self,
        op: &'static str,
        key: StockKey,
        draft: MovementDraft,
        f: F,
    ) -> Result<Movement, InventoryError>
    where
        F: FnOnce(&mut StockRecord) -> Result<(), InventoryError>,
    {
        let movement = {
            let lock = self.locks.get_lock(&key)?;
            let _guard = LockGuard::acquire(lock, &self.policy)?;

            let mut record = self.load_or_create(&key)?;
            let before = record.quantity();
            f(&mut record)?;
            let after = record.quantity();

            let movement = draft.into_movement(key, before, after);
            record.touch(movement.recorded_at);
            self.store.save(&record)?;
            self.ledger.append(movement)?
        };

        tracing::info!(
            op,
            product = key.product_id,
            warehouse = key.warehouse_id,
            kind = %movement.kind,
            quantity = movement.quantity,
            before = movement.quantity_before,
            after = movement.quantity_after,
            reference = %movement.reference_no,
            "movement recorded"
        );
        self.notify(&movement);
        Ok(movement)
    }

    /// Lazy creation happens here, under the caller's lock, so two writers
    /// racing on a brand-new key cannot both insert.
    fn load_or_create(&self, key: &StockKey) -> Result<StockRecord, InventoryError> {
        Ok(match self.store.get(key)? {
            Some(versioned) => versioned.data,
            None => StockRecord::new(*key),
        })
    }

    fn notify(&self, movement: &Movement) {
        let Some(publisher) = &self.publisher else {
            return;
        };
        let notice = MovementNotice::from(movement);
        let payload = match serde_json::to_vec(&notice) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "movement notice serialization failed");
                return;
            }
        };
        match publisher.lock() {
            Ok(mut publisher) => {
                if let Err(e) = publisher.publish(MOVEMENT_RECORDED, &payload) {
                    tracing::warn!(error = %e, "movement notification failed");
                }
            }
            Err(_) => tracing::warn!("movement publisher poisoned"),
        }
    }

    // ------------------------------------------------------------------
    // Read side (no locks, snapshot semantics)
    // ------------------------------------------------------------------

    /// The record for a key, if any movement has ever touched it.
    pub fn record(&self, key: &StockKey) -> Result<Option<StockRecord>, InventoryError> {
        Ok(self.store.get(key)?.map(|v| v.data))
    }

    /// The record for a key, erroring `NotFound` when absent.
    pub fn expect_record(&self, key: &StockKey) -> Result<StockRecord, InventoryError> {
        self.record(key)?.ok_or(InventoryError::NotFound(*key))
    }

    /// On-hand quantity for a key. `NotFound` when no record exists.
    pub fn on_hand(&self, key: &StockKey) -> Result<u64, InventoryError> {
        Ok(self.expect_record(key)?.quantity())
    }

    /// Available (on-hand minus reserved) quantity for a key.
    pub fn available(&self, key: &StockKey) -> Result<u64, InventoryError> {
        Ok(self.expect_record(key)?.available())
    }

    /// All records for a product across warehouses.
    pub fn for_product(&self, product_id: u64) -> Result<Vec<StockRecord>, InventoryError> {
        Ok(self
            .store
            .find(&|r| r.key().product_id == product_id)?)
    }

    /// All records in a warehouse.
    pub fn for_warehouse(&self, warehouse_id: u64) -> Result<Vec<StockRecord>, InventoryError> {
        Ok(self
            .store
            .find(&|r| r.key().warehouse_id == warehouse_id)?)
    }

    /// Records whose on-hand quantity is at or below the threshold.
    pub fn low_stock(&self, threshold: u64) -> Result<Vec<StockRecord>, InventoryError> {
        Ok(self.store.find(&|r| r.quantity() <= threshold)?)
    }

    /// Total on-hand for a product, summed across warehouses.
    pub fn total_on_hand(&self, product_id: u64) -> Result<u64, InventoryError> {
        Ok(self
            .for_product(product_id)?
            .iter()
            .map(StockRecord::quantity)
            .sum())
    }

    /// Total available for a product, summed across warehouses.
    pub fn total_available(&self, product_id: u64) -> Result<u64, InventoryError> {
        Ok(self
            .for_product(product_id)?
            .iter()
            .map(StockRecord::available)
            .sum())
    }

    /// Movement history matching a filter.
    pub fn history(&self, filter: &MovementFilter) -> Result<Vec<Movement>, InventoryError> {
        Ok(self.ledger.history(filter)?)
    }

    /// Full movement history for one key, in append order.
    pub fn history_for(&self, key: &StockKey) -> Result<Vec<Movement>, InventoryError> {
        Ok(self.ledger.for_key(key)?)
    }

    /// Whether the ledger replays to the record's on-hand quantity.
    ///
    /// A key with no record reconciles iff its ledger is also empty.
    pub fn is_reconciled(&self, key: &StockKey) -> Result<bool, InventoryError> {
        let replayed = self.ledger.replayed_quantity(key)?;
        let on_hand = self.record(key)?.map(|r| r.quantity()).unwrap_or(0);
        Ok(replayed == on_hand as i64)
    }
}

/// Reject zero quantities up front, before any lock is taken.
pub(crate) fn ensure_positive(qty: u64) -> Result<(), InventoryError> {
    if qty == 0 {
        return Err(InventoryError::InvalidQuantity(qty));
    }
    Ok(())
}
