use std::sync::Arc;

use crate::error::InventoryError;
use crate::key::StockKey;
use crate::ledger::{InMemoryMovementLog, MovementLog};
use crate::lock::{InMemoryLockManager, LockManager};
use crate::movement::{Movement, MovementDraft, MovementKind};
use crate::record::StockRecord;
use crate::store::{InMemoryRecordStore, RecordStore};

use super::{ensure_positive, Inventory};

/// Reservation semantics over the inventory core.
///
/// Reserve and release move stock between the available and reserved pools
/// without changing on-hand quantity — they are allocations, not movements,
/// and write no ledger entry. Confirming a shipment is the movement: it
/// removes on-hand stock, consumes the reservation, and lands in the
/// ledger.
pub struct ReservationManager<S = InMemoryRecordStore, G = InMemoryMovementLog, L = InMemoryLockManager>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    inventory: Arc<Inventory<S, G, L>>,
}

impl<S, G, L> ReservationManager<S, G, L>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    pub fn new(inventory: Arc<Inventory<S, G, L>>) -> Self {
        ReservationManager { inventory }
    }

    /// Allocate `qty` units to an open order.
    ///
    /// Fails with `InsufficientAvailableStock` when the available pool
    /// (on-hand minus reserved) cannot cover the request; the record is
    /// untouched in that case.
    pub fn reserve(&self, key: StockKey, qty: u64) -> Result<StockRecord, InventoryError> {
        ensure_positive(qty)?;
        self.inventory.allocate("reserve", key, |record| record.reserve(qty))
    }

    /// Return `qty` units of reservation to the available pool.
    ///
    /// Over-release is permitted and floors at zero — callers own their
    /// reservation bookkeeping.
    pub fn release(&self, key: StockKey, qty: u64) -> Result<StockRecord, InventoryError> {
        ensure_positive(qty)?;
        self.inventory.allocate("release", key, |record| {
            record.release(qty);
            Ok(())
        })
    }

    /// Ship `qty` units against an order, recording a sales-shipment
    /// movement.
    ///
    /// Requires on-hand coverage (`InsufficientStock` otherwise) but not a
    /// matching reservation: un-reserved stock may ship, and whatever
    /// reservation exists is consumed first so the record invariant holds.
    pub fn confirm_shipment(
        &self,
        key: StockKey,
        qty: u64,
        reference_no: impl Into<String>,
        actor_id: impl Into<String>,
    ) -> Result<Movement, InventoryError> {
        ensure_positive(qty)?;
        let draft = MovementDraft::new(
            MovementKind::SalesShipment,
            qty,
            reference_no,
            "",
            actor_id,
        );
        self.inventory
            .move_stock("confirm_shipment", key, draft, |record| record.ship(qty))
    }
}
