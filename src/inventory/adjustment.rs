use std::sync::Arc;

use crate::error::InventoryError;
use crate::key::StockKey;
use crate::ledger::{InMemoryMovementLog, MovementLog};
use crate::lock::{InMemoryLockManager, LockManager};
use crate::movement::{Direction, Movement, MovementDraft, MovementKind};
use crate::store::{InMemoryRecordStore, RecordStore};

use super::{ensure_positive, Inventory};

/// Movement execution over the inventory core.
///
/// `adjust` is the manual stock-count entry point; `execute` is the
/// generalized one used by purchasing and sales modules. Both run the full
/// locked unit of work and append exactly one ledger entry on success.
pub struct AdjustmentProcessor<S = InMemoryRecordStore, G = InMemoryMovementLog, L = InMemoryLockManager>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    inventory: Arc<Inventory<S, G, L>>,
}

impl<S, G, L> AdjustmentProcessor<S, G, L>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    pub fn new(inventory: Arc<Inventory<S, G, L>>) -> Self {
        AdjustmentProcessor { inventory }
    }

    /// Apply a manual stock-count correction in the given direction.
    pub fn adjust(
        &self,
        key: StockKey,
        direction: Direction,
        qty: u64,
        reason: impl Into<String>,
        reference_no: impl Into<String>,
        actor_id: impl Into<String>,
    ) -> Result<Movement, InventoryError> {
        self.execute(
            key,
            MovementKind::adjustment(direction),
            qty,
            reference_no,
            reason,
            actor_id,
        )
    }

    /// Execute a movement of any kind.
    ///
    /// The kind's direction picks increment or decrement; outbound kinds
    /// fail with `InsufficientStock` when on-hand cannot cover the
    /// quantity, and nothing is persisted in that case. The record is
    /// created at zero on first movement for its key.
    pub fn execute(
        &self,
        key: StockKey,
        kind: MovementKind,
        qty: u64,
        reference_no: impl Into<String>,
        reason: impl Into<String>,
        actor_id: impl Into<String>,
    ) -> Result<Movement, InventoryError> {
        ensure_positive(qty)?;
        let draft = MovementDraft::new(kind, qty, reference_no, reason, actor_id);
        self.inventory
            .move_stock("execute_movement", key, draft, move |record| {
                match kind.direction() {
                    Direction::Inbound => {
                        record.receive(qty);
                        Ok(())
                    }
                    // Shipments consume the reservation; other outbound
                    // kinds clamp it to the remaining on-hand quantity.
                    Direction::Outbound if kind == MovementKind::SalesShipment => {
                        record.ship(qty)
                    }
                    Direction::Outbound => record.withdraw(qty),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Arc<Inventory>, AdjustmentProcessor, StockKey) {
        let inventory = Arc::new(Inventory::in_memory());
        let adjustments = AdjustmentProcessor::new(inventory.clone());
        (inventory.clone(), adjustments, StockKey::new(7, 2))
    }

    #[test]
    fn adjust_in_appends_ledger_entry() {
        let (inventory, adjustments, key) = setup();
        adjustments
            .execute(key, MovementKind::InitialStock, 100, "INIT-1", "", "seed")
            .unwrap();

        let movement = adjustments
            .adjust(key, Direction::Inbound, 50, "count correction", "COUNT-9", "clerk-1")
            .unwrap();

        assert_eq!(movement.kind, MovementKind::AdjustmentIn);
        assert_eq!(movement.quantity_before, 100);
        assert_eq!(movement.quantity_after, 150);
        assert_eq!(movement.reason, "count correction");
        assert_eq!(inventory.on_hand(&key).unwrap(), 150);
    }

    #[test]
    fn adjust_out_beyond_on_hand_rejected_without_ledger_entry() {
        let (inventory, adjustments, key) = setup();
        adjustments
            .execute(key, MovementKind::InitialStock, 100, "INIT-1", "", "seed")
            .unwrap();

        let err = adjustments
            .adjust(key, Direction::Outbound, 200, "shrinkage", "COUNT-10", "clerk-1")
            .unwrap_err();
        assert_eq!(
            err,
            InventoryError::InsufficientStock {
                key,
                requested: 200,
                on_hand: 100,
            }
        );
        assert_eq!(inventory.on_hand(&key).unwrap(), 100);
        assert_eq!(inventory.history_for(&key).unwrap().len(), 1);
    }

    #[test]
    fn first_movement_creates_record_at_zero_then_applies() {
        let (inventory, adjustments, key) = setup();
        assert_eq!(inventory.record(&key).unwrap(), None);

        let movement = adjustments
            .execute(key, MovementKind::PurchaseReceipt, 20, "PO-77", "", "buyer-3")
            .unwrap();

        assert_eq!(movement.quantity_before, 0);
        assert_eq!(movement.quantity_after, 20);
        assert_eq!(movement.sequence, 1);
        assert_eq!(inventory.on_hand(&key).unwrap(), 20);
        assert!(inventory.is_reconciled(&key).unwrap());
    }

    #[test]
    fn transfer_pair_moves_stock_between_warehouses() {
        let (inventory, adjustments, _) = setup();
        let from = StockKey::new(7, 1);
        let to = StockKey::new(7, 2);
        adjustments
            .execute(from, MovementKind::InitialStock, 30, "INIT-1", "", "seed")
            .unwrap();

        adjustments
            .execute(from, MovementKind::TransferOut, 10, "XFER-5", "rebalance", "ops")
            .unwrap();
        adjustments
            .execute(to, MovementKind::TransferIn, 10, "XFER-5", "rebalance", "ops")
            .unwrap();

        assert_eq!(inventory.on_hand(&from).unwrap(), 20);
        assert_eq!(inventory.on_hand(&to).unwrap(), 10);
        assert_eq!(inventory.total_on_hand(7).unwrap(), 30);
    }

    #[test]
    fn outbound_execute_clamps_reservation() {
        use crate::inventory::ReservationManager;

        let (inventory, adjustments, key) = setup();
        adjustments
            .execute(key, MovementKind::InitialStock, 100, "INIT-1", "", "seed")
            .unwrap();
        ReservationManager::new(inventory.clone())
            .reserve(key, 60)
            .unwrap();

        adjustments
            .adjust(key, Direction::Outbound, 80, "damage", "COUNT-11", "clerk-2")
            .unwrap();

        let record = inventory.expect_record(&key).unwrap();
        assert_eq!(record.quantity(), 20);
        assert_eq!(record.reserved(), 20);
    }

    #[test]
    fn zero_quantity_rejected_before_locking() {
        let (_, adjustments, key) = setup();
        assert_eq!(
            adjustments
                .execute(key, MovementKind::PurchaseReceipt, 0, "PO-0", "", "x")
                .unwrap_err(),
            InventoryError::InvalidQuantity(0)
        );
    }
}
