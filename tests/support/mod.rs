#![allow(dead_code)]

use std::sync::Arc;

use stock_ledger::{
    AdjustmentProcessor, Inventory, MovementKind, ReservationManager, StockKey,
};

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

pub struct Fixture {
    pub inventory: Arc<Inventory>,
    pub reservations: ReservationManager,
    pub adjustments: AdjustmentProcessor,
}

/// An in-memory inventory with one key seeded to the given quantities.
pub fn seeded(key: StockKey, quantity: u64, reserved: u64) -> Fixture {
    init_tracing();
    let inventory = Arc::new(Inventory::in_memory());
    let adjustments = AdjustmentProcessor::new(inventory.clone());
    let reservations = ReservationManager::new(inventory.clone());

    if quantity > 0 {
        adjustments
            .execute(key, MovementKind::InitialStock, quantity, "SEED-1", "", "seed")
            .unwrap();
    }
    if reserved > 0 {
        reservations.reserve(key, reserved).unwrap();
    }

    Fixture {
        inventory,
        reservations,
        adjustments,
    }
}
