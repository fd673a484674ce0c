mod support;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use stock_ledger::service::{inventory_service, HandlerError, Session};
use stock_ledger::{Inventory, StockKey};
use support::init_tracing;

fn receive(
    service: &stock_ledger::service::Service<
        stock_ledger::service::InventoryDeps<
            stock_ledger::InMemoryRecordStore,
            stock_ledger::InMemoryMovementLog,
            stock_ledger::InMemoryLockManager,
        >,
    >,
    qty: u64,
) {
    service
        .dispatch(
            "stock.move",
            json!({
                "product_id": 7, "warehouse_id": 2,
                "kind": "purchase-receipt", "quantity": qty,
                "reference_no": "PO-1",
            }),
            Session::for_actor("purchasing"),
        )
        .unwrap();
}

#[test]
fn facade_covers_the_order_flow() {
    init_tracing();
    let inventory = Arc::new(Inventory::in_memory());
    let service = inventory_service(inventory.clone());
    receive(&service, 100);

    // Order placement reserves.
    let reserved = service
        .dispatch(
            "stock.reserve",
            json!({ "product_id": 7, "warehouse_id": 2, "quantity": 10 }),
            Session::new(),
        )
        .unwrap();
    assert_eq!(reserved["available"], 90);

    // Fulfillment ships against the order.
    let shipped = service
        .dispatch(
            "stock.ship",
            json!({
                "product_id": 7, "warehouse_id": 2,
                "quantity": 6, "reference_no": "SO-31",
            }),
            Session::for_actor("picker-2"),
        )
        .unwrap();
    assert_eq!(shipped["kind"], "sales-shipment");
    assert_eq!(shipped["quantity_after"], 94);
    assert_eq!(shipped["actor_id"], "picker-2");

    // Cancellation releases the rest.
    service
        .dispatch(
            "stock.release",
            json!({ "product_id": 7, "warehouse_id": 2, "quantity": 4 }),
            Session::new(),
        )
        .unwrap();

    let record = inventory.expect_record(&StockKey::new(7, 2)).unwrap();
    assert_eq!(record.quantity(), 94);
    assert_eq!(record.reserved(), 0);
    assert!(inventory.is_reconciled(&StockKey::new(7, 2)).unwrap());
}

#[test]
fn facade_surfaces_conflicts_and_bad_input() {
    init_tracing();
    let service = inventory_service(Arc::new(Inventory::in_memory()));
    receive(&service, 10);

    let conflict = service
        .dispatch(
            "stock.reserve",
            json!({ "product_id": 7, "warehouse_id": 2, "quantity": 11 }),
            Session::new(),
        )
        .unwrap_err();
    assert!(matches!(conflict, HandlerError::Conflict(_)));
    assert_eq!(conflict.status_code(), 409);

    let rejected = service
        .dispatch(
            "stock.reserve",
            json!({ "product_id": 7, "warehouse_id": 2, "quantity": 0 }),
            Session::new(),
        )
        .unwrap_err();
    assert!(matches!(rejected, HandlerError::Rejected(_)));

    let decode = service
        .dispatch(
            "stock.reserve",
            json!({ "product_id": "seven" }),
            Session::new(),
        )
        .unwrap_err();
    assert!(matches!(decode, HandlerError::DecodeFailed(_)));

    let unknown = service
        .dispatch("stock.teleport", json!({}), Session::new())
        .unwrap_err();
    assert_eq!(unknown.status_code(), 404);
}

#[test]
fn totals_and_low_stock_queries() {
    init_tracing();
    let inventory = Arc::new(Inventory::in_memory());
    let service = inventory_service(inventory);

    for (warehouse, qty) in [(1u64, 40u64), (2, 60)] {
        service
            .dispatch(
                "stock.move",
                json!({
                    "product_id": 7, "warehouse_id": warehouse,
                    "kind": "initial-stock", "quantity": qty,
                    "reference_no": "SEED",
                }),
                Session::for_actor("seed"),
            )
            .unwrap();
    }

    let totals = service
        .dispatch("stock.totals", json!({ "product_id": 7 }), Session::new())
        .unwrap();
    assert_eq!(totals["on_hand"], 100);
    assert_eq!(totals["available"], 100);

    let low = service
        .dispatch("stock.low", json!({ "threshold": 50 }), Session::new())
        .unwrap();
    let records = low["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["warehouse_id"], 1);
}

#[cfg(feature = "bus")]
mod queued {
    use super::*;
    use stock_ledger::bus::{InMemoryQueue, Message, Sender};
    use stock_ledger::service::ServiceThread;

    #[test]
    fn queued_commands_drive_the_inventory() {
        init_tracing();
        let inventory = Arc::new(Inventory::in_memory());
        let service = inventory_service(inventory.clone());
        let queue = InMemoryQueue::new();

        // Purchasing and order placement enqueue their commands.
        queue
            .send(
                "inventory",
                Message::encode(
                    "cmd-1",
                    "stock.move",
                    &json!({
                        "product_id": 7, "warehouse_id": 2,
                        "kind": "purchase-receipt", "quantity": 50,
                        "reference_no": "PO-9",
                    }),
                )
                .unwrap()
                .with_actor("purchasing"),
            )
            .unwrap();
        queue
            .send(
                "inventory",
                Message::encode(
                    "cmd-2",
                    "stock.reserve",
                    &json!({ "product_id": 7, "warehouse_id": 2, "quantity": 20 }),
                )
                .unwrap(),
            )
            .unwrap();
        // A ship without an actor fails dispatch and is counted, not retried.
        queue
            .send(
                "inventory",
                Message::encode(
                    "cmd-3",
                    "stock.ship",
                    &json!({
                        "product_id": 7, "warehouse_id": 2,
                        "quantity": 5, "reference_no": "SO-1",
                    }),
                )
                .unwrap(),
            )
            .unwrap();

        let worker = ServiceThread::spawn(
            service,
            "inventory".to_string(),
            queue.clone(),
            Duration::from_millis(10),
        );

        // Wait for the queue to drain, then stop the worker.
        let mut waited = 0;
        while queue.depth("inventory").unwrap() > 0 && waited < 200 {
            std::thread::sleep(Duration::from_millis(10));
            waited += 1;
        }
        std::thread::sleep(Duration::from_millis(50));
        let stats = worker.stop();

        assert_eq!(stats.handled, 2);
        assert_eq!(stats.failed, 1);

        let record = inventory.expect_record(&StockKey::new(7, 2)).unwrap();
        assert_eq!(record.quantity(), 50);
        assert_eq!(record.reserved(), 20);
    }
}

#[cfg(feature = "emitter")]
mod emitted {
    use super::*;
    use std::sync::mpsc;
    use stock_ledger::notify::{LocalEmitterPublisher, MOVEMENT_RECORDED};
    use stock_ledger::service::inventory_service;
    use stock_ledger::EventEmitter;

    #[test]
    fn subscribers_hear_committed_movements() {
        init_tracing();
        let (tx, rx) = mpsc::channel::<String>();

        let mut emitter = EventEmitter::new();
        emitter.on(MOVEMENT_RECORDED, move |payload: String| {
            tx.send(payload).unwrap();
        });

        let inventory = Arc::new(
            Inventory::in_memory()
                .with_publisher(Box::new(LocalEmitterPublisher::new(emitter))),
        );
        let service = inventory_service(inventory);

        service
            .dispatch(
                "stock.move",
                json!({
                    "product_id": 7, "warehouse_id": 2,
                    "kind": "purchase-receipt", "quantity": 25,
                    "reference_no": "PO-44",
                }),
                Session::for_actor("purchasing"),
            )
            .unwrap();

        // Reservations are not movements; no second notification.
        service
            .dispatch(
                "stock.reserve",
                json!({ "product_id": 7, "warehouse_id": 2, "quantity": 5 }),
                Session::new(),
            )
            .unwrap();

        let payload = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(payload.contains("purchase-receipt"));
        assert!(payload.contains("PO-44"));
        // Nothing else arrives for the reservation.
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    }
}
