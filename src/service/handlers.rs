//! The standard inventory command set.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Deserialize;
use serde_json::{json, Value};

use crate::inventory::{AdjustmentProcessor, Inventory, ReservationManager};
use crate::key::StockKey;
use crate::ledger::{MovementFilter, MovementLog};
use crate::lock::LockManager;
use crate::movement::{Direction, Movement, MovementKind};
use crate::record::StockRecord;
use crate::store::RecordStore;

use super::context::Context;
use super::error::HandlerError;
use super::service::Service;

/// Shared dependencies for the inventory command set.
pub struct InventoryDeps<S, G, L>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    pub inventory: Arc<Inventory<S, G, L>>,
    pub reservations: ReservationManager<S, G, L>,
    pub adjustments: AdjustmentProcessor<S, G, L>,
}

impl<S, G, L> InventoryDeps<S, G, L>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    pub fn new(inventory: Arc<Inventory<S, G, L>>) -> Self {
        InventoryDeps {
            reservations: ReservationManager::new(inventory.clone()),
            adjustments: AdjustmentProcessor::new(inventory.clone()),
            inventory,
        }
    }
}

#[derive(Deserialize)]
struct QuantityInput {
    product_id: u64,
    warehouse_id: u64,
    quantity: u64,
}

impl QuantityInput {
    fn key(&self) -> StockKey {
        StockKey::new(self.product_id, self.warehouse_id)
    }
}

#[derive(Deserialize)]
struct ShipInput {
    product_id: u64,
    warehouse_id: u64,
    quantity: u64,
    reference_no: String,
}

#[derive(Deserialize)]
struct AdjustInput {
    product_id: u64,
    warehouse_id: u64,
    direction: String,
    quantity: u64,
    reason: String,
    reference_no: String,
}

#[derive(Deserialize)]
struct MoveInput {
    product_id: u64,
    warehouse_id: u64,
    kind: String,
    quantity: u64,
    reference_no: String,
    #[serde(default)]
    reason: String,
}

#[derive(Deserialize)]
struct LevelInput {
    product_id: u64,
    warehouse_id: u64,
}

#[derive(Deserialize)]
struct LowStockInput {
    threshold: u64,
}

#[derive(Deserialize)]
struct TotalsInput {
    product_id: u64,
}

#[derive(Deserialize)]
struct HistoryInput {
    #[serde(default)]
    product_id: Option<u64>,
    #[serde(default)]
    warehouse_id: Option<u64>,
    #[serde(default)]
    reference_no: Option<String>,
    /// Inclusive bounds in seconds since the Unix epoch.
    #[serde(default)]
    from_epoch_secs: Option<u64>,
    #[serde(default)]
    to_epoch_secs: Option<u64>,
}

impl HistoryInput {
    fn filter(&self) -> MovementFilter {
        let mut filter = MovementFilter::new();
        if let Some(product_id) = self.product_id {
            filter = filter.product(product_id);
        }
        if let Some(warehouse_id) = self.warehouse_id {
            filter = filter.warehouse(warehouse_id);
        }
        if let Some(reference_no) = &self.reference_no {
            filter = filter.reference(reference_no.clone());
        }
        if let Some(from) = self.from_epoch_secs {
            filter = filter.from(UNIX_EPOCH + Duration::from_secs(from));
        }
        if let Some(to) = self.to_epoch_secs {
            filter = filter.to(UNIX_EPOCH + Duration::from_secs(to));
        }
        filter
    }
}

fn epoch_secs(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs()
}

fn record_json(record: &StockRecord) -> Value {
    json!({
        "product_id": record.key().product_id,
        "warehouse_id": record.key().warehouse_id,
        "quantity": record.quantity(),
        "reserved": record.reserved(),
        "available": record.available(),
        "last_movement_epoch_secs": record.last_movement_at().map(epoch_secs),
    })
}

fn movement_json(movement: &Movement) -> Value {
    json!({
        "product_id": movement.key.product_id,
        "warehouse_id": movement.key.warehouse_id,
        "kind": movement.kind.as_str(),
        "quantity": movement.quantity,
        "quantity_before": movement.quantity_before,
        "quantity_after": movement.quantity_after,
        "reference_no": movement.reference_no,
        "reason": movement.reason,
        "actor_id": movement.actor_id,
        "sequence": movement.sequence,
        "recorded_at_epoch_secs": epoch_secs(movement.recorded_at),
    })
}

type Deps<S, G, L> = InventoryDeps<S, G, L>;

/// Build the standard inventory service over an inventory core.
///
/// Mutating ledger commands (`stock.ship`, `stock.adjust`, `stock.move`)
/// require an actor id in the session; reservation commands and queries do
/// not.
pub fn inventory_service<S, G, L>(
    inventory: Arc<Inventory<S, G, L>>,
) -> Service<InventoryDeps<S, G, L>>
where
    S: RecordStore + 'static,
    G: MovementLog + 'static,
    L: LockManager + 'static,
{
    Service::new(InventoryDeps::new(inventory))
        .command("stock.reserve", reserve)
        .command("stock.release", release)
        .command("stock.ship", ship)
        .command("stock.adjust", adjust)
        .command("stock.move", execute_movement)
        .command("stock.level", level)
        .command("stock.low", low_stock)
        .command("stock.totals", totals)
        .command("stock.history", history)
}

fn reserve<S, G, L>(ctx: &Context<Deps<S, G, L>>) -> Result<Value, HandlerError>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    let input: QuantityInput = ctx.input()?;
    let record = ctx
        .deps()
        .reservations
        .reserve(input.key(), input.quantity)?;
    Ok(record_json(&record))
}

fn release<S, G, L>(ctx: &Context<Deps<S, G, L>>) -> Result<Value, HandlerError>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    let input: QuantityInput = ctx.input()?;
    let record = ctx
        .deps()
        .reservations
        .release(input.key(), input.quantity)?;
    Ok(record_json(&record))
}

fn ship<S, G, L>(ctx: &Context<Deps<S, G, L>>) -> Result<Value, HandlerError>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    let actor_id = ctx.actor_id()?.to_string();
    let input: ShipInput = ctx.input()?;
    let movement = ctx.deps().reservations.confirm_shipment(
        StockKey::new(input.product_id, input.warehouse_id),
        input.quantity,
        input.reference_no,
        actor_id,
    )?;
    Ok(movement_json(&movement))
}

fn adjust<S, G, L>(ctx: &Context<Deps<S, G, L>>) -> Result<Value, HandlerError>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    let actor_id = ctx.actor_id()?.to_string();
    let input: AdjustInput = ctx.input()?;
    let direction: Direction = input.direction.parse().map_err(HandlerError::from)?;
    let movement = ctx.deps().adjustments.adjust(
        StockKey::new(input.product_id, input.warehouse_id),
        direction,
        input.quantity,
        input.reason,
        input.reference_no,
        actor_id,
    )?;
    Ok(movement_json(&movement))
}

fn execute_movement<S, G, L>(ctx: &Context<Deps<S, G, L>>) -> Result<Value, HandlerError>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    let actor_id = ctx.actor_id()?.to_string();
    let input: MoveInput = ctx.input()?;
    let kind: MovementKind = input.kind.parse().map_err(HandlerError::from)?;
    let movement = ctx.deps().adjustments.execute(
        StockKey::new(input.product_id, input.warehouse_id),
        kind,
        input.quantity,
        input.reference_no,
        input.reason,
        actor_id,
    )?;
    Ok(movement_json(&movement))
}

fn level<S, G, L>(ctx: &Context<Deps<S, G, L>>) -> Result<Value, HandlerError>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    let input: LevelInput = ctx.input()?;
    let record = ctx
        .deps()
        .inventory
        .expect_record(&StockKey::new(input.product_id, input.warehouse_id))?;
    Ok(record_json(&record))
}

fn low_stock<S, G, L>(ctx: &Context<Deps<S, G, L>>) -> Result<Value, HandlerError>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    let input: LowStockInput = ctx.input()?;
    let records = ctx.deps().inventory.low_stock(input.threshold)?;
    Ok(json!({
        "records": records.iter().map(record_json).collect::<Vec<_>>(),
    }))
}

fn totals<S, G, L>(ctx: &Context<Deps<S, G, L>>) -> Result<Value, HandlerError>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    let input: TotalsInput = ctx.input()?;
    let inventory = &ctx.deps().inventory;
    Ok(json!({
        "product_id": input.product_id,
        "on_hand": inventory.total_on_hand(input.product_id)?,
        "available": inventory.total_available(input.product_id)?,
    }))
}

fn history<S, G, L>(ctx: &Context<Deps<S, G, L>>) -> Result<Value, HandlerError>
where
    S: RecordStore,
    G: MovementLog,
    L: LockManager,
{
    let input: HistoryInput = ctx.input()?;
    let movements = ctx.deps().inventory.history(&input.filter())?;
    Ok(json!({
        "movements": movements.iter().map(movement_json).collect::<Vec<_>>(),
    }))
}
