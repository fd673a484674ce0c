use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// Whether a movement adds to or removes from on-hand quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Inbound => write!(f, "in"),
            Direction::Outbound => write!(f, "out"),
        }
    }
}

impl FromStr for Direction {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" | "IN" => Ok(Direction::Inbound),
            "out" | "OUT" => Ok(Direction::Outbound),
            other => Err(InventoryError::UnknownDirection(other.to_string())),
        }
    }
}

/// The business meaning of a movement. Direction is implied by the kind.
///
/// Serialized names match `as_str` (`"purchase-receipt"`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MovementKind {
    /// First stocking of a product at a warehouse.
    InitialStock,
    /// Goods received against a purchase order.
    PurchaseReceipt,
    /// Manual stock-count correction, upward.
    AdjustmentIn,
    /// Stock arriving from another warehouse.
    TransferIn,
    /// Stock leaving to fulfill a sales order.
    SalesShipment,
    /// Manual stock-count correction, downward.
    AdjustmentOut,
    /// Stock leaving for another warehouse.
    TransferOut,
}

impl MovementKind {
    pub fn direction(&self) -> Direction {
        match self {
            MovementKind::InitialStock
            | MovementKind::PurchaseReceipt
            | MovementKind::AdjustmentIn
            | MovementKind::TransferIn => Direction::Inbound,
            MovementKind::SalesShipment
            | MovementKind::AdjustmentOut
            | MovementKind::TransferOut => Direction::Outbound,
        }
    }

    /// The adjustment kind for a manual stock-count correction.
    pub fn adjustment(direction: Direction) -> Self {
        match direction {
            Direction::Inbound => MovementKind::AdjustmentIn,
            Direction::Outbound => MovementKind::AdjustmentOut,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::InitialStock => "initial-stock",
            MovementKind::PurchaseReceipt => "purchase-receipt",
            MovementKind::AdjustmentIn => "adjustment-in",
            MovementKind::TransferIn => "transfer-in",
            MovementKind::SalesShipment => "sales-shipment",
            MovementKind::AdjustmentOut => "adjustment-out",
            MovementKind::TransferOut => "transfer-out",
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MovementKind {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial-stock" => Ok(MovementKind::InitialStock),
            "purchase-receipt" => Ok(MovementKind::PurchaseReceipt),
            "adjustment-in" => Ok(MovementKind::AdjustmentIn),
            "transfer-in" => Ok(MovementKind::TransferIn),
            "sales-shipment" => Ok(MovementKind::SalesShipment),
            "adjustment-out" => Ok(MovementKind::AdjustmentOut),
            "transfer-out" => Ok(MovementKind::TransferOut),
            other => Err(InventoryError::UnknownKind(other.to_string())),
        }
    }
}
