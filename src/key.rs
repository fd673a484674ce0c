use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// Identity of one inventory row: a product at a warehouse.
///
/// Every mutating operation locks on this key, the record store keys rows
/// by it, and the movement ledger groups entries under it. Mutations to
/// different keys never contend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StockKey {
    pub product_id: u64,
    pub warehouse_id: u64,
}

impl StockKey {
    pub fn new(product_id: u64, warehouse_id: u64) -> Self {
        StockKey {
            product_id,
            warehouse_id,
        }
    }
}

impl fmt::Display for StockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.product_id, self.warehouse_id)
    }
}

impl FromStr for StockKey {
    type Err = InventoryError;

    /// Parse a `"product/warehouse"` pair, as produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (product, warehouse) = s
            .split_once('/')
            .ok_or_else(|| InventoryError::MalformedKey(s.to_string()))?;
        let product_id = product
            .parse()
            .map_err(|_| InventoryError::MalformedKey(s.to_string()))?;
        let warehouse_id = warehouse
            .parse()
            .map_err(|_| InventoryError::MalformedKey(s.to_string()))?;
        Ok(StockKey {
            product_id,
            warehouse_id,
        })
    }
}
