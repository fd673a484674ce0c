//! Movement ledger — append-only history of every quantity change.
//!
//! The ledger is the system's source of historical truth: the record store
//! holds a materialized sum that must always be reconcilable by replaying
//! the ledger from zero. Entries are never updated or deleted; neither the
//! [`MovementLog`] trait nor the in-memory implementation has a surface for
//! doing so.

mod error;
mod in_memory;
mod log;
mod snapshot;

pub use error::LedgerError;
pub use in_memory::InMemoryMovementLog;
pub use log::{MovementFilter, MovementLog};
pub use snapshot::{restore, snapshot};
