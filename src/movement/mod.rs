//! Movement types — what a ledger entry records.
//!
//! A [`Movement`] is the immutable record of one on-hand quantity change.
//! Its [`MovementKind`] implies the [`Direction`]; the quantity is always a
//! positive magnitude. Reservations are allocations, not movements, and
//! never appear in the ledger.

mod kind;
mod record;

pub use kind::{Direction, MovementKind};
pub use record::{Movement, MovementDraft};
