use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use super::kind::{Direction, MovementKind};
use crate::key::StockKey;

/// One entry in the movement ledger. Immutable once appended.
///
/// `quantity` is always the positive magnitude of the change; the direction
/// comes from the kind. `quantity_before`/`quantity_after` capture the
/// on-hand quantity around the movement so the ledger is auditable without
/// consulting the record it describes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    pub key: StockKey,
    pub kind: MovementKind,
    pub quantity: u64,
    pub quantity_before: u64,
    pub quantity_after: u64,
    pub reference_no: String,
    pub reason: String,
    pub actor_id: String,
    /// Per-key sequence number, assigned by the ledger on append.
    pub sequence: u64,
    pub recorded_at: SystemTime,
}

impl Movement {
    /// The delta this movement applied to on-hand quantity: positive for
    /// inbound kinds, negative for outbound kinds.
    pub fn signed_delta(&self) -> i64 {
        match self.kind.direction() {
            Direction::Inbound => self.quantity as i64,
            Direction::Outbound => -(self.quantity as i64),
        }
    }
}

/// The parts of a movement an operation knows before the unit of work runs.
///
/// Before/after quantities, the sequence number, and the timestamp are
/// stamped by the ledger core when the draft is committed.
#[derive(Clone, Debug)]
pub struct MovementDraft {
    pub kind: MovementKind,
    pub quantity: u64,
    pub reference_no: String,
    pub reason: String,
    pub actor_id: String,
}

impl MovementDraft {
    pub fn new(
        kind: MovementKind,
        quantity: u64,
        reference_no: impl Into<String>,
        reason: impl Into<String>,
        actor_id: impl Into<String>,
    ) -> Self {
        MovementDraft {
            kind,
            quantity,
            reference_no: reference_no.into(),
            reason: reason.into(),
            actor_id: actor_id.into(),
        }
    }

    /// Stamp the draft into a full ledger entry.
    pub(crate) fn into_movement(
        self,
        key: StockKey,
        quantity_before: u64,
        quantity_after: u64,
    ) -> Movement {
        Movement {
            key,
            kind: self.kind,
            quantity: self.quantity,
            quantity_before,
            quantity_after,
            reference_no: self.reference_no,
            reason: self.reason,
            actor_id: self.actor_id,
            sequence: 0, // assigned by the ledger on append
            recorded_at: SystemTime::now(),
        }
    }
}
