//! Movement notifications for in-process subscribers.
//!
//! After a unit of work commits, the inventory core hands the movement to a
//! [`MovementPublisher`]. Publishing happens outside the row lock and a
//! publisher failure never fails the already-committed movement — the
//! ledger, not the notification stream, is the source of truth.

use std::fmt;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::movement::{Movement, MovementKind};

/// Event type published for every committed movement.
pub const MOVEMENT_RECORDED: &str = "movement.recorded";

/// The JSON payload published for a committed movement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MovementNotice {
    pub product_id: u64,
    pub warehouse_id: u64,
    pub kind: MovementKind,
    pub quantity: u64,
    pub quantity_before: u64,
    pub quantity_after: u64,
    pub reference_no: String,
}

impl From<&Movement> for MovementNotice {
    fn from(movement: &Movement) -> Self {
        MovementNotice {
            product_id: movement.key.product_id,
            warehouse_id: movement.key.warehouse_id,
            kind: movement.kind,
            quantity: movement.quantity,
            quantity_before: movement.quantity_before,
            quantity_after: movement.quantity_after,
            reference_no: movement.reference_no.clone(),
        }
    }
}

/// Error type for notification publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The publisher's sink rejected the notification.
    Sink(String),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::Sink(msg) => write!(f, "publish failed: {}", msg),
        }
    }
}

impl std::error::Error for PublishError {}

/// Trait for delivering committed-movement notifications.
pub trait MovementPublisher: Send {
    /// Publish an event with the given type and JSON payload bytes.
    fn publish(&mut self, event_type: &str, payload: &[u8]) -> Result<(), PublishError>;
}

/// A simple publisher that logs notifications to stdout or a buffer.
pub struct LogPublisher {
    buffer: Option<Arc<Mutex<Vec<String>>>>,
}

impl Default for LogPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl LogPublisher {
    pub fn new() -> Self {
        LogPublisher { buffer: None }
    }

    pub fn with_buffer(buffer: Arc<Mutex<Vec<String>>>) -> Self {
        LogPublisher {
            buffer: Some(buffer),
        }
    }
}

impl MovementPublisher for LogPublisher {
    fn publish(&mut self, event_type: &str, payload: &[u8]) -> Result<(), PublishError> {
        let payload_str = String::from_utf8_lossy(payload);
        let line = format!("[MOVEMENT] {} {}", event_type, payload_str);
        if let Some(buffer) = &self.buffer {
            let mut buffer = buffer
                .lock()
                .map_err(|_| PublishError::Sink("buffer poisoned".into()))?;
            buffer.push(line);
        } else {
            println!("{}", line);
        }
        Ok(())
    }
}

/// A publisher that emits notifications via an `EventEmitter` for
/// in-process subscribers.
#[cfg(feature = "emitter")]
pub struct LocalEmitterPublisher {
    emitter: crate::EventEmitter,
}

#[cfg(feature = "emitter")]
impl LocalEmitterPublisher {
    pub fn new(emitter: crate::EventEmitter) -> Self {
        LocalEmitterPublisher { emitter }
    }
}

#[cfg(feature = "emitter")]
impl MovementPublisher for LocalEmitterPublisher {
    fn publish(&mut self, event_type: &str, payload: &[u8]) -> Result<(), PublishError> {
        // The emitter wants a serializable value; ship the JSON as a string.
        let payload_str = String::from_utf8_lossy(payload).into_owned();
        self.emitter.emit(event_type, payload_str);
        Ok(())
    }
}
