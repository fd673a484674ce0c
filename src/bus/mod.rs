//! Command queue — point-to-point messaging into the facade.
//!
//! Order placement and purchasing modules hand commands to the inventory
//! subsystem through a named queue instead of calling it synchronously.
//! Each message is consumed by exactly one listener (competing consumers).
//! The in-memory queue covers tests and single-process deployments; a
//! broker-backed deployment implements [`Sender`] and [`Listener`] against
//! its own transport.

mod message;
mod queue;

pub use message::Message;
pub use queue::{InMemoryQueue, Listener, QueueError, Sender};
