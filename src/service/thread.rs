//! Background thread dispatching queued commands to a service.

use std::sync::mpsc::{channel, Sender as StopSender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::bus::{Listener, Message};

use super::service::Service;
use super::session::Session;

/// Statistics from a service thread's lifetime.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Messages dispatched successfully.
    pub handled: usize,
    /// Messages that failed decoding or dispatch.
    pub failed: usize,
    /// Poll cycles completed (including empty ones).
    pub polls: usize,
}

/// A background thread that listens on a named queue and dispatches each
/// message to a [`Service`].
///
/// Dispatch failures are counted and logged, never retried — the sender
/// owns retry policy, the same way synchronous callers do.
pub struct ServiceThread {
    stop_tx: StopSender<()>,
    handle: Option<JoinHandle<ServiceStats>>,
}

impl ServiceThread {
    /// Spawn a dispatcher for `queue_name`, polling with `poll_interval`.
    pub fn spawn<D, L>(
        service: Service<D>,
        queue_name: String,
        listener: L,
        poll_interval: Duration,
    ) -> Self
    where
        D: Send + Sync + 'static,
        L: Listener + 'static,
    {
        let (stop_tx, stop_rx) = channel();

        let handle = thread::spawn(move || {
            let mut stats = ServiceStats::default();
            let timeout_ms = poll_interval.as_millis() as u64;

            loop {
                match stop_rx.try_recv() {
                    Ok(()) | Err(TryRecvError::Disconnected) => break,
                    Err(TryRecvError::Empty) => {}
                }

                stats.polls += 1;
                match listener.listen(&queue_name, timeout_ms) {
                    Ok(Some(message)) => {
                        if Self::handle_message(&service, &message) {
                            stats.handled += 1;
                        } else {
                            stats.failed += 1;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!(queue = %queue_name, error = %e, "queue listen failed");
                        stats.failed += 1;
                    }
                }
            }

            stats
        });

        ServiceThread {
            stop_tx,
            handle: Some(handle),
        }
    }

    fn handle_message<D: Send + Sync + 'static>(service: &Service<D>, message: &Message) -> bool {
        let input = match message.payload_value() {
            Ok(input) => input,
            Err(e) => {
                tracing::warn!(id = %message.id, error = %e, "undecodable command payload");
                return false;
            }
        };

        let session = match &message.actor_id {
            Some(actor_id) => Session::for_actor(actor_id.clone()),
            None => Session::new(),
        };

        match service.dispatch(&message.command, input, session) {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!(id = %message.id, command = %message.command, error = %e,
                    "queued command failed");
                false
            }
        }
    }

    /// Signal the thread to stop and collect its statistics.
    pub fn stop(mut self) -> ServiceStats {
        let _ = self.stop_tx.send(());
        match self.handle.take() {
            Some(handle) => handle.join().unwrap_or_default(),
            None => ServiceStats::default(),
        }
    }
}
