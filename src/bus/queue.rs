use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use super::message::Message;

/// Error type for queue operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The queue's internal lock was poisoned.
    Poisoned(String),
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueueError::Poisoned(msg) => write!(f, "queue lock poisoned: {}", msg),
        }
    }
}

impl std::error::Error for QueueError {}

/// Trait for sending messages to a named queue (point-to-point).
pub trait Sender: Send + Sync {
    fn send(&self, queue: &str, message: Message) -> Result<(), QueueError>;
}

/// Trait for listening on a named queue (point-to-point).
///
/// Listeners on the same queue compete — each message is delivered to
/// exactly one of them.
pub trait Listener: Send + Sync {
    /// Take the next message off the queue, blocking up to `timeout_ms`.
    fn listen(&self, queue: &str, timeout_ms: u64) -> Result<Option<Message>, QueueError>;
}

/// In-memory named queues for tests and single-process deployments.
///
/// Clone-friendly via Arc: clones share the same queues, so one clone can
/// send while another listens from a different thread.
#[derive(Clone)]
pub struct InMemoryQueue {
    inner: Arc<QueueInner>,
}

struct QueueInner {
    queues: Mutex<HashMap<String, VecDeque<Message>>>,
    arrival: Condvar,
}

impl Default for InMemoryQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(QueueInner {
                queues: Mutex::new(HashMap::new()),
                arrival: Condvar::new(),
            }),
        }
    }

    /// Number of messages waiting on a queue.
    pub fn depth(&self, queue: &str) -> Result<usize, QueueError> {
        let queues = self
            .inner
            .queues
            .lock()
            .map_err(|e| QueueError::Poisoned(e.to_string()))?;
        Ok(queues.get(queue).map(VecDeque::len).unwrap_or(0))
    }
}

impl Sender for InMemoryQueue {
    fn send(&self, queue: &str, message: Message) -> Result<(), QueueError> {
        let mut queues = self
            .inner
            .queues
            .lock()
            .map_err(|e| QueueError::Poisoned(e.to_string()))?;
        queues
            .entry(queue.to_string())
            .or_default()
            .push_back(message);
        self.inner.arrival.notify_all();
        Ok(())
    }
}

impl Listener for InMemoryQueue {
    fn listen(&self, queue: &str, timeout_ms: u64) -> Result<Option<Message>, QueueError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        let mut queues = self
            .inner
            .queues
            .lock()
            .map_err(|e| QueueError::Poisoned(e.to_string()))?;

        loop {
            if let Some(message) = queues.get_mut(queue).and_then(VecDeque::pop_front) {
                return Ok(Some(message));
            }
            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            let (guard, _) = self
                .inner
                .arrival
                .wait_timeout(queues, deadline - now)
                .map_err(|e| QueueError::Poisoned(e.to_string()))?;
            queues = guard;
        }
    }
}
