use std::time::Duration;

/// How long a mutating operation may wait for a busy row.
///
/// The default is a bounded five-second wait: a timeout surfaces as a
/// transient error for the caller to retry, rather than parking the request
/// indefinitely behind a slow holder. `unbounded` restores plain blocking
/// for embedders that want queue-forever semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LockPolicy {
    wait_timeout: Option<Duration>,
}

pub(crate) const DEFAULT_WAIT: Duration = Duration::from_secs(5);

impl Default for LockPolicy {
    fn default() -> Self {
        LockPolicy {
            wait_timeout: Some(DEFAULT_WAIT),
        }
    }
}

impl LockPolicy {
    /// Bounded wait with the given timeout.
    pub fn bounded(timeout: Duration) -> Self {
        LockPolicy {
            wait_timeout: Some(timeout),
        }
    }

    /// Block until the holder releases, however long that takes.
    pub fn unbounded() -> Self {
        LockPolicy { wait_timeout: None }
    }

    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout
    }
}
