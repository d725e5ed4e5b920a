//! Deferred execution for alert expiry

use std::time::Duration;

use tokio::runtime::Handle;

use crate::error::{Error, Result};

/// A one-shot task run by a [`Scheduler`]
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs a callback once after a delay
///
/// There is no cancellation: a scheduled task always runs, so tasks must be
/// harmless if the state they refer to is gone.
pub trait Scheduler: Send + Sync {
    /// Run `task` after `delay` has elapsed
    fn schedule(&self, delay: Duration, task: Task);
}

/// Scheduler backed by tokio timers
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Create a scheduler on the given runtime
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Create a scheduler on the runtime of the calling context
    pub fn try_current() -> Result<Self> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| Error::Runtime(e.to_string()))
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}
