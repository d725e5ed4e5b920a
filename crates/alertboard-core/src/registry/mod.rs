//! Alert registry
//!
//! The registry owns the ordered list of active alerts. Alerts are appended on
//! registration and leave the list when dismissed, when their expiry timer
//! fires, or when the list is cleared. Consumers observe changes through
//! [`AlertRegistry::subscribe`] and re-read [`AlertRegistry::alerts`].

mod scheduler;

pub use scheduler::{Scheduler, Task, TokioScheduler};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use crate::config::AlertsConfig;
use crate::error::Result;
use crate::models::{Alert, AlertId, AlertKind};

/// Why an alert left the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalReason {
    /// Removed by an explicit call
    Dismissed,
    /// Removed by its expiry timer
    Expired,
}

/// Change notification delivered to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AlertEvent {
    /// An alert was appended
    Added(Alert),
    /// An alert was removed
    Removed {
        /// Id of the removed alert
        id: AlertId,
        /// What removed it
        reason: RemovalReason,
    },
    /// The whole list was emptied
    Cleared {
        /// Number of alerts dropped
        count: usize,
    },
}

struct Inner {
    config: AlertsConfig,
    alerts: RwLock<Vec<Alert>>,
    counter: AtomicU64,
    events: broadcast::Sender<AlertEvent>,
    scheduler: Arc<dyn Scheduler>,
}

impl Inner {
    fn remove(&self, id: &AlertId, reason: RemovalReason) -> bool {
        let mut alerts = self.alerts.write();
        let Some(index) = alerts.iter().position(|a| &a.id == id) else {
            trace!(alert_id = %id, ?reason, "Alert already gone");
            return false;
        };

        alerts.remove(index);
        self.notify(AlertEvent::Removed {
            id: id.clone(),
            reason,
        });
        drop(alerts);

        debug!(alert_id = %id, ?reason, "Alert removed");
        true
    }

    /// Send while the write lock is held so events arrive in list order.
    fn notify(&self, event: AlertEvent) {
        // No subscribers is not an error.
        let _ = self.events.send(event);
    }
}

/// Shared handle to the alert registry
///
/// Cloning is cheap; all clones see the same list.
#[derive(Clone)]
pub struct AlertRegistry {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for AlertRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertRegistry")
            .field("config", &self.inner.config)
            .field("alerts", &*self.inner.alerts.read())
            .field("counter", &self.inner.counter.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl AlertRegistry {
    /// Create a registry whose expiry timers run on the current tokio runtime
    pub fn new(config: AlertsConfig) -> Result<Self> {
        let scheduler = TokioScheduler::try_current()?;
        Ok(Self::with_scheduler(config, Arc::new(scheduler)))
    }

    /// Create a registry with a custom scheduler
    pub fn with_scheduler(config: AlertsConfig, scheduler: Arc<dyn Scheduler>) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));

        Self {
            inner: Arc::new(Inner {
                config,
                alerts: RwLock::new(Vec::new()),
                counter: AtomicU64::new(0),
                events,
                scheduler,
            }),
        }
    }

    /// Register a new alert and return its id
    ///
    /// `timeout` of `None` uses the configured default; a zero timeout keeps
    /// the alert until it is removed explicitly. Otherwise the alert is removed
    /// automatically once the timeout elapses.
    pub fn add(
        &self,
        kind: AlertKind,
        title: impl Into<String>,
        text: impl Into<String>,
        timeout: Option<Duration>,
    ) -> AlertId {
        let timeout = timeout.unwrap_or_else(|| self.inner.config.default_timeout());
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        let title = title.into();
        let text = text.into();

        // Minting and pushing under one lock keeps id order, list order and
        // event order identical.
        let id = {
            let mut alerts = self.inner.alerts.write();
            let n = self.inner.counter.fetch_add(1, Ordering::Relaxed) + 1;
            let alert = Alert {
                id: AlertId::from_sequence(n),
                kind,
                title,
                text,
                timeout: timeout_ms,
            };
            let id = alert.id.clone();
            alerts.push(alert.clone());
            self.inner.notify(AlertEvent::Added(alert));
            id
        };

        debug!(alert_id = %id, %kind, timeout_ms, "Alert added");

        if timeout_ms > 0 {
            let weak: Weak<Inner> = Arc::downgrade(&self.inner);
            let expired = id.clone();
            self.inner.scheduler.schedule(
                Duration::from_millis(timeout_ms),
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        trace!(alert_id = %expired, "Expiry timer fired");
                        inner.remove(&expired, RemovalReason::Expired);
                    }
                }),
            );
        }

        id
    }

    /// Remove an alert by id
    ///
    /// Removing an id that is not present does nothing. Returns whether an
    /// alert was removed.
    pub fn remove(&self, id: &AlertId) -> bool {
        self.inner.remove(id, RemovalReason::Dismissed)
    }

    /// Remove every alert
    ///
    /// Pending expiry timers are left running and do nothing when they fire.
    pub fn clear(&self) {
        let mut alerts = self.inner.alerts.write();
        let count = alerts.len();
        if count == 0 {
            return;
        }

        alerts.clear();
        self.inner.notify(AlertEvent::Cleared { count });
        drop(alerts);

        debug!(count, "Alerts cleared");
    }

    /// Register a success alert
    pub fn show_success(
        &self,
        title: impl Into<String>,
        text: impl Into<String>,
        timeout: Option<Duration>,
    ) -> AlertId {
        self.add(AlertKind::Success, title, text, timeout)
    }

    /// Register an error alert
    pub fn show_error(
        &self,
        title: impl Into<String>,
        text: impl Into<String>,
        timeout: Option<Duration>,
    ) -> AlertId {
        self.add(AlertKind::Error, title, text, timeout)
    }

    /// Register a warning alert
    pub fn show_warning(
        &self,
        title: impl Into<String>,
        text: impl Into<String>,
        timeout: Option<Duration>,
    ) -> AlertId {
        self.add(AlertKind::Warning, title, text, timeout)
    }

    /// Register an info alert
    pub fn show_info(
        &self,
        title: impl Into<String>,
        text: impl Into<String>,
        timeout: Option<Duration>,
    ) -> AlertId {
        self.add(AlertKind::Info, title, text, timeout)
    }

    /// Snapshot of the active alerts in display order
    pub fn alerts(&self) -> Vec<Alert> {
        self.inner.alerts.read().clone()
    }

    /// Look up an active alert
    pub fn get(&self, id: &AlertId) -> Option<Alert> {
        self.inner.alerts.read().iter().find(|a| &a.id == id).cloned()
    }

    /// Number of active alerts
    pub fn len(&self) -> usize {
        self.inner.alerts.read().len()
    }

    /// Whether there are no active alerts
    pub fn is_empty(&self) -> bool {
        self.inner.alerts.read().is_empty()
    }

    /// Subscribe to change notifications
    ///
    /// A receiver that falls behind gets `RecvError::Lagged`; re-reading
    /// [`alerts`](Self::alerts) brings it back in sync.
    pub fn subscribe(&self) -> broadcast::Receiver<AlertEvent> {
        self.inner.events.subscribe()
    }

    /// Registry configuration
    pub fn config(&self) -> &AlertsConfig {
        &self.inner.config
    }
}

#[cfg(test)]
mod tests;
