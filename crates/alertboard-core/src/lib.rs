//! # Alertboard
//!
//! Transient, timed notifications for user interfaces.
//!
//! Callers register a short message with a severity. The registry keeps it in
//! an ordered, observable list and drops it again after its timeout or when it
//! is dismissed.
//!
//! ## Architecture
//!
//! - **Registry**: the ordered alert list, id counter and expiry timers
//! - **Scheduler**: the "run this after a delay" seam, backed by tokio
//! - **TUI**: terminal dashboard that renders the list and reacts to changes
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//! use alertboard::prelude::*;
//!
//! # async fn demo() -> alertboard::Result<()> {
//! let registry = AlertRegistry::new(AlertsConfig::default())?;
//! let mut changes = registry.subscribe();
//!
//! let id = registry.show_success("Saved", "Draft stored", None);
//! registry.show_error("Upload failed", "Try again later", Some(Duration::ZERO));
//!
//! while let Ok(event) = changes.recv().await {
//!     println!("{event:?}: {} active", registry.len());
//! }
//! # let _ = id;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod tui;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::registry::AlertRegistry;

/// Re-exports for convenience
pub mod prelude {
    pub use crate::config::{AlertsConfig, Config};
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::registry::{AlertEvent, AlertRegistry, RemovalReason, Scheduler, TokioScheduler};
}
