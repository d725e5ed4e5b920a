//! Terminal User Interface for Alertboard
//!
//! Renders the alert registry as a live table and lets the user add, dismiss
//! and clear alerts from the keyboard.

mod app;
mod components;
mod event;
mod ui;

pub use app::App;
pub use event::{Event, EventHandler};
