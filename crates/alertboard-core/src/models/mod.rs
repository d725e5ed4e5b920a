//! Data models for Alertboard

mod alert;

pub use alert::*;
