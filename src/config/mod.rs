//! Configuration module for markport
//!
//! This module handles user preferences for the preview and the exporters,
//! including serialization to JSON and persistent storage in the
//! platform-specific config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
