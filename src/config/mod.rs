//! Configuration module for PrevueMD
//!
//! This module handles application settings and user preferences,
//! including serialization to/from JSON and persistent storage in
//! platform-specific directories.

mod persistence;
mod preferences;
mod settings;

pub use persistence::*;
pub use preferences::*;
pub use settings::*;
