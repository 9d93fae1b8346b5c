//! Schema module - Timeline data model, engine configuration and preferences.

mod config;
mod preferences;
mod step;

pub use config::*;
pub use preferences::*;
pub use step::*;
