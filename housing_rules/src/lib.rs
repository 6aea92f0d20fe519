//! # Housing Rules
//!
//! The rule book for NPC housing - contains NPC preference records, the affinity scale and
//! its price multipliers, the preference dataset, and the house layout that players edit.
//! This crate owns data and layout mutations only; price computation lives in `happiness_core`.

pub mod config;
pub mod dataset;
pub mod entities;
pub mod error;
pub mod layout;
pub mod mechanics;

pub use config::*;
pub use dataset::*;
pub use entities::*;
pub use error::*;
pub use layout::*;
pub use mechanics::*;
