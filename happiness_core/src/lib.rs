//! # Happiness Core
//!
//! Computes NPC happiness for a housing layout. Reads the rules and the layout from
//! `housing_rules` and derives per-NPC shop prices, per-house averages and pylon eligibility.
//!
//! ## Core Components
//!
//! - **engine**: the stateless price computation over a full layout
//! - **optimizer**: simulated annealing search for high-happiness layouts
//!
//! ## Design Philosophy
//!
//! - **Pure**: the same layout and dataset always produce the same result
//! - **Forgiving**: unknown NPCs and biomes are neutral, never errors
//! - **Explainable**: every applied multiplier leaves a human-readable factor

pub mod engine;
pub mod optimizer;

pub use engine::*;
pub use optimizer::*;
