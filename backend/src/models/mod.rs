//! Models for the terrain risk service
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
pub use shared::risk::{Disease, RiskScores};
