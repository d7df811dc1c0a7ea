//! HTTP handlers for the terrain risk service

pub mod health;
pub mod terrain;

pub use health::{health_check, root};
pub use terrain::get_terrain;
