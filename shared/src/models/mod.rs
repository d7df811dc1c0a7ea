//! Domain models for the terrain risk service

mod terrain;
mod weather;

pub use terrain::*;
pub use weather::*;
