//! Business logic services for the terrain risk service

pub mod scheduler;
pub mod terrain;
pub mod updater;

pub use scheduler::{PassSummary, RefreshScheduler, RefreshStatus, RefreshTasks};
pub use terrain::TerrainService;
pub use updater::{TerrainUpdater, UpdateOutcome};
