//! Shared types and models for the terrain risk service
//!
//! This crate contains the forecast and terrain models exchanged between the
//! backend and its clients, plus the pure disease-risk scoring core.

pub mod models;
pub mod risk;

pub use models::*;
pub use risk::*;
