//! Orchestrator - the monthly simulation loop
//!
//! See `engine.rs` for the loop itself and `snapshot.rs` for the per-month
//! projections it records.

pub mod engine;
pub mod snapshot;

use crate::config::ConfigError;
use thiserror::Error;

pub use engine::{MonthResult, Orchestrator, DEFAULT_RNG_SEED};
pub use snapshot::{
    compute_config_hash, validate_snapshot, DetailedMonth, MonthSummary, PersonSnapshot,
    ProducerSnapshot, ProductPrice,
};

/// Simulation error types
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration rejected before the first month
    #[error("Invalid config: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// Every configured month has already been stepped
    #[error("Simulation already finished after {months} months")]
    RunFinished { months: usize },

    #[error("State validation failed: {0}")]
    StateValidation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}
