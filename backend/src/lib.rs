//! Market Simulator Core - Rust Engine
//!
//! Agent-based monthly economy: producers set prices and production from
//! inventory pressure and buy inputs from each other; people work, switch
//! jobs for better pay, commute and spend a cash-constrained budget.
//!
//! # Architecture
//!
//! - **core**: Calendar and positions
//! - **config**: Run configuration (JSON) and validation
//! - **models**: Domain types (Producer, Person, Market, State, Event)
//! - **orchestrator**: Monthly simulation loop and snapshots
//! - **report**: End-of-run report and text rendering
//! - **rng**: Deterministic random number generation
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 currency units; fractions are truncated
//! 2. Wallets and bank balances never go negative (violations panic)
//! 3. Money is conserved every month except the payout month
//! 4. All randomness is deterministic (seeded RNG)

// Module declarations
pub mod config;
pub mod core;
pub mod models;
pub mod orchestrator;
pub mod report;
pub mod rng;

// Re-exports for convenience
pub use config::{ConfigError, ProducerConfig, ProductionCost, SimConfig, DEFAULT_CONFIG_PATH};
pub use core::{Calendar, Position};
pub use models::{
    event::{Event, EventLog},
    market::Market,
    person::{Person, PersonParams},
    producer::Producer,
    state::SimulationState,
};
pub use orchestrator::{MonthResult, MonthSummary, Orchestrator, SimulationError};
pub use report::SimulationReport;
pub use rng::RngManager;
