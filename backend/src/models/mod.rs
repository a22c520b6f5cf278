//! Domain models for the market simulator

pub mod event;
pub mod market;
pub mod person;
pub mod producer;
pub mod state;

// Re-exports
pub use event::{Event, EventLog};
pub use market::{CostPayment, GoodsIndex, Market, ProducerMonth};
pub use person::{JobSwitch, Person, PersonId, PersonMonth, PersonParams, Purchase};
pub use producer::{Adjustment, CostEdge, Producer, ProducerId};
pub use state::SimulationState;
