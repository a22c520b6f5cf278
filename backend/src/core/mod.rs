//! Time and space primitives shared by the models and the orchestrator

pub mod calendar;
pub mod geometry;

pub use calendar::Calendar;
pub use geometry::Position;
