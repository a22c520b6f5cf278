//! Deterministic random number generation
//!
//! Population attributes (wallets, intakes, savings ratios, positions and
//! starting employers) are drawn once at initialisation. Every draw MUST go
//! through [`RngManager`] so that a seed reproduces a run exactly.

mod xorshift;

pub use xorshift::RngManager;
