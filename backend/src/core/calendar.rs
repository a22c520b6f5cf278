//! Month bookkeeping for the simulation
//!
//! The simulation advances in whole months. A run has a fixed length and at
//! most one payout month, on which every wallet is doubled.

use serde::{Deserialize, Serialize};

/// Tracks the current month of a run
///
/// # Example
/// ```
/// use market_simulator_core_rs::Calendar;
///
/// let mut calendar = Calendar::new(3, 1);
/// assert_eq!(calendar.current_month(), 0);
/// assert!(!calendar.is_payout_month());
///
/// calendar.advance_month();
/// assert!(calendar.is_payout_month());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    /// Months elapsed since the start of the run (0-indexed)
    current_month: usize,
    /// Total months in the run
    max_months: usize,
    /// Month in which wallets are doubled
    payout_month: usize,
}

impl Calendar {
    /// Create a calendar for a run of `max_months` months
    ///
    /// A `payout_month` at or beyond `max_months` never fires.
    pub fn new(max_months: usize, payout_month: usize) -> Self {
        assert!(max_months > 0, "max_months must be positive");
        Self {
            current_month: 0,
            max_months,
            payout_month,
        }
    }

    /// Move on to the next month
    pub fn advance_month(&mut self) {
        self.current_month += 1;
    }

    pub fn current_month(&self) -> usize {
        self.current_month
    }

    pub fn max_months(&self) -> usize {
        self.max_months
    }

    pub fn payout_month(&self) -> usize {
        self.payout_month
    }

    /// True when the current month is the configured payout month
    pub fn is_payout_month(&self) -> bool {
        self.current_month == self.payout_month
    }

    /// True once every configured month has been stepped
    pub fn is_finished(&self) -> bool {
        self.current_month >= self.max_months
    }

    /// Months still to be stepped
    pub fn remaining_months(&self) -> usize {
        self.max_months.saturating_sub(self.current_month)
    }
}
