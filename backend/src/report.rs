//! End-of-run report
//!
//! Collects the per-month history of a run together with its provenance
//! (run id, config hash, seed), and renders it as text or JSON.

use crate::orchestrator::{DetailedMonth, MonthSummary, SimulationError};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use uuid::Uuid;

/// Everything a finished (or partially run) simulation recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub run_id: Uuid,
    /// SHA256 of the canonical configuration JSON
    pub config_hash: String,
    pub rng_seed: u64,
    /// Pre-step summaries, then the final state
    pub months: Vec<MonthSummary>,
    pub detailed: Vec<DetailedMonth>,
    pub events_logged: usize,
}

impl SimulationReport {
    pub fn to_json(&self) -> Result<String, SimulationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SimulationError::Serialization(format!("report serialization failed: {}", e)))
    }

    /// Summary of the state after the last stepped month
    pub fn final_summary(&self) -> Option<&MonthSummary> {
        self.months.last()
    }

    /// One line per month, as printed at the end of a run
    pub fn render_table(&self) -> String {
        render_table(&self.months)
    }
}

/// Render month summaries as text, one line each
///
/// ```
/// use market_simulator_core_rs::orchestrator::{MonthSummary, ProductPrice};
/// use market_simulator_core_rs::report::render_table;
///
/// let months = vec![MonthSummary {
///     month: 0,
///     average_wallet: 512,
///     prices: vec![ProductPrice { product: "food".to_string(), price: 10 }],
///     total_money: 10240,
/// }];
///
/// assert_eq!(
///     render_table(&months),
///     "Month: 0 | Average wallet: 512 | food price: 10 | Total money: 10240\n"
/// );
/// ```
pub fn render_table(months: &[MonthSummary]) -> String {
    let mut out = String::new();
    for summary in months {
        let _ = write!(
            out,
            "Month: {} | Average wallet: {}",
            summary.month, summary.average_wallet
        );
        for price in &summary.prices {
            let _ = write!(out, " | {} price: {}", price.product, price.price);
        }
        let _ = writeln!(out, " | Total money: {}", summary.total_money);
    }
    out
}
