//! Snapshot - per-month projections of the simulation state
//!
//! Before each month is stepped the orchestrator records:
//! - a [`MonthSummary`]: average wallet, every producer's price, total money
//! - a [`DetailedMonth`]: a copy of every producer and person
//!
//! so month N's entry shows the state *before* month N's adjustments.
//!
//! # Critical Invariants
//!
//! - **Non-negative money**: no wallet or bank balance below zero
//! - **Valid employers**: every person works for a listed producer
//! - **Roster consistency**: each person is on exactly its employer's roster
//! - **Money conservation**: total money matches the expected total

use crate::models::person::{Person, PersonId};
use crate::models::producer::{Producer, ProducerId};
use crate::models::state::SimulationState;
use crate::orchestrator::SimulationError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

// ============================================================================
// Snapshot Structures
// ============================================================================

/// Price of one product at snapshot time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPrice {
    pub product: String,
    pub price: i64,
}

/// Headline figures for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month: usize,
    pub average_wallet: i64,
    /// Prices in market order
    pub prices: Vec<ProductPrice>,
    /// Wallets plus bank balances
    pub total_money: i64,
}

impl MonthSummary {
    pub fn capture(month: usize, state: &SimulationState) -> Self {
        let prices = state
            .market()
            .producers()
            .iter()
            .map(|p| ProductPrice {
                product: p.product().to_string(),
                price: p.price(),
            })
            .collect();

        Self {
            month,
            average_wallet: state.average_wallet(),
            prices,
            total_money: state.total_money(),
        }
    }

    pub fn price_of(&self, product: &str) -> Option<i64> {
        self.prices
            .iter()
            .find(|p| p.product == product)
            .map(|p| p.price)
    }
}

/// Producer state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerSnapshot {
    pub product: String,
    pub bank_balance: i64,
    pub price: i64,
    pub stock: i64,
    pub monthly_production: i64,
    pub unpaid_units: i64,
    pub units_sold: i64,
    pub month_salary: i64,
    pub employees: Vec<PersonId>,
    pub position: (i64, i64),
}

impl From<&Producer> for ProducerSnapshot {
    fn from(producer: &Producer) -> Self {
        let position = producer.position();
        ProducerSnapshot {
            product: producer.product().to_string(),
            bank_balance: producer.bank_balance(),
            price: producer.price(),
            stock: producer.stock(),
            monthly_production: producer.monthly_production(),
            unpaid_units: producer.unpaid_units(),
            units_sold: producer.units_sold(),
            month_salary: producer.month_salary(),
            employees: producer.employees().to_vec(),
            position: (position.x, position.y),
        }
    }
}

/// Person state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonSnapshot {
    pub id: PersonId,
    pub employer: ProducerId,
    pub wallet: i64,
    pub salary: i64,
    pub savings_ratio: f64,
    pub monthly_food_intake: i64,
    pub monthly_gas_intake: i64,
    pub food_consumption: i64,
    pub gas_consumption: i64,
    pub coffee_consumption: i64,
    pub position: (i64, i64),
}

impl From<&Person> for PersonSnapshot {
    fn from(person: &Person) -> Self {
        let position = person.position();
        PersonSnapshot {
            id: person.id(),
            employer: person.employer(),
            wallet: person.wallet(),
            salary: person.salary(),
            savings_ratio: person.savings_ratio(),
            monthly_food_intake: person.monthly_food_intake(),
            monthly_gas_intake: person.monthly_gas_intake(),
            food_consumption: person.food_consumption(),
            gas_consumption: person.gas_consumption(),
            coffee_consumption: person.coffee_consumption(),
            position: (position.x, position.y),
        }
    }
}

/// Full copy of every agent for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedMonth {
    pub month: usize,
    pub producers: Vec<ProducerSnapshot>,
    pub people: Vec<PersonSnapshot>,
}

impl DetailedMonth {
    pub fn capture(month: usize, state: &SimulationState) -> Self {
        Self {
            month,
            producers: state
                .market()
                .producers()
                .iter()
                .map(ProducerSnapshot::from)
                .collect(),
            people: state.people().iter().map(PersonSnapshot::from).collect(),
        }
    }

    pub fn total_money(&self) -> i64 {
        self.people.iter().map(|p| p.wallet).sum::<i64>()
            + self.producers.iter().map(|p| p.bank_balance).sum::<i64>()
    }
}

// ============================================================================
// Config Hashing
// ============================================================================

/// Compute a SHA256 hash of a configuration
///
/// Uses canonical JSON serialization with sorted keys so the hash only
/// depends on the configuration's content.
pub fn compute_config_hash<T: Serialize>(config: &T) -> Result<String, SimulationError> {
    use serde_json::Value;
    use std::collections::BTreeMap;

    let value = serde_json::to_value(config).map_err(|e| {
        SimulationError::Serialization(format!("config serialization failed: {}", e))
    })?;

    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value)).map_err(|e| {
        SimulationError::Serialization(format!("config serialization failed: {}", e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// Validation
// ============================================================================

/// Validate a detailed snapshot
///
/// `expected_total_money` is checked when given; pass `None` across a payout.
pub fn validate_snapshot(
    snapshot: &DetailedMonth,
    expected_total_money: Option<i64>,
) -> Result<(), SimulationError> {
    // 1. Non-negative money
    for producer in &snapshot.producers {
        if producer.bank_balance < 0 {
            return Err(SimulationError::StateValidation(format!(
                "producer {} has negative bank balance {}",
                producer.product, producer.bank_balance
            )));
        }
    }
    for person in &snapshot.people {
        if person.wallet < 0 {
            return Err(SimulationError::StateValidation(format!(
                "person {} has negative wallet {}",
                person.id, person.wallet
            )));
        }
    }

    // 2. Valid employers and roster consistency
    let mut roster_count = vec![0usize; snapshot.people.len()];
    for (producer_id, producer) in snapshot.producers.iter().enumerate() {
        for &person_id in &producer.employees {
            let person = snapshot.people.get(person_id).ok_or_else(|| {
                SimulationError::StateValidation(format!(
                    "producer {} lists unknown person {}",
                    producer.product, person_id
                ))
            })?;
            if person.employer != producer_id {
                return Err(SimulationError::StateValidation(format!(
                    "person {} on roster of {} but employed by {}",
                    person_id, producer.product, person.employer
                )));
            }
            roster_count[person_id] += 1;
        }
    }
    for (index, person) in snapshot.people.iter().enumerate() {
        if person.employer >= snapshot.producers.len() {
            return Err(SimulationError::StateValidation(format!(
                "person {} employed by unknown producer {}",
                person.id, person.employer
            )));
        }
        if roster_count[index] != 1 {
            return Err(SimulationError::StateValidation(format!(
                "person {} appears on {} rosters",
                person.id, roster_count[index]
            )));
        }
    }

    // 3. Money conservation
    if let Some(expected) = expected_total_money {
        let total = snapshot.total_money();
        if total != expected {
            return Err(SimulationError::StateValidation(format!(
                "money conservation violated: expected {}, got {}",
                expected, total
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_config_hash_deterministic() {
        #[derive(Serialize)]
        struct TestConfig {
            value: i32,
            name: String,
        }

        let hash1 = compute_config_hash(&TestConfig {
            value: 42,
            name: "test".to_string(),
        })
        .unwrap();
        let hash2 = compute_config_hash(&TestConfig {
            value: 42,
            name: "test".to_string(),
        })
        .unwrap();

        assert_eq!(hash1, hash2, "Same config should produce same hash");
    }

    #[test]
    fn test_compute_config_hash_different_for_different_configs() {
        #[derive(Serialize)]
        struct TestConfig {
            value: i32,
        }

        let hash1 = compute_config_hash(&TestConfig { value: 42 }).unwrap();
        let hash2 = compute_config_hash(&TestConfig { value: 43 }).unwrap();

        assert_ne!(hash1, hash2);
    }

    fn person(id: PersonId, employer: ProducerId, wallet: i64) -> PersonSnapshot {
        PersonSnapshot {
            id,
            employer,
            wallet,
            salary: 0,
            savings_ratio: 0.1,
            monthly_food_intake: 30,
            monthly_gas_intake: 0,
            food_consumption: 0,
            gas_consumption: 0,
            coffee_consumption: 0,
            position: (0, 0),
        }
    }

    fn producer(product: &str, employees: Vec<PersonId>, bank_balance: i64) -> ProducerSnapshot {
        ProducerSnapshot {
            product: product.to_string(),
            bank_balance,
            price: 10,
            stock: 0,
            monthly_production: 0,
            unpaid_units: 0,
            units_sold: 0,
            month_salary: 0,
            employees,
            position: (0, 0),
        }
    }

    #[test]
    fn test_validate_snapshot_accepts_consistent_state() {
        let snapshot = DetailedMonth {
            month: 0,
            producers: vec![producer("food", vec![1], 50), producer("coffee", vec![0], 0)],
            people: vec![person(0, 1, 10), person(1, 0, 20)],
        };
        assert!(validate_snapshot(&snapshot, Some(80)).is_ok());
    }

    #[test]
    fn test_validate_snapshot_rejects_money_drift() {
        let snapshot = DetailedMonth {
            month: 0,
            producers: vec![producer("food", vec![0], 50)],
            people: vec![person(0, 0, 10)],
        };
        let err = validate_snapshot(&snapshot, Some(61)).unwrap_err();
        assert!(err.to_string().contains("money conservation"));
    }

    #[test]
    fn test_validate_snapshot_rejects_missing_roster_entry() {
        let snapshot = DetailedMonth {
            month: 0,
            producers: vec![producer("food", vec![], 0)],
            people: vec![person(0, 0, 10)],
        };
        assert!(validate_snapshot(&snapshot, None).is_err());
    }
}
