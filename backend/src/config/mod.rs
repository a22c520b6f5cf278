//! Simulation configuration
//!
//! A run is fully described by a [`SimConfig`]: run length, population ranges
//! and one [`ProducerConfig`] per producer. Configurations are stored as JSON.
//!
//! # Validation
//!
//! [`SimConfig::validate`] rejects every configuration the engine cannot step
//! safely: empty random ranges, non-positive prices, duplicate products,
//! production-cost edges naming an unknown producer and a catalog missing one of
//! the goods people buy. The orchestrator refuses to start on an invalid config.

use crate::models::market::REQUIRED_GOODS;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Path used when no configuration file is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Errors raised while loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file {path} does not exist")]
    NotFound { path: String },

    #[error("failed to access configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("duplicate producer for product {0}")]
    DuplicateProduct(String),

    #[error("producer {producer} has a production cost on unknown producer {dependency}")]
    UnknownDependency {
        producer: String,
        dependency: String,
    },

    #[error("no producer supplies required good {0}")]
    MissingGood(String),
}

/// One production-cost edge: for every `per_units` units produced, the
/// producer buys one unit from `producer_name`. `amount` is kept with the
/// edge but settlement does not read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionCost {
    pub producer_name: String,
    pub per_units: i64,
    pub amount: i64,
}

/// Per-producer starting state and behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerConfig {
    pub product_name: String,
    pub init_salary: i64,
    pub max_hires: usize,
    pub init_balance: i64,
    pub init_price: i64,
    pub init_monthly_production: i64,
    pub init_stock: i64,
    pub production_limit: i64,

    /// Fraction above or below one applied on adjustment.
    /// 0.05 means increases are ×1.05 and decreases ×0.95.
    pub production_change_amount: f64,
    pub price_change_amount: f64,

    #[serde(default)]
    pub production_costs: Vec<ProductionCost>,
}

/// Complete configuration of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    // Simulation basics
    pub max_months: usize,
    pub payout_month: usize,
    pub num_people: usize,

    /// Seed for population generation. `None` lets the caller pick one.
    #[serde(default)]
    pub rng_seed: Option<u64>,

    // Individuals (ranges are [min, max))
    pub starting_wallet_min: i64,
    pub starting_wallet_max: i64,
    pub savings_ratio_min: f64,
    pub savings_ratio_max: f64,
    pub food_intake_min: i64,
    pub food_intake_max: i64,
    pub gas_consumption_per_distance: f64,
    pub job_switch_multiplier: f64,

    pub position_min: i64,
    pub position_max: i64,

    // Producers
    pub producers: Vec<ProducerConfig>,
}

impl Default for SimConfig {
    /// Three producers that each consume gasoline and coffee, twenty people
    /// and a payout halfway through a hundred-month run.
    fn default() -> Self {
        let costs = vec![
            ProductionCost {
                producer_name: "gasoline".to_string(),
                per_units: 10,
                amount: 1,
            },
            ProductionCost {
                producer_name: "coffee".to_string(),
                per_units: 10,
                amount: 1,
            },
        ];

        let producers = ["food", "gasoline", "coffee"]
            .iter()
            .map(|name| ProducerConfig {
                product_name: name.to_string(),
                init_salary: 10,
                max_hires: 2,
                init_balance: 0,
                init_price: 10,
                init_monthly_production: 100,
                init_stock: 1000,
                production_limit: 1000,
                production_change_amount: 0.1,
                price_change_amount: 0.1,
                production_costs: costs.clone(),
            })
            .collect();

        Self {
            max_months: 100,
            payout_month: 49,
            num_people: 20,
            rng_seed: None,
            starting_wallet_min: 0,
            starting_wallet_max: 1000,
            savings_ratio_min: 0.1,
            savings_ratio_max: 0.3,
            food_intake_min: 30,
            food_intake_max: 60,
            gas_consumption_per_distance: 1.0,
            job_switch_multiplier: 1.5,
            position_min: 0,
            position_max: 300,
            producers,
        }
    }
}

impl SimConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Load a configuration file, writing the default configuration first when
    /// `path` is the default location and nothing is there yet.
    ///
    /// A missing file at any other path is an error.
    pub fn load_or_create_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() && path == Path::new(DEFAULT_CONFIG_PATH) {
            tracing::info!(path = %path.display(), "creating default configuration");
            Self::default().save(path)?;
        }
        Self::load(path)
    }

    /// Write this configuration as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Index of the producer making `product`, if configured
    pub fn producer_index(&self, product: &str) -> Option<usize> {
        self.producers
            .iter()
            .position(|p| p.product_name == product)
    }

    /// Check every constraint the engine relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_months == 0 {
            return Err(invalid("max_months must be > 0"));
        }
        if self.num_people == 0 {
            return Err(invalid("num_people must be > 0"));
        }

        check_range("starting_wallet", self.starting_wallet_min, self.starting_wallet_max)?;
        check_range("food_intake", self.food_intake_min, self.food_intake_max)?;
        if self.position_min >= self.position_max {
            return Err(invalid(format!(
                "position_min ({}) must be less than position_max ({})",
                self.position_min, self.position_max
            )));
        }

        if !(0.0..1.0).contains(&self.savings_ratio_min)
            || !(0.0..1.0).contains(&self.savings_ratio_max)
            || self.savings_ratio_min > self.savings_ratio_max
        {
            return Err(invalid(format!(
                "savings ratios must satisfy 0 <= min <= max < 1, got [{}, {}]",
                self.savings_ratio_min, self.savings_ratio_max
            )));
        }

        if !self.job_switch_multiplier.is_finite() || self.job_switch_multiplier <= 0.0 {
            return Err(invalid("job_switch_multiplier must be a positive number"));
        }
        if !self.gas_consumption_per_distance.is_finite() || self.gas_consumption_per_distance < 0.0
        {
            return Err(invalid("gas_consumption_per_distance must be non-negative"));
        }

        if self.producers.is_empty() {
            return Err(invalid("must have at least one producer"));
        }

        let mut names = HashSet::new();
        for producer in &self.producers {
            if !names.insert(producer.product_name.as_str()) {
                return Err(ConfigError::DuplicateProduct(producer.product_name.clone()));
            }
            validate_producer(producer)?;
        }

        for producer in &self.producers {
            for cost in &producer.production_costs {
                if !names.contains(cost.producer_name.as_str()) {
                    return Err(ConfigError::UnknownDependency {
                        producer: producer.product_name.clone(),
                        dependency: cost.producer_name.clone(),
                    });
                }
            }
        }

        for good in REQUIRED_GOODS {
            if !names.contains(good) {
                return Err(ConfigError::MissingGood(good.to_string()));
            }
        }

        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(msg.into())
}

fn check_range(name: &str, min: i64, max: i64) -> Result<(), ConfigError> {
    if min < 0 {
        return Err(invalid(format!("{}_min must be non-negative", name)));
    }
    if min >= max {
        return Err(invalid(format!(
            "{}_min ({}) must be less than {}_max ({})",
            name, min, name, max
        )));
    }
    Ok(())
}

fn validate_producer(producer: &ProducerConfig) -> Result<(), ConfigError> {
    let name = &producer.product_name;

    if producer.init_price <= 0 {
        return Err(invalid(format!("{}: init_price must be > 0", name)));
    }
    for (field, value) in [
        ("init_salary", producer.init_salary),
        ("init_balance", producer.init_balance),
        ("init_monthly_production", producer.init_monthly_production),
        ("init_stock", producer.init_stock),
        ("production_limit", producer.production_limit),
    ] {
        if value < 0 {
            return Err(invalid(format!("{}: {} must be non-negative", name, field)));
        }
    }
    for (field, rate) in [
        ("production_change_amount", producer.production_change_amount),
        ("price_change_amount", producer.price_change_amount),
    ] {
        if !(0.0..=1.0).contains(&rate) {
            return Err(invalid(format!(
                "{}: {} must be within [0, 1], got {}",
                name, field, rate
            )));
        }
    }
    for cost in &producer.production_costs {
        if cost.per_units <= 0 || cost.amount <= 0 {
            return Err(invalid(format!(
                "{}: production cost on {} needs positive per_units and amount",
                name, cost.producer_name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn test_default_config_json_round_trip() {
        let config = SimConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(SimConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_producer_index() {
        let config = SimConfig::default();
        assert_eq!(config.producer_index("food"), Some(0));
        assert_eq!(config.producer_index("coffee"), Some(2));
        assert_eq!(config.producer_index("tea"), None);
    }

    #[test]
    fn test_rng_seed_is_optional_in_json() {
        let mut value = serde_json::to_value(SimConfig::default()).unwrap();
        value.as_object_mut().unwrap().remove("rng_seed");
        let config: SimConfig = serde_json::from_value(value).unwrap();
        assert_eq!(config.rng_seed, None);
    }
}
