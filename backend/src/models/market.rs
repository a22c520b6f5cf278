//! Market - the ordered collection of producers
//!
//! Producers are addressed by index ([`ProducerId`]) inside the engine and by
//! product name at the configuration boundary. Collection order matters: it is
//! the order producers step in and the tie-break order for job offers.
//!
//! The market also runs the producer half of a month, because paying
//! production costs touches more than one producer.

use crate::config::{ConfigError, SimConfig};
use crate::core::Position;
use crate::models::person::Person;
use crate::models::producer::{Adjustment, CostEdge, Producer, ProducerId};

pub const FOOD: &str = "food";
pub const GASOLINE: &str = "gasoline";
pub const COFFEE: &str = "coffee";

/// Goods every person buys; the catalog must contain all of them
pub const REQUIRED_GOODS: [&str; 3] = [FOOD, GASOLINE, COFFEE];

/// Resolved indices of the goods people buy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoodsIndex {
    pub food: ProducerId,
    pub gasoline: ProducerId,
    pub coffee: ProducerId,
}

/// One production-cost settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostPayment {
    pub supplier: ProducerId,
    pub units: i64,
    pub cost: i64,
    /// Produced units whose inputs this payment covered
    pub settled_units: i64,
}

/// Everything a producer did in one month
#[derive(Debug, Clone, PartialEq)]
pub struct ProducerMonth {
    pub producer: ProducerId,
    pub adjustment: Adjustment,
    pub produced: i64,
    pub cost_payments: Vec<CostPayment>,
    pub salary: i64,
    pub employees_paid: usize,
    pub payroll: i64,
}

/// Ordered, fixed-size producer collection
#[derive(Debug, Clone)]
pub struct Market {
    producers: Vec<Producer>,
    goods: GoodsIndex,
}

impl Market {
    /// Build a market from producers in collection order
    ///
    /// Fails if a required good has no producer.
    pub fn new(producers: Vec<Producer>) -> Result<Self, ConfigError> {
        let find = |name: &str| {
            producers
                .iter()
                .position(|p| p.product() == name)
                .ok_or_else(|| ConfigError::MissingGood(name.to_string()))
        };
        let goods = GoodsIndex {
            food: find(FOOD)?,
            gasoline: find(GASOLINE)?,
            coffee: find(COFFEE)?,
        };
        Ok(Self { producers, goods })
    }

    /// Build the producers described by `config`
    ///
    /// Cost edges are resolved from names to indices here. `positions` holds
    /// one position per configured producer.
    pub fn from_config(config: &SimConfig, positions: &[Position]) -> Result<Self, ConfigError> {
        assert_eq!(
            positions.len(),
            config.producers.len(),
            "one position per producer"
        );

        let mut producers = Vec::with_capacity(config.producers.len());
        for (producer_config, position) in config.producers.iter().zip(positions) {
            let mut edges = Vec::with_capacity(producer_config.production_costs.len());
            for cost in &producer_config.production_costs {
                let supplier = config.producer_index(&cost.producer_name).ok_or_else(|| {
                    ConfigError::UnknownDependency {
                        producer: producer_config.product_name.clone(),
                        dependency: cost.producer_name.clone(),
                    }
                })?;
                edges.push(CostEdge {
                    supplier,
                    units_per_batch: cost.per_units,
                    amount_per_batch: cost.amount,
                });
            }
            producers.push(Producer::from_config(producer_config, edges, *position));
        }

        Self::new(producers)
    }

    pub fn len(&self) -> usize {
        self.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.producers.is_empty()
    }

    pub fn goods(&self) -> GoodsIndex {
        self.goods
    }

    pub fn producers(&self) -> &[Producer] {
        &self.producers
    }

    /// # Panics
    /// Panics if `id` is out of range.
    pub fn producer(&self, id: ProducerId) -> &Producer {
        &self.producers[id]
    }

    /// # Panics
    /// Panics if `id` is out of range.
    pub fn producer_mut(&mut self, id: ProducerId) -> &mut Producer {
        &mut self.producers[id]
    }

    /// Index of the producer making `product`
    pub fn find(&self, product: &str) -> Option<ProducerId> {
        self.producers.iter().position(|p| p.product() == product)
    }

    /// Producer making `product`
    pub fn by_name(&self, product: &str) -> Option<&Producer> {
        self.find(product).map(|id| &self.producers[id])
    }

    pub fn total_bank_balance(&self) -> i64 {
        self.producers.iter().map(|p| p.bank_balance()).sum()
    }

    /// Run one producer's month
    ///
    /// Order: reset counters, adjust price/production, produce, pay
    /// production costs, pay employees.
    pub fn step_producer(&mut self, id: ProducerId, people: &mut [Person]) -> ProducerMonth {
        let producer = &mut self.producers[id];
        producer.begin_month();
        let adjustment = producer.adjust_variables();
        producer.produce_products();
        let produced = producer.monthly_production();

        let cost_payments = self.pay_production_costs(id);

        let producer = &mut self.producers[id];
        let employees_paid = producer.num_employees();
        let payroll = producer.pay_employees(people);

        ProducerMonth {
            producer: id,
            adjustment,
            produced,
            cost_payments,
            salary: producer.month_salary(),
            employees_paid,
            payroll,
        }
    }

    /// Buy the inputs owed for unpaid production, edge by edge
    ///
    /// Each edge buys one unit per `units_per_batch` units still unpaid, as
    /// many as the current balance and the supplier's stock allow. Purchases
    /// apply immediately, so a later edge sees the effect of earlier ones. A
    /// self edge buys from the producer's own stock and the payment nets out.
    /// Units that could not be paid for stay owed for the next month.
    pub fn pay_production_costs(&mut self, buyer: ProducerId) -> Vec<CostPayment> {
        let edges = self.producers[buyer].production_costs().to_vec();
        let mut payments = Vec::with_capacity(edges.len());

        for edge in edges {
            let owed = self.producers[buyer].unpaid_units() / edge.units_per_batch;
            let budget = self.producers[buyer].bank_balance();
            let units = owed.min(self.producers[edge.supplier].max_units(budget));

            let cost = self.producers[edge.supplier].register_purchase(units);
            debug_assert_eq!(self.producers[edge.supplier].last_sale_units(), units);

            let settled_units = units * edge.units_per_batch;
            let producer = &mut self.producers[buyer];
            producer.debit(cost);
            producer.settle_unpaid(settled_units);

            payments.push(CostPayment {
                supplier: edge.supplier,
                units,
                cost,
                settled_units,
            });
        }

        payments
    }
}
