//! Producer model
//!
//! A producer manufactures one product, sets its own price and production
//! volume from last month's inventory, pays other producers for production
//! inputs and splits its remaining balance among its employees.
//!
//! Operations that involve other producers (production costs) live on
//! [`Market`](crate::models::market::Market), which owns the whole collection.
//!
//! CRITICAL: All money values are i64 currency units and the bank balance
//! never goes negative. A negative balance is a logic error and panics.

use crate::config::ProducerConfig;
use crate::core::Position;
use crate::models::person::{Person, PersonId};
use serde::{Deserialize, Serialize};

/// Index of a producer in the market
pub type ProducerId = usize;

/// A resolved production-cost edge
///
/// For every `units_per_batch` units produced, one unit is bought from
/// `supplier`. `amount_per_batch` is carried from the configuration but does
/// not change how many units are bought.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEdge {
    pub supplier: ProducerId,
    pub units_per_batch: i64,
    pub amount_per_batch: i64,
}

/// Outcome of the monthly price/production adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    /// Stock was empty, so demand exceeded supply last month
    pub sold_out: bool,
    pub old_price: i64,
    pub new_price: i64,
    pub old_production: i64,
    pub new_production: i64,
}

/// A producer agent
///
/// # Example
/// ```
/// use market_simulator_core_rs::Producer;
///
/// let mut coffee = Producer::new("coffee", 10, 50);
/// assert_eq!(coffee.max_units(105), 10);
///
/// let cost = coffee.register_purchase(4);
/// assert_eq!(cost, 40);
/// assert_eq!(coffee.stock(), 46);
/// assert_eq!(coffee.bank_balance(), 40);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Producer {
    /// Product name, unique within the market
    product: String,

    bank_balance: i64,

    /// Unit price, always >= 1
    price: i64,

    stock: i64,

    monthly_production: i64,
    production_limit: i64,

    /// Units produced since the producer last paid for its inputs
    unpaid_units: i64,

    /// Units sold since the start of the current month
    units_sold: i64,

    /// Units actually handed over by the most recent `register_purchase`
    last_sale_units: i64,

    /// Salary paid this month (or on offer, when there is nobody to pay)
    month_salary: i64,

    /// Roster of person ids. The people themselves live in the state arena.
    employees: Vec<PersonId>,

    max_hires: usize,
    month_hires: usize,

    production_change_amount: f64,
    price_change_amount: f64,

    production_costs: Vec<CostEdge>,

    position: Position,
}

impl Producer {
    /// Create a producer with a price and an opening stock
    ///
    /// Everything else starts at zero/empty; use the `with_*` methods to
    /// configure the rest.
    pub fn new(product: impl Into<String>, price: i64, stock: i64) -> Self {
        assert!(price > 0, "price must be positive");
        assert!(stock >= 0, "stock must be non-negative");
        Self {
            product: product.into(),
            bank_balance: 0,
            price,
            stock,
            monthly_production: 0,
            production_limit: 0,
            unpaid_units: 0,
            units_sold: 0,
            last_sale_units: 0,
            month_salary: 0,
            employees: Vec::new(),
            max_hires: 0,
            month_hires: 0,
            production_change_amount: 0.0,
            price_change_amount: 0.0,
            production_costs: Vec::new(),
            position: Position::new(0, 0),
        }
    }

    /// Build a producer from its configuration
    ///
    /// `production_costs` must already be resolved against the producer
    /// catalog; `position` is drawn by the caller.
    pub fn from_config(
        config: &ProducerConfig,
        production_costs: Vec<CostEdge>,
        position: Position,
    ) -> Self {
        Self::new(config.product_name.clone(), config.init_price, config.init_stock)
            .with_balance(config.init_balance)
            .with_salary(config.init_salary)
            .with_production(config.init_monthly_production, config.production_limit)
            .with_rates(config.production_change_amount, config.price_change_amount)
            .with_max_hires(config.max_hires)
            .with_production_costs(production_costs)
            .with_position(position)
    }

    pub fn with_balance(mut self, balance: i64) -> Self {
        self.set_bank_balance(balance);
        self
    }

    pub fn with_salary(mut self, salary: i64) -> Self {
        self.month_salary = salary;
        self
    }

    pub fn with_production(mut self, monthly_production: i64, production_limit: i64) -> Self {
        assert!(
            monthly_production >= 0 && production_limit >= 0,
            "production values must be non-negative"
        );
        self.monthly_production = monthly_production;
        self.production_limit = production_limit;
        self
    }

    /// Set the production and price change rates (0.1 = ±10%)
    pub fn with_rates(mut self, production_change_amount: f64, price_change_amount: f64) -> Self {
        self.production_change_amount = production_change_amount;
        self.price_change_amount = price_change_amount;
        self
    }

    pub fn with_max_hires(mut self, max_hires: usize) -> Self {
        self.max_hires = max_hires;
        self
    }

    pub fn with_production_costs(mut self, production_costs: Vec<CostEdge>) -> Self {
        self.production_costs = production_costs;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_unpaid_units(mut self, unpaid_units: i64) -> Self {
        assert!(unpaid_units >= 0, "unpaid_units must be non-negative");
        self.unpaid_units = unpaid_units;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn bank_balance(&self) -> i64 {
        self.bank_balance
    }

    pub fn price(&self) -> i64 {
        self.price
    }

    pub fn stock(&self) -> i64 {
        self.stock
    }

    pub fn monthly_production(&self) -> i64 {
        self.monthly_production
    }

    pub fn production_limit(&self) -> i64 {
        self.production_limit
    }

    pub fn unpaid_units(&self) -> i64 {
        self.unpaid_units
    }

    pub fn units_sold(&self) -> i64 {
        self.units_sold
    }

    /// Units handed over by the most recent [`register_purchase`](Self::register_purchase)
    pub fn last_sale_units(&self) -> i64 {
        self.last_sale_units
    }

    pub fn month_salary(&self) -> i64 {
        self.month_salary
    }

    pub fn employees(&self) -> &[PersonId] {
        &self.employees
    }

    pub fn num_employees(&self) -> usize {
        self.employees.len()
    }

    pub fn max_hires(&self) -> usize {
        self.max_hires
    }

    pub fn month_hires(&self) -> usize {
        self.month_hires
    }

    pub fn production_costs(&self) -> &[CostEdge] {
        &self.production_costs
    }

    pub fn position(&self) -> Position {
        self.position
    }

    // ========================================================================
    // Money
    // ========================================================================

    /// Set the bank balance
    ///
    /// # Panics
    /// Panics if `amount` is negative. Every caller is expected to have
    /// checked affordability, so this only fires on an overspend bug.
    pub fn set_bank_balance(&mut self, amount: i64) {
        if amount < 0 {
            panic!(
                "Attempted to set bank balance of producer {} to {}",
                self.product, amount
            );
        }
        self.bank_balance = amount;
    }

    /// Decrease the bank balance by `amount`
    pub fn debit(&mut self, amount: i64) {
        assert!(amount >= 0, "amount must be non-negative");
        self.set_bank_balance(self.bank_balance - amount);
    }

    /// Increase the bank balance by `amount`
    pub fn credit(&mut self, amount: i64) {
        assert!(amount >= 0, "amount must be non-negative");
        self.set_bank_balance(self.bank_balance + amount);
    }

    // ========================================================================
    // Trading
    // ========================================================================

    /// Sell up to `amount` units and return what they cost
    ///
    /// Only `min(amount, stock)` units change hands; the shortfall is silent.
    /// Use [`last_sale_units`](Self::last_sale_units) to learn how many units
    /// were actually sold.
    pub fn register_purchase(&mut self, amount: i64) -> i64 {
        assert!(amount >= 0, "purchase amount must be non-negative");

        let units = amount.min(self.stock);
        let cost = units * self.price;

        self.stock -= units;
        self.units_sold += units;
        self.last_sale_units = units;
        self.credit(cost);

        cost
    }

    /// Maximum number of units `money` buys at the current price, capped at
    /// the current stock
    ///
    /// Truncates rather than rounds so a buyer can never overspend.
    pub fn max_units(&self, money: i64) -> i64 {
        if money <= 0 {
            return 0;
        }
        (money / self.price).min(self.stock)
    }

    // ========================================================================
    // Roster
    // ========================================================================

    /// Hire `person` if this month's quota allows it
    ///
    /// Returns false, without touching the roster, once `max_hires` people
    /// have been hired this month.
    pub fn add_employee(&mut self, person: PersonId) -> bool {
        if self.month_hires < self.max_hires {
            self.employees.push(person);
            self.month_hires += 1;
            return true;
        }
        false
    }

    /// Put `person` on the roster without counting against the hiring quota
    ///
    /// Used for the initial employer assignment.
    pub fn enroll_employee(&mut self, person: PersonId) {
        self.employees.push(person);
    }

    /// Remove `person` from the roster; no-op if absent
    pub fn remove_employee(&mut self, person: PersonId) {
        if let Some(pos) = self.employees.iter().position(|&id| id == person) {
            self.employees.remove(pos);
        }
    }

    pub fn employs(&self, person: PersonId) -> bool {
        self.employees.contains(&person)
    }

    // ========================================================================
    // Monthly step phases
    // ========================================================================

    /// Reset the per-month counters
    pub fn begin_month(&mut self) {
        self.month_hires = 0;
        self.units_sold = 0;
    }

    /// Raise price and production after a sell-out, lower both otherwise
    ///
    /// Both are scaled multiplicatively and rounded half-up. Production is
    /// clamped to the production limit; price never drops below 1.
    pub fn adjust_variables(&mut self) -> Adjustment {
        let sold_out = self.stock == 0;
        let (production_factor, price_factor) = if sold_out {
            (
                1.0 + self.production_change_amount,
                1.0 + self.price_change_amount,
            )
        } else {
            (
                1.0 - self.production_change_amount,
                1.0 - self.price_change_amount,
            )
        };

        let new_production =
            (self.monthly_production as f64 * production_factor).min(self.production_limit as f64);
        let new_price = self.price as f64 * price_factor;

        let adjustment = Adjustment {
            sold_out,
            old_price: self.price,
            new_price: (round_half_up(new_price)).max(1),
            old_production: self.monthly_production,
            new_production: round_half_up(new_production),
        };

        self.price = adjustment.new_price;
        self.monthly_production = adjustment.new_production;
        adjustment
    }

    /// Add this month's production to stock; it is not paid for yet
    pub fn produce_products(&mut self) {
        self.stock += self.monthly_production;
        self.unpaid_units += self.monthly_production;
    }

    /// Record that `units` produced units have had their inputs paid for
    pub(crate) fn settle_unpaid(&mut self, units: i64) {
        debug_assert!(units <= self.unpaid_units, "settled more than owed");
        self.unpaid_units -= units;
    }

    /// Work out this month's salary from the current balance
    ///
    /// With nobody on the roster the whole balance is on offer.
    pub fn calculate_salary(&mut self) -> i64 {
        self.month_salary = match self.employees.len() {
            0 => self.bank_balance,
            n => self.bank_balance / n as i64,
        };
        self.month_salary
    }

    /// Pay every employee this month's salary
    ///
    /// Salary is pushed: the producer debits itself and credits each wallet.
    /// Returns the total paid out; the division remainder stays in the bank.
    pub fn pay_employees(&mut self, people: &mut [Person]) -> i64 {
        let salary = self.calculate_salary();
        let mut total = 0;

        for i in 0..self.employees.len() {
            let person = &mut people[self.employees[i]];
            person.receive_salary(salary);
            self.debit(salary);
            total += salary;
        }

        total
    }
}

fn round_half_up(value: f64) -> i64 {
    (value + 0.5) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(9.0), 9);
        assert_eq!(round_half_up(9.5), 10);
        assert_eq!(round_half_up(10.49), 10);
    }

    #[test]
    fn test_max_units_zero_and_negative_money() {
        let producer = Producer::new("food", 10, 50);
        assert_eq!(producer.max_units(0), 0);
        assert_eq!(producer.max_units(-20), 0);
    }

    #[test]
    fn test_price_floor_is_one() {
        let mut producer = Producer::new("coffee", 1, 10).with_rates(0.0, 0.9);
        producer.adjust_variables();
        assert_eq!(producer.price(), 1);
    }

    #[test]
    fn test_production_clamped_to_limit() {
        let mut producer = Producer::new("food", 10, 0)
            .with_production(950, 1000)
            .with_rates(0.1, 0.1);
        producer.adjust_variables();
        assert_eq!(producer.monthly_production(), 1000);
    }

    #[test]
    #[should_panic(expected = "Attempted to set bank balance of producer food to -1")]
    fn test_negative_balance_panics() {
        let mut producer = Producer::new("food", 10, 0).with_balance(5);
        producer.debit(6);
    }

    #[test]
    fn test_remove_absent_employee_is_noop() {
        let mut producer = Producer::new("food", 10, 0);
        producer.enroll_employee(3);
        producer.remove_employee(7);
        assert_eq!(producer.employees(), &[3]);
    }
}
