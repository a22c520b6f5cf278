//! Person model
//!
//! A person works for one producer, commutes to it, and spends its wallet on
//! food, gasoline and coffee every month while holding back a share as savings.
//!
//! CRITICAL: The wallet never goes negative. Setting it negative panics,
//! because it means a purchase was allowed to overspend.

use crate::core::Position;
use crate::models::market::Market;
use crate::models::producer::{Producer, ProducerId};
use serde::{Deserialize, Serialize};

/// Index of a person in the state arena
pub type PersonId = usize;

/// Behaviour parameters shared by the whole population
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersonParams {
    /// Salary ratio an offer must reach before a person switches jobs
    pub job_switch_multiplier: f64,
    /// Gasoline units burned per unit of commute distance
    pub gas_consumption_per_distance: f64,
}

/// A completed job change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSwitch {
    pub from: ProducerId,
    pub to: ProducerId,
    pub offered_salary: i64,
}

/// Units actually bought from one producer, and what they cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Purchase {
    pub producer: ProducerId,
    pub units: i64,
    pub cost: i64,
}

/// Everything a person did in one month
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonMonth {
    /// Wallet before and after the payout doubling
    pub payout: Option<(i64, i64)>,
    pub job_switch: Option<JobSwitch>,
    pub purchases: Vec<Purchase>,
}

/// A consumer/worker agent
///
/// # Example
/// ```
/// use market_simulator_core_rs::Person;
///
/// let mut person = Person::new(0, 1, 500);
/// person.receive_salary(40);
/// assert_eq!(person.wallet(), 540);
/// assert_eq!(person.salary(), 40);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    id: PersonId,
    employer: ProducerId,
    wallet: i64,

    /// Last salary received
    salary: i64,

    monthly_food_intake: i64,

    /// Derived from the commute every month
    monthly_gas_intake: i64,

    /// Share of the wallet withheld from spending, in [0, 1)
    savings_ratio: f64,

    position: Position,

    // Units bought this month
    food_consumption: i64,
    gas_consumption: i64,
    coffee_consumption: i64,
}

impl Person {
    pub fn new(id: PersonId, employer: ProducerId, wallet: i64) -> Self {
        let mut person = Self {
            id,
            employer,
            wallet: 0,
            salary: 0,
            monthly_food_intake: 0,
            monthly_gas_intake: 0,
            savings_ratio: 0.0,
            position: Position::new(0, 0),
            food_consumption: 0,
            gas_consumption: 0,
            coffee_consumption: 0,
        };
        person.set_wallet_amount(wallet);
        person
    }

    pub fn with_food_intake(mut self, monthly_food_intake: i64) -> Self {
        assert!(monthly_food_intake >= 0, "food intake must be non-negative");
        self.monthly_food_intake = monthly_food_intake;
        self
    }

    pub fn with_gas_intake(mut self, monthly_gas_intake: i64) -> Self {
        assert!(monthly_gas_intake >= 0, "gas intake must be non-negative");
        self.monthly_gas_intake = monthly_gas_intake;
        self
    }

    pub fn with_savings_ratio(mut self, savings_ratio: f64) -> Self {
        assert!(
            (0.0..1.0).contains(&savings_ratio),
            "savings_ratio must be within [0, 1)"
        );
        self.savings_ratio = savings_ratio;
        self
    }

    pub fn with_salary(mut self, salary: i64) -> Self {
        self.salary = salary;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn id(&self) -> PersonId {
        self.id
    }

    pub fn employer(&self) -> ProducerId {
        self.employer
    }

    pub fn wallet(&self) -> i64 {
        self.wallet
    }

    pub fn salary(&self) -> i64 {
        self.salary
    }

    pub fn monthly_food_intake(&self) -> i64 {
        self.monthly_food_intake
    }

    pub fn monthly_gas_intake(&self) -> i64 {
        self.monthly_gas_intake
    }

    pub fn savings_ratio(&self) -> f64 {
        self.savings_ratio
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn food_consumption(&self) -> i64 {
        self.food_consumption
    }

    pub fn gas_consumption(&self) -> i64 {
        self.gas_consumption
    }

    pub fn coffee_consumption(&self) -> i64 {
        self.coffee_consumption
    }

    // ========================================================================
    // Wallet
    // ========================================================================

    /// Set the wallet
    ///
    /// # Panics
    /// Panics if `amount` is negative.
    pub fn set_wallet_amount(&mut self, amount: i64) {
        if amount < 0 {
            panic!(
                "Attempted to set wallet amount of person {} to {}",
                self.id, amount
            );
        }
        self.wallet = amount;
    }

    /// Credit a salary payment and remember it as the current salary
    pub fn receive_salary(&mut self, salary: i64) {
        assert!(salary >= 0, "salary must be non-negative");
        self.salary = salary;
        self.set_wallet_amount(self.wallet + salary);
    }

    /// Double the wallet in place (payout month)
    ///
    /// Returns the wallet before and after.
    pub fn double_wallet(&mut self) -> (i64, i64) {
        let before = self.wallet;
        self.set_wallet_amount(before * 2);
        (before, self.wallet)
    }

    // ========================================================================
    // Monthly step
    // ========================================================================

    /// Run this person's part of a month
    ///
    /// Salary has already been pushed by the employer's payroll. Order:
    /// payout (if due), job search, commute, purchases.
    pub fn step(&mut self, market: &mut Market, params: &PersonParams, payout: bool) -> PersonMonth {
        let payout = payout.then(|| self.double_wallet());
        let job_switch = self.check_new_jobs(market, params.job_switch_multiplier);
        self.calculate_gas_consumption(market, params.gas_consumption_per_distance);
        let purchases = self.buy_goods(market);

        PersonMonth {
            payout,
            job_switch,
            purchases,
        }
    }

    /// Whether an offer of `offered_salary` is worth switching for
    ///
    /// Someone without a salary takes any offer.
    pub fn would_switch_for(&self, offered_salary: i64, job_switch_multiplier: f64) -> bool {
        if self.salary == 0 {
            return true;
        }
        offered_salary as f64 / self.salary as f64 >= job_switch_multiplier
    }

    /// Move to the first producer, in market order, that pays enough and
    /// still has hiring capacity this month
    ///
    /// First eligible match wins, not the best one.
    pub fn check_new_jobs(
        &mut self,
        market: &mut Market,
        job_switch_multiplier: f64,
    ) -> Option<JobSwitch> {
        for candidate in 0..market.len() {
            if candidate == self.employer {
                continue;
            }

            let offered_salary = market.producer(candidate).month_salary();
            if !self.would_switch_for(offered_salary, job_switch_multiplier) {
                continue;
            }

            if market.producer_mut(candidate).add_employee(self.id) {
                let from = self.employer;
                market.producer_mut(from).remove_employee(self.id);
                self.employer = candidate;
                return Some(JobSwitch {
                    from,
                    to: candidate,
                    offered_salary,
                });
            }
        }
        None
    }

    /// Recompute gasoline intake from the distance to the current employer
    pub fn calculate_gas_consumption(&mut self, market: &Market, gas_consumption_per_distance: f64) {
        let workplace = market.producer(self.employer).position();
        let distance = self.position.distance_to(&workplace);
        self.monthly_gas_intake = (distance * gas_consumption_per_distance).floor() as i64;
    }

    /// Units to buy towards `desired_intake` with the current wallet
    ///
    /// The full intake when the wallet covers it, otherwise as much as the
    /// wallet (and stock) allows.
    pub fn units_to_purchase(&self, producer: &Producer, desired_intake: i64) -> i64 {
        if self.wallet <= 0 {
            return 0;
        }
        if self.wallet >= producer.price() * desired_intake {
            desired_intake
        } else {
            producer.max_units(self.wallet)
        }
    }

    /// Spend the month's budget
    ///
    /// Savings are set aside first and restored at the end. Food, then
    /// gasoline, then a second batch of food if the wallet can still cover a
    /// full batch, then as much coffee as the rest buys.
    pub fn buy_goods(&mut self, market: &mut Market) -> Vec<Purchase> {
        let goods = market.goods();
        let mut purchases = Vec::with_capacity(4);

        let savings = (self.wallet as f64 * self.savings_ratio) as i64;
        self.set_wallet_amount(self.wallet - savings);

        let food_units = self.units_to_purchase(market.producer(goods.food), self.monthly_food_intake);
        let food = self.purchase(market, goods.food, food_units);
        self.food_consumption = food.units;
        purchases.push(food);

        let gas_units =
            self.units_to_purchase(market.producer(goods.gasoline), self.monthly_gas_intake);
        let gas = self.purchase(market, goods.gasoline, gas_units);
        self.gas_consumption = gas.units;
        purchases.push(gas);

        let food_batch_cost = self.monthly_food_intake * market.producer(goods.food).price();
        if self.wallet > food_batch_cost {
            let top_up = self.purchase(market, goods.food, self.monthly_food_intake);
            self.food_consumption += top_up.units;
            purchases.push(top_up);
        }

        let coffee_units = market.producer(goods.coffee).max_units(self.wallet);
        let coffee = self.purchase(market, goods.coffee, coffee_units);
        self.coffee_consumption = coffee.units;
        purchases.push(coffee);

        self.set_wallet_amount(self.wallet + savings);
        purchases
    }

    fn purchase(&mut self, market: &mut Market, producer: ProducerId, units: i64) -> Purchase {
        let seller = market.producer_mut(producer);
        let cost = seller.register_purchase(units);
        let units = seller.last_sale_units();
        self.set_wallet_amount(self.wallet - cost);
        Purchase {
            producer,
            units,
            cost,
        }
    }
}
