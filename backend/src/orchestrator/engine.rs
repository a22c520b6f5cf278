//! Orchestrator Engine
//!
//! Owns the whole run: agents, calendar, RNG, event log and per-month history.
//!
//! # Month loop
//!
//! ```text
//! For each month m:
//! 1. Record the pre-step snapshot (summary + detailed copy)
//! 2. Producer phase, in market order:
//!    reset counters → adjust price/production → produce →
//!    pay production costs → pay employees
//! 3. Person phase, in id order:
//!    payout (if m is the payout month) → job search → commute → purchases
//! 4. Check invariants (roster consistency, money conservation)
//! 5. Advance the calendar; after the last month record a final snapshot
//! ```
//!
//! Producers go first so that what a person can spend reflects the salary
//! paid this month.
//!
//! # Example
//!
//! ```rust
//! use market_simulator_core_rs::{Orchestrator, SimConfig};
//!
//! let mut config = SimConfig::default();
//! config.max_months = 12;
//! config.rng_seed = Some(7);
//!
//! let mut orchestrator = Orchestrator::new(config).unwrap();
//! let report = orchestrator.run().unwrap();
//!
//! // One summary per month plus the final state
//! assert_eq!(report.months.len(), 13);
//! ```

use crate::config::SimConfig;
use crate::core::{Calendar, Position};
use crate::models::event::{Event, EventLog};
use crate::models::market::{Market, ProducerMonth};
use crate::models::person::{Person, PersonMonth, PersonParams};
use crate::models::state::SimulationState;
use crate::orchestrator::snapshot::{compute_config_hash, DetailedMonth, MonthSummary};
use crate::orchestrator::SimulationError;
use crate::report::SimulationReport;
use crate::rng::RngManager;
use tracing::{debug, info, trace};
use uuid::Uuid;

/// Seed used when the configuration does not carry one
pub const DEFAULT_RNG_SEED: u64 = 42;

/// Result of a single month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthResult {
    /// Month that was just stepped (0-indexed)
    pub month: usize,

    /// Whether wallets were doubled this month
    pub payout: bool,

    pub job_switches: usize,

    /// Units sold since each producer's own step, per producer in market order
    pub units_sold: Vec<i64>,

    pub total_money_before: i64,
    pub total_money_after: i64,
}

/// Main orchestrator managing simulation state and the month loop
///
/// # Determinism
///
/// All randomness is spent during initialisation, through a seeded
/// [`RngManager`]. Stepping itself is deterministic, so the same seed and
/// config always produce the same history.
pub struct Orchestrator {
    config: SimConfig,
    config_hash: String,
    run_id: Uuid,

    state: SimulationState,
    calendar: Calendar,
    rng_seed: u64,
    params: PersonParams,

    event_log: EventLog,

    /// Pre-step summaries, plus the final one once the run is finished
    history: Vec<MonthSummary>,
    detailed_history: Vec<DetailedMonth>,
}

impl Orchestrator {
    /// Validate `config` and build the initial population
    ///
    /// Producer positions are drawn first, then each person's employer,
    /// wallet, savings ratio, food intake and position, in id order.
    pub fn new(config: SimConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let rng_seed = config.rng_seed.unwrap_or(DEFAULT_RNG_SEED);
        let mut rng = RngManager::new(rng_seed);

        let positions: Vec<Position> = config
            .producers
            .iter()
            .map(|_| random_position(&config, &mut rng))
            .collect();
        let market = Market::from_config(&config, &positions)?;

        let people: Vec<Person> = (0..config.num_people)
            .map(|id| {
                let employer = rng.index(market.len());
                let wallet = rng.range(config.starting_wallet_min, config.starting_wallet_max);
                let savings_ratio =
                    rng.range_f64(config.savings_ratio_min, config.savings_ratio_max);
                let food_intake = rng.range(config.food_intake_min, config.food_intake_max);
                let position = random_position(&config, &mut rng);

                Person::new(id, employer, wallet)
                    .with_savings_ratio(savings_ratio)
                    .with_food_intake(food_intake)
                    .with_position(position)
            })
            .collect();

        let state = SimulationState::new(market, people);
        let config_hash = compute_config_hash(&config)?;
        let calendar = Calendar::new(config.max_months, config.payout_month);
        let params = PersonParams {
            job_switch_multiplier: config.job_switch_multiplier,
            gas_consumption_per_distance: config.gas_consumption_per_distance,
        };

        info!(
            seed = rng_seed,
            people = state.num_people(),
            producers = state.market().len(),
            months = config.max_months,
            "simulation initialised"
        );

        Ok(Self {
            config,
            config_hash,
            run_id: Uuid::new_v4(),
            state,
            calendar,
            rng_seed,
            params,
            event_log: EventLog::new(),
            history: Vec::new(),
            detailed_history: Vec::new(),
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn current_month(&self) -> usize {
        self.calendar.current_month()
    }

    pub fn is_finished(&self) -> bool {
        self.calendar.is_finished()
    }

    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    pub fn history(&self) -> &[MonthSummary] {
        &self.history
    }

    pub fn detailed_history(&self) -> &[DetailedMonth] {
        &self.detailed_history
    }

    // ========================================================================
    // Month loop
    // ========================================================================

    /// Step one month
    ///
    /// # Errors
    /// [`SimulationError::RunFinished`] once every configured month has run.
    ///
    /// # Panics
    /// Panics if a roster or money-conservation invariant breaks, which
    /// would mean a bug in the step rules.
    pub fn step(&mut self) -> Result<MonthResult, SimulationError> {
        if self.calendar.is_finished() {
            return Err(SimulationError::RunFinished {
                months: self.calendar.max_months(),
            });
        }

        let month = self.calendar.current_month();
        self.record_snapshot(month);
        let total_money_before = self.state.total_money();

        // Producer phase
        let (market, people) = self.state.split_mut();
        let mut producer_months = Vec::with_capacity(market.len());
        for id in 0..market.len() {
            producer_months.push(market.step_producer(id, people));
        }

        // Person phase
        let payout = self.calendar.is_payout_month();
        let mut person_months = Vec::with_capacity(people.len());
        for person in people.iter_mut() {
            person_months.push(person.step(market, &self.params, payout));
        }
        let units_sold: Vec<i64> = market.producers().iter().map(|p| p.units_sold()).collect();

        for producer_month in &producer_months {
            self.log_producer_month(month, producer_month);
        }
        let mut job_switches = 0;
        for (person, person_month) in person_months.iter().enumerate() {
            if person_month.job_switch.is_some() {
                job_switches += 1;
            }
            self.log_person_month(month, person, person_month);
        }

        if let Err(violation) = self.state.validate_rosters() {
            panic!("roster invariant violated in month {}: {}", month, violation);
        }
        let total_money_after = self.state.total_money();
        if !payout {
            assert_eq!(
                total_money_before, total_money_after,
                "money conservation violated in month {}",
                month
            );
        }

        debug!(
            month,
            payout,
            job_switches,
            total_money = total_money_after,
            average_wallet = self.state.average_wallet(),
            "month stepped"
        );
        if payout {
            info!(
                month,
                injected = total_money_after - total_money_before,
                "payout month: wallets doubled"
            );
        }

        self.calendar.advance_month();
        if self.calendar.is_finished() {
            self.record_snapshot(self.calendar.current_month());
        }

        Ok(MonthResult {
            month,
            payout,
            job_switches,
            units_sold,
            total_money_before,
            total_money_after,
        })
    }

    /// Step every remaining month and build the report
    pub fn run(&mut self) -> Result<SimulationReport, SimulationError> {
        info!(
            months = self.calendar.remaining_months(),
            run_id = %self.run_id,
            "simulation starting"
        );

        while !self.calendar.is_finished() {
            self.step()?;
        }

        info!(
            total_money = self.state.total_money(),
            events = self.event_log.len(),
            "simulation finished"
        );
        Ok(self.report())
    }

    /// Report of everything recorded so far
    pub fn report(&self) -> SimulationReport {
        SimulationReport {
            run_id: self.run_id,
            config_hash: self.config_hash.clone(),
            rng_seed: self.rng_seed,
            months: self.history.clone(),
            detailed: self.detailed_history.clone(),
            events_logged: self.event_log.len(),
        }
    }

    fn record_snapshot(&mut self, month: usize) {
        self.history.push(MonthSummary::capture(month, &self.state));
        self.detailed_history
            .push(DetailedMonth::capture(month, &self.state));
    }

    // ========================================================================
    // Event Logging
    // ========================================================================

    fn log_producer_month(&mut self, month: usize, pm: &ProducerMonth) {
        let adjustment = pm.adjustment;
        self.event_log.log(Event::PriceAdjusted {
            month,
            producer: pm.producer,
            sold_out: adjustment.sold_out,
            old_price: adjustment.old_price,
            new_price: adjustment.new_price,
            old_production: adjustment.old_production,
            new_production: adjustment.new_production,
        });

        for payment in pm.cost_payments.iter().filter(|p| p.units > 0) {
            self.event_log.log(Event::ProductionCostPaid {
                month,
                buyer: pm.producer,
                supplier: payment.supplier,
                units: payment.units,
                cost: payment.cost,
            });
        }

        self.event_log.log(Event::Payroll {
            month,
            producer: pm.producer,
            salary: pm.salary,
            employees: pm.employees_paid,
            total_paid: pm.payroll,
        });
    }

    fn log_person_month(&mut self, month: usize, person: usize, pm: &PersonMonth) {
        if let Some((wallet_before, wallet_after)) = pm.payout {
            self.event_log.log(Event::Payout {
                month,
                person,
                wallet_before,
                wallet_after,
            });
        }

        if let Some(switch) = pm.job_switch {
            debug!(
                month,
                person,
                from = switch.from,
                to = switch.to,
                salary = switch.offered_salary,
                "job switch"
            );
            self.event_log.log(Event::JobSwitch {
                month,
                person,
                from: switch.from,
                to: switch.to,
                offered_salary: switch.offered_salary,
            });
        }

        for purchase in pm.purchases.iter().filter(|p| p.units > 0) {
            trace!(
                month,
                person,
                producer = purchase.producer,
                units = purchase.units,
                cost = purchase.cost,
                "purchase"
            );
            self.event_log.log(Event::Purchase {
                month,
                person,
                producer: purchase.producer,
                units: purchase.units,
                cost: purchase.cost,
            });
        }
    }
}

fn random_position(config: &SimConfig, rng: &mut RngManager) -> Position {
    let x = rng.range(config.position_min, config.position_max);
    let y = rng.range(config.position_min, config.position_max);
    Position::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimConfig {
        let mut config = SimConfig::default();
        config.max_months = 3;
        config.num_people = 5;
        config.rng_seed = Some(11);
        config
    }

    #[test]
    fn test_step_after_finish_errors() {
        let mut orchestrator = Orchestrator::new(small_config()).unwrap();
        orchestrator.run().unwrap();

        let err = orchestrator.step().unwrap_err();
        assert!(matches!(err, SimulationError::RunFinished { months: 3 }));
    }

    #[test]
    fn test_default_seed_used_when_absent() {
        let mut config = small_config();
        config.rng_seed = None;
        let orchestrator = Orchestrator::new(config).unwrap();
        assert_eq!(orchestrator.rng_seed(), DEFAULT_RNG_SEED);
    }

    #[test]
    fn test_history_has_final_entry() {
        let mut orchestrator = Orchestrator::new(small_config()).unwrap();
        orchestrator.run().unwrap();

        let months: Vec<usize> = orchestrator.history().iter().map(|s| s.month).collect();
        assert_eq!(months, vec![0, 1, 2, 3]);
        assert_eq!(orchestrator.detailed_history().len(), 4);
    }
}
