//! Simulation State
//!
//! Arena holding every agent of a run: the [`Market`] of producers and the
//! people. Agents refer to each other by index only:
//!
//! - `Person::employer` is a producer index
//! - `Producer::employees` holds person indices
//!
//! # Critical Invariants
//!
//! 1. **Valid employers**: every person's employer is a market index
//! 2. **Roster consistency**: each person is on exactly one roster, the one
//!    matching its employer
//! 3. **Non-negative money**: wallets and bank balances are >= 0
//! 4. **Money conservation**: wallets + bank balances only change on payout

use crate::models::market::Market;
use crate::models::person::Person;

/// Complete state of a running simulation
#[derive(Debug, Clone)]
pub struct SimulationState {
    market: Market,
    people: Vec<Person>,
}

impl SimulationState {
    /// Create a state from a market and a population
    ///
    /// People are enrolled on their employer's roster here; rosters passed in
    /// with the market are expected to be empty. Person ids must equal their
    /// position in `people`.
    ///
    /// # Panics
    /// Panics if a person id does not match its index or an employer index
    /// is out of range.
    pub fn new(mut market: Market, people: Vec<Person>) -> Self {
        for (index, person) in people.iter().enumerate() {
            assert_eq!(person.id(), index, "person id must match its index");
            assert!(
                person.employer() < market.len(),
                "person {} employed by unknown producer {}",
                person.id(),
                person.employer()
            );
            market.producer_mut(person.employer()).enroll_employee(person.id());
        }
        Self { market, people }
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    pub fn market_mut(&mut self) -> &mut Market {
        &mut self.market
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn num_people(&self) -> usize {
        self.people.len()
    }

    /// Borrow the market and the people separately
    pub fn split_mut(&mut self) -> (&mut Market, &mut [Person]) {
        (&mut self.market, &mut self.people)
    }

    pub fn total_wallets(&self) -> i64 {
        self.people.iter().map(|p| p.wallet()).sum()
    }

    /// Wallets plus bank balances
    pub fn total_money(&self) -> i64 {
        self.total_wallets() + self.market.total_bank_balance()
    }

    /// Mean wallet, truncated
    pub fn average_wallet(&self) -> i64 {
        if self.people.is_empty() {
            return 0;
        }
        self.total_wallets() / self.people.len() as i64
    }

    /// Check the roster invariants
    ///
    /// Returns a description of the first violation found.
    pub fn validate_rosters(&self) -> Result<(), String> {
        let mut seen = vec![0usize; self.people.len()];

        for (producer_id, producer) in self.market.producers().iter().enumerate() {
            for &person_id in producer.employees() {
                let person = self.people.get(person_id).ok_or_else(|| {
                    format!(
                        "producer {} lists unknown person {}",
                        producer.product(),
                        person_id
                    )
                })?;
                if person.employer() != producer_id {
                    return Err(format!(
                        "person {} is on the roster of {} but employed by producer {}",
                        person_id,
                        producer.product(),
                        person.employer()
                    ));
                }
                seen[person_id] += 1;
            }
        }

        for (person_id, count) in seen.into_iter().enumerate() {
            if count != 1 {
                return Err(format!(
                    "person {} appears on {} rosters, expected 1",
                    person_id, count
                ));
            }
        }

        Ok(())
    }
}
