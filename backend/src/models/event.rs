//! Event logging for simulation replay and auditing.
//!
//! Every significant state change of a month is recorded as an [`Event`]:
//! - **Producer phase**: price/production adjustment, production-cost
//!   purchases, payroll
//! - **Person phase**: payout, job switches, purchases
//!
//! Events are logged in the order they happen, so replaying the log for a
//! month reproduces its money flows exactly.
//!
//! # Example
//!
//! ```rust
//! use market_simulator_core_rs::models::{Event, EventLog};
//!
//! let mut log = EventLog::new();
//! log.log(Event::Payout {
//!     month: 49,
//!     person: 3,
//!     wallet_before: 500,
//!     wallet_after: 1000,
//! });
//!
//! assert_eq!(log.events_in_month(49).len(), 1);
//! assert_eq!(log.events_for_person(3)[0].event_type(), "Payout");
//! ```

use crate::models::person::PersonId;
use crate::models::producer::ProducerId;
use serde::{Deserialize, Serialize};

/// Simulation event capturing a state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Price and production reacted to last month's stock
    PriceAdjusted {
        month: usize,
        producer: ProducerId,
        sold_out: bool,
        old_price: i64,
        new_price: i64,
        old_production: i64,
        new_production: i64,
    },

    /// Producer bought inputs for unpaid production
    ProductionCostPaid {
        month: usize,
        buyer: ProducerId,
        supplier: ProducerId,
        units: i64,
        cost: i64,
    },

    /// Producer paid its employees
    Payroll {
        month: usize,
        producer: ProducerId,
        salary: i64,
        employees: usize,
        total_paid: i64,
    },

    /// Wallet doubled on the payout month
    Payout {
        month: usize,
        person: PersonId,
        wallet_before: i64,
        wallet_after: i64,
    },

    /// Person moved to a better-paying producer
    JobSwitch {
        month: usize,
        person: PersonId,
        from: ProducerId,
        to: ProducerId,
        offered_salary: i64,
    },

    /// Person bought goods
    Purchase {
        month: usize,
        person: PersonId,
        producer: ProducerId,
        units: i64,
        cost: i64,
    },
}

impl Event {
    /// Month in which this event occurred
    pub fn month(&self) -> usize {
        match self {
            Event::PriceAdjusted { month, .. }
            | Event::ProductionCostPaid { month, .. }
            | Event::Payroll { month, .. }
            | Event::Payout { month, .. }
            | Event::JobSwitch { month, .. }
            | Event::Purchase { month, .. } => *month,
        }
    }

    /// Short name of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::PriceAdjusted { .. } => "PriceAdjusted",
            Event::ProductionCostPaid { .. } => "ProductionCostPaid",
            Event::Payroll { .. } => "Payroll",
            Event::Payout { .. } => "Payout",
            Event::JobSwitch { .. } => "JobSwitch",
            Event::Purchase { .. } => "Purchase",
        }
    }

    /// Person this event concerns, if any
    pub fn person(&self) -> Option<PersonId> {
        match self {
            Event::Payout { person, .. }
            | Event::JobSwitch { person, .. }
            | Event::Purchase { person, .. } => Some(*person),
            _ => None,
        }
    }
}

/// Event log for storing and querying simulation events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn log(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_in_month(&self, month: usize) -> Vec<&Event> {
        self.events.iter().filter(|e| e.month() == month).collect()
    }

    pub fn events_of_type(&self, event_type: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.event_type() == event_type)
            .collect()
    }

    pub fn events_for_person(&self, person: PersonId) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|e| e.person() == Some(person))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase(month: usize, person: PersonId) -> Event {
        Event::Purchase {
            month,
            person,
            producer: 0,
            units: 3,
            cost: 30,
        }
    }

    #[test]
    fn test_event_month_and_type() {
        let event = Event::Payroll {
            month: 7,
            producer: 1,
            salary: 40,
            employees: 2,
            total_paid: 80,
        };
        assert_eq!(event.month(), 7);
        assert_eq!(event.event_type(), "Payroll");
        assert_eq!(event.person(), None);
    }

    #[test]
    fn test_event_log_queries() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        log.log(purchase(1, 0));
        log.log(purchase(1, 1));
        log.log(purchase(2, 0));

        assert_eq!(log.len(), 3);
        assert_eq!(log.events_in_month(1).len(), 2);
        assert_eq!(log.events_for_person(0).len(), 2);
        assert_eq!(log.events_of_type("Purchase").len(), 3);
        assert!(log.events_of_type("JobSwitch").is_empty());

        log.clear();
        assert!(log.is_empty());
    }
}
