//! Tests for the Person model: job search, commuting and purchasing

use market_simulator_core_rs::models::market::Market;
use market_simulator_core_rs::models::person::{JobSwitch, PersonParams};
use market_simulator_core_rs::{Person, Position, Producer};

const FOOD: usize = 0;
const GASOLINE: usize = 1;
const COFFEE: usize = 2;

/// food 10, gasoline 5, coffee 2, plenty of stock
fn stocked_market() -> Market {
    Market::new(vec![
        Producer::new("food", 10, 1000),
        Producer::new("gasoline", 5, 1000),
        Producer::new("coffee", 2, 1000),
    ])
    .unwrap()
}

/// Market with nothing to buy and nobody hiring
fn empty_market() -> Market {
    Market::new(vec![
        Producer::new("food", 10, 0),
        Producer::new("gasoline", 5, 0),
        Producer::new("coffee", 2, 0),
    ])
    .unwrap()
}

fn hiring_market(offers: [(i64, usize); 3]) -> Market {
    let producers = ["food", "gasoline", "coffee"]
        .iter()
        .zip(offers)
        .map(|(name, (salary, max_hires))| {
            Producer::new(*name, 10, 0)
                .with_salary(salary)
                .with_max_hires(max_hires)
        })
        .collect();
    Market::new(producers).unwrap()
}

// ============================================================================
// Job search
// ============================================================================

#[test]
fn test_lower_index_wins_tie_break() {
    let mut market = hiring_market([(20, 1), (30, 1), (0, 0)]);
    market.producer_mut(COFFEE).enroll_employee(0);
    let mut person = Person::new(0, COFFEE, 0).with_salary(10);

    let switch = person.check_new_jobs(&mut market, 1.5);

    // First eligible producer, not the best-paying one
    assert_eq!(
        switch,
        Some(JobSwitch {
            from: COFFEE,
            to: FOOD,
            offered_salary: 20,
        })
    );
    assert_eq!(person.employer(), FOOD);
    assert!(market.producer(FOOD).employs(0));
    assert!(!market.producer(COFFEE).employs(0));
}

#[test]
fn test_full_quota_skips_to_next_producer() {
    let mut market = hiring_market([(20, 0), (15, 1), (0, 0)]);
    market.producer_mut(COFFEE).enroll_employee(0);
    let mut person = Person::new(0, COFFEE, 0).with_salary(10);

    let switch = person.check_new_jobs(&mut market, 1.5);

    assert_eq!(switch.map(|s| s.to), Some(GASOLINE));
    assert_eq!(market.producer(GASOLINE).month_hires(), 1);
    assert!(market.producer(FOOD).employees().is_empty());
}

#[test]
fn test_insufficient_raise_keeps_job() {
    let mut market = hiring_market([(14, 5), (14, 5), (0, 0)]);
    market.producer_mut(COFFEE).enroll_employee(0);
    let mut person = Person::new(0, COFFEE, 0).with_salary(10);

    assert_eq!(person.check_new_jobs(&mut market, 1.5), None);
    assert_eq!(person.employer(), COFFEE);
    assert!(market.producer(COFFEE).employs(0));
}

#[test]
fn test_current_employer_never_considered() {
    let mut market = hiring_market([(100, 5), (0, 0), (0, 0)]);
    market.producer_mut(FOOD).enroll_employee(0);
    let mut person = Person::new(0, FOOD, 0).with_salary(10);

    assert_eq!(person.check_new_jobs(&mut market, 1.5), None);
    assert_eq!(market.producer(FOOD).month_hires(), 0);
}

// ============================================================================
// Payout
// ============================================================================

#[test]
fn test_payout_doubles_wallet_before_purchases() {
    let mut market = empty_market();
    market.producer_mut(FOOD).enroll_employee(0);
    let mut person = Person::new(0, FOOD, 500);
    let params = PersonParams {
        job_switch_multiplier: 1.5,
        gas_consumption_per_distance: 1.0,
    };

    let month = person.step(&mut market, &params, true);

    assert_eq!(month.payout, Some((500, 1000)));
    assert_eq!(person.wallet(), 1000);
}

#[test]
fn test_no_payout_outside_payout_month() {
    let mut market = empty_market();
    market.producer_mut(FOOD).enroll_employee(0);
    let mut person = Person::new(0, FOOD, 500);
    let params = PersonParams {
        job_switch_multiplier: 1.5,
        gas_consumption_per_distance: 1.0,
    };

    let month = person.step(&mut market, &params, false);

    assert_eq!(month.payout, None);
    assert_eq!(person.wallet(), 500);
}

// ============================================================================
// Commute
// ============================================================================

#[test]
fn test_gas_consumption_floors_distance_cost() {
    let market = Market::new(vec![
        Producer::new("food", 10, 0).with_position(Position::new(3, 4)),
        Producer::new("gasoline", 5, 0),
        Producer::new("coffee", 2, 0),
    ])
    .unwrap();
    let mut person = Person::new(0, FOOD, 0).with_position(Position::new(0, 0));

    // distance 5 * 1.5 = 7.5
    person.calculate_gas_consumption(&market, 1.5);
    assert_eq!(person.monthly_gas_intake(), 7);

    person.calculate_gas_consumption(&market, 0.0);
    assert_eq!(person.monthly_gas_intake(), 0);
}

// ============================================================================
// Purchasing
// ============================================================================

#[test]
fn test_units_to_purchase() {
    let market = Market::new(vec![
        Producer::new("food", 10, 20),
        Producer::new("gasoline", 5, 0),
        Producer::new("coffee", 2, 0),
    ])
    .unwrap();
    let food = market.producer(FOOD);

    assert_eq!(Person::new(0, FOOD, 0).units_to_purchase(food, 30), 0);
    assert_eq!(Person::new(0, FOOD, 300).units_to_purchase(food, 30), 30);
    // Short of the full intake: limited by wallet, then by stock
    assert_eq!(Person::new(0, FOOD, 150).units_to_purchase(food, 30), 15);
    assert_eq!(Person::new(0, FOOD, 250).units_to_purchase(food, 30), 20);
}

#[test]
fn test_buy_goods_with_top_up_and_coffee_residual() {
    let mut market = stocked_market();
    let mut person = Person::new(0, FOOD, 1000)
        .with_savings_ratio(0.1)
        .with_food_intake(30)
        .with_gas_intake(10);

    let purchases = person.buy_goods(&mut market);

    // 100 saved; 900 spent as food 300, gas 50, food 300, coffee 250
    assert_eq!(purchases.len(), 4);
    assert_eq!(person.wallet(), 100);
    assert_eq!(person.food_consumption(), 60);
    assert_eq!(person.gas_consumption(), 10);
    assert_eq!(person.coffee_consumption(), 125);

    assert_eq!(market.producer(FOOD).bank_balance(), 600);
    assert_eq!(market.producer(GASOLINE).bank_balance(), 50);
    assert_eq!(market.producer(COFFEE).bank_balance(), 250);
}

#[test]
fn test_buy_goods_skips_top_up_when_short() {
    let mut market = stocked_market();
    let mut person = Person::new(0, FOOD, 500).with_food_intake(30);

    let purchases = person.buy_goods(&mut market);

    // food 300, no gas, 200 left is not more than a batch, coffee 100 units
    assert_eq!(purchases.len(), 3);
    assert_eq!(person.food_consumption(), 30);
    assert_eq!(person.coffee_consumption(), 100);
    assert_eq!(person.wallet(), 0);
}

#[test]
fn test_buy_goods_partial_food_when_poor() {
    let mut market = stocked_market();
    let mut person = Person::new(0, FOOD, 105).with_food_intake(30);

    person.buy_goods(&mut market);

    assert_eq!(person.food_consumption(), 10);
    assert_eq!(person.coffee_consumption(), 2);
    assert_eq!(person.wallet(), 1);
}

#[test]
fn test_consumption_records_units_actually_sold() {
    let mut market = Market::new(vec![
        Producer::new("food", 10, 5),
        Producer::new("gasoline", 5, 0),
        Producer::new("coffee", 2, 0),
    ])
    .unwrap();
    let mut person = Person::new(0, FOOD, 1000).with_food_intake(30);

    person.buy_goods(&mut market);

    assert_eq!(person.food_consumption(), 5);
    assert_eq!(person.wallet(), 950);
    assert_eq!(market.producer(FOOD).stock(), 0);
}

#[test]
#[should_panic(expected = "savings_ratio must be within [0, 1)")]
fn test_savings_ratio_of_one_rejected() {
    Person::new(0, FOOD, 0).with_savings_ratio(1.0);
}
