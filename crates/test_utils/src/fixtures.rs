//! Pre-built Test Fixtures
//!
//! Ready-to-use test data for common entities across the decisioning
//! system. Fixtures are consistent and predictable for unit tests.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{Currency, CustomerId, Money};
use domain_claims::Customer;
use rust_decimal_macros::dec;

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// A routine repair invoice amount
    pub fn usd_repair() -> Money {
        Money::new(dec!(850.00), Currency::USD)
    }

    /// A small claim well under any approval threshold
    pub fn usd_small() -> Money {
        Money::new(dec!(120.00), Currency::USD)
    }

    /// A full system replacement, large enough to trip amount rules
    pub fn usd_replacement() -> Money {
        Money::new(dec!(14500.00), Currency::USD)
    }

    /// A zero amount
    pub fn usd_zero() -> Money {
        Money::zero(Currency::USD)
    }
}

/// Fixture for temporal test data
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// Mid-morning on a weekday, inside business hours everywhere sane
    pub fn business_hours() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 10, 30, 0).unwrap()
    }

    /// Three in the morning UTC, inside the overnight quiet window
    pub fn overnight() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 3, 0, 0).unwrap()
    }

    /// A timestamp `days` before the business-hours anchor
    pub fn days_before(days: i64) -> DateTime<Utc> {
        Self::business_hours() - chrono::Duration::days(days)
    }
}

/// Fixture for customer test data
pub struct CustomerFixtures;

impl CustomerFixtures {
    /// A stable, well-formed customer
    pub fn residential() -> Customer {
        Customer {
            id: CustomerId::new(),
            name: "Dewi Hartono".to_string(),
            email: "dewi.hartono@example.com".to_string(),
        }
    }

    /// A second distinct customer for cross-customer isolation tests
    pub fn commercial() -> Customer {
        Customer {
            id: CustomerId::new(),
            name: "Bintang Facilities Pte Ltd".to_string(),
            email: "facilities@bintang.example.com".to_string(),
        }
    }
}
