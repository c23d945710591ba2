//! Tests for rating-period normalization and cache keys.

use chrono::{DateTime, Local, TimeZone};

use caissa::{Clock, PlayerKey, RatingPeriod, normalized_period};

struct FixedClock(DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

// =========================================================================
// Idempotent normalization
// =========================================================================

#[test]
fn any_instant_in_a_month_yields_the_same_key() {
    let clock = FixedClock(local(2026, 3, 15, 12, 0));

    let dates = [
        local(2026, 3, 1, 0, 0),
        local(2026, 3, 2, 10, 0),
        local(2026, 3, 28, 23, 59),
    ];
    let keys: Vec<String> = dates
        .iter()
        .map(|&d| PlayerKey::new(7, normalized_period(d, &clock)).to_string())
        .collect();

    assert_eq!(keys[0], "7-2026-03-01");
    assert!(keys.iter().all(|k| k == &keys[0]));
}

#[test]
fn different_months_yield_different_keys() {
    let clock = FixedClock(local(2026, 6, 15, 12, 0));

    let march = PlayerKey::new(7, normalized_period(local(2026, 3, 31, 23, 59), &clock));
    let april = PlayerKey::new(7, normalized_period(local(2026, 4, 1, 0, 0), &clock));

    assert_ne!(march, april);
    assert_eq!(march.to_string(), "7-2026-03-01");
    assert_eq!(april.to_string(), "7-2026-04-01");
}

// =========================================================================
// Future fallback
// =========================================================================

#[test]
fn future_dates_collapse_to_the_current_period() {
    let clock = FixedClock(local(2026, 1, 15, 12, 0));
    let current = RatingPeriod::new(2026, 1);

    assert_eq!(normalized_period(local(2026, 2, 13, 9, 0), &clock), current);
    assert_eq!(normalized_period(local(2027, 6, 15, 9, 0), &clock), current);
}

#[test]
fn current_and_past_periods_pass_through() {
    let clock = FixedClock(local(2026, 1, 15, 12, 0));

    assert_eq!(
        normalized_period(local(2026, 1, 31, 23, 0), &clock),
        RatingPeriod::new(2026, 1)
    );
    assert_eq!(
        normalized_period(local(2025, 12, 31, 23, 0), &clock),
        RatingPeriod::new(2025, 12)
    );
}

// =========================================================================
// Period ordering and rendering
// =========================================================================

#[test]
fn periods_order_chronologically() {
    assert!(RatingPeriod::new(2025, 12) < RatingPeriod::new(2026, 1));
    assert!(RatingPeriod::new(2026, 1) < RatingPeriod::new(2026, 2));
}

#[test]
fn period_renders_as_first_of_month() {
    assert_eq!(RatingPeriod::new(2026, 3).to_string(), "2026-03-01");
    assert_eq!(RatingPeriod::new(999, 11).to_string(), "0999-11-01");
}
