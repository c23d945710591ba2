//! Rating periods and lookup-date normalization.
//!
//! Federation ratings are monthly snapshots: every instant inside a
//! calendar month maps to the same [`RatingPeriod`], and a period in the
//! future maps to the current one (the upstream source has no data for
//! months that have not been reached yet). All cache-key derivation must
//! route through [`normalized_period`] so the future fallback happens in
//! exactly one place.
//!
//! Periods are derived from the **local** calendar, not UTC. Game dates
//! arrive as plain strings like `"2026-03-02"`; interpreting them in UTC
//! would shift instants near midnight into the neighbouring day and, at
//! month boundaries, into the wrong period.

use std::fmt;

use chrono::{DateTime, Datelike, Local};

use crate::types::PlayerId;

/// Source of "now" for period normalization.
///
/// Injected so the future-period fallback is deterministic under test.
/// Production code uses [`SystemClock`].
pub trait Clock: Send + Sync {
    /// Current wall-clock time in the local timezone.
    fn now(&self) -> DateTime<Local>;
}

/// [`Clock`] backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// The calendar month whose rating snapshot applies.
///
/// Ordered chronologically; renders as the first day of the month
/// (`YYYY-MM-01`), which is also the date format the upstream API takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RatingPeriod {
    year: i32,
    month: u32,
}

impl RatingPeriod {
    /// Period for a given year and month (1-12).
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month), "month out of range: {month}");
        Self { year, month }
    }

    /// The period containing `instant`, by the local calendar.
    ///
    /// An instant exactly at a month boundary belongs to the month it
    /// starts, not the one it ends.
    pub fn containing(instant: DateTime<Local>) -> Self {
        Self {
            year: instant.year(),
            month: instant.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for RatingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-01", self.year, self.month)
    }
}

/// Map a lookup instant to the period its rating request should use.
///
/// Returns the period containing `instant`, unless that period lies
/// beyond the period containing `clock.now()` — a request for a month the
/// calendar has not reached falls back to the current period rather than
/// surfacing an empty upstream result. A date one day into the future and
/// a date years ahead collapse to the same period.
///
/// This is the only place the future fallback is applied; every cache key
/// must be derived through here.
pub fn normalized_period(instant: DateTime<Local>, clock: &dyn Clock) -> RatingPeriod {
    let requested = RatingPeriod::containing(instant);
    let current = RatingPeriod::containing(clock.now());
    requested.min(current)
}

/// Cache key for a player rating snapshot: entity id plus period.
///
/// Renders as `"{id}-{YYYY-MM-01}"`. Two instants in the same calendar
/// month produce byte-identical rendered keys, which is what makes the
/// cache effective when callers pass arbitrary game dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerKey {
    pub id: PlayerId,
    pub period: RatingPeriod,
}

impl PlayerKey {
    pub fn new(id: PlayerId, period: RatingPeriod) -> Self {
        Self { id, period }
    }
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.id, self.period)
    }
}
