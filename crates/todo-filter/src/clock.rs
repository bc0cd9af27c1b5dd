//! Reference-time sources for date resolution.
//!
//! Relative filter tokens (`today`, `16:00`, `Jan 3`) depend on "now". The
//! parser takes the clock as an argument so tests can pin it.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// A source of the current local instant.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Local>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock frozen at a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

impl<F> Clock for F
where
    F: Fn() -> DateTime<Local>,
{
    fn now(&self) -> DateTime<Local> {
        self()
    }
}

/// Interprets a wall-clock time in the local timezone.
///
/// Ambiguous times (DST fold) take the earlier instant. A time skipped by a
/// DST gap maps to whatever instant chrono's `earliest()` reports for it,
/// usually one near the transition with the pre-gap offset. `None` comes back
/// only when chrono finds no mapping at all.
pub(crate) fn localize(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    Local.from_local_datetime(&naive).earliest()
}
