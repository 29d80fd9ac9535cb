//! # Time Source
//!
//! Validators never read the wall clock themselves. The engine asks a
//! [`Clock`] once per submission and passes `now_ms` down explicitly, so the
//! same input always produces the same verdict.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch.
pub type EpochMillis = i64;

/// Source of "now" for timing and rate checks.
pub trait Clock {
    /// Current time in epoch milliseconds.
    fn now_ms(&self) -> EpochMillis;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> EpochMillis {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| EpochMillis::try_from(d.as_millis()).unwrap_or(EpochMillis::MAX))
            .unwrap_or(0)
    }
}

/// A clock frozen at one instant. Used for replays, audits and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub EpochMillis);

impl Clock for FixedClock {
    fn now_ms(&self) -> EpochMillis {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> EpochMillis {
        (**self).now_ms()
    }
}
