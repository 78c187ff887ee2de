// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Tobias Sarnowski

//! Tick sources and bounded busy-waits.
//!
//! A wait never relies on a magic iteration constant. Instead the caller
//! supplies a [`Clock`] and a [`TimeoutBudget`] expressed in that clock's
//! ticks. On the target the default clock is [`PollCounter`], which advances
//! one tick per poll and so reproduces a classic counted busy-loop; tests and
//! host builds can inject any other tick source.


use core::time::Duration;

/// Monotonic tick source.
pub trait Clock {
    /// Current tick count. Wraps around on overflow.
    fn now(&mut self) -> u64;
}

/// Clock that advances by one tick every time it is read.
///
/// With this clock a budget of `n` ticks allows `n` unsuccessful polls,
/// which makes the bound depend on the loop's instruction rate exactly like
/// a counted busy-wait does.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollCounter {
    polls: u64,
}

impl PollCounter {
    /// Create a counter starting at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { polls: 0 }
    }

    /// Number of times the counter has been read.
    #[inline]
    #[must_use]
    pub const fn polls(&self) -> u64 {
        self.polls
    }
}

impl Clock for PollCounter {
    #[inline]
    fn now(&mut self) -> u64 {
        self.polls = self.polls.wrapping_add(1);
        self.polls
    }
}

/// Upper bound on how long a primitive may wait for the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutBudget {
    /// Give up once this many ticks have elapsed.
    Ticks(u64),
    /// Wait forever.
    Unbounded,
}

impl TimeoutBudget {
    /// Budget of `ticks` clock ticks.
    #[must_use]
    pub const fn ticks(ticks: u64) -> Self {
        Self::Ticks(ticks)
    }

    /// Convert a wall-clock bound to ticks of a clock running at `tick_hz`.
    ///
    /// Saturates at `u64::MAX` ticks.
    #[must_use]
    pub fn from_duration(duration: Duration, tick_hz: u64) -> Self {
        let ticks = duration
            .as_nanos()
            .saturating_mul(u128::from(tick_hz))
            / 1_000_000_000;
        Self::Ticks(u64::try_from(ticks).unwrap_or(u64::MAX))
    }

    /// Whether `elapsed` ticks exhaust this budget.
    #[inline]
    #[must_use]
    pub const fn is_exhausted(self, elapsed: u64) -> bool {
        match self {
            Self::Ticks(limit) => elapsed >= limit,
            Self::Unbounded => false,
        }
    }
}

/// Poll `ready` until it returns `true` or `budget` runs out.
///
/// `ready` is always checked at least once, so a zero budget degrades to a
/// single non-blocking check. Returns whether the condition was met.
pub fn wait_until<C, F>(clock: &mut C, budget: TimeoutBudget, mut ready: F) -> bool
where
    C: Clock,
    F: FnMut() -> bool,
{
    let start = clock.now();
    loop {
        if ready() {
            return true;
        }
        let elapsed = clock.now().wrapping_sub(start);
        if budget.is_exhausted(elapsed) {
            return false;
        }
        core::hint::spin_loop();
    }
}
