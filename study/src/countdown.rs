//! One-shot countdown for a single card side.

#[cfg(test)]
#[path = "countdown_test.rs"]
mod countdown_test;

use crate::card::CountdownBehavior;

/// Counts whole seconds down to zero and fires its behavior once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    behavior: CountdownBehavior,
    fired: bool,
}

impl Countdown {
    /// `None` when `seconds` is zero (no countdown on this side).
    #[must_use]
    pub fn start(seconds: u32, behavior: CountdownBehavior) -> Option<Self> {
        (seconds > 0).then_some(Self { remaining: seconds, behavior, fired: false })
    }

    /// Advance one second. Returns the behavior on the tick that reaches zero
    /// and `None` on every other tick, including all ticks after firing.
    pub fn tick(&mut self) -> Option<CountdownBehavior> {
        if self.fired {
            return None;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.fired = true;
            return Some(self.behavior);
        }
        None
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[must_use]
    pub fn behavior(&self) -> CountdownBehavior {
        self.behavior
    }

    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.fired
    }
}
