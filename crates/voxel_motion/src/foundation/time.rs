//! Simulation tick bookkeeping
//!
//! The world owns one [`TickClock`] and advances it once per simulation
//! step. Per-tick accumulators compare against it instead of wall-clock time
//! so that replays and peers agree on when a tick window starts.

/// Monotonic simulation tick counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickClock {
    tick: u64,
}

impl TickClock {
    /// Create a clock starting at tick zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock starting at an arbitrary tick (e.g. after loading a save)
    pub fn starting_at(tick: u64) -> Self {
        Self { tick }
    }

    /// Advance to the next tick (should be called once per simulation step)
    pub fn advance(&mut self) -> u64 {
        self.tick = self.tick.wrapping_add(1);
        self.tick
    }

    /// Get the current tick
    pub fn current(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_monotonic() {
        let mut clock = TickClock::starting_at(41);
        assert_eq!(clock.current(), 41);
        assert_eq!(clock.advance(), 42);
        assert_eq!(clock.current(), 42);
    }
}
