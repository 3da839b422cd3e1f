//! Drop clock - gravity interval policy
//!
//! The clock does not own a timer. Hosts either schedule their own periodic
//! trigger using [`DropClock::interval_ms`], or feed elapsed frame time into
//! [`DropClock::advance`] and fire one gravity step per returned tick.

use crate::types::{DROP_FLOOR_MS, INITIAL_DROP_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropClock {
    interval_ms: u32,
    elapsed_ms: u32,
    running: bool,
}

impl DropClock {
    /// Clock at the level-1 interval, running.
    pub fn new() -> Self {
        Self {
            interval_ms: INITIAL_DROP_MS,
            elapsed_ms: 0,
            running: true,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Reconfigure the interval (floored at [`DROP_FLOOR_MS`]).
    ///
    /// Time already accumulated carries over to the new interval.
    pub fn set_interval_ms(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(DROP_FLOOR_MS);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed_ms = 0;
    }

    /// Accumulate `elapsed_ms` and return how many ticks are due.
    ///
    /// A stopped clock never ticks and does not accumulate.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if !self.running {
            return 0;
        }
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        let due = self.elapsed_ms / self.interval_ms;
        self.elapsed_ms %= self.interval_ms;
        due
    }
}

impl Default for DropClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock_uses_initial_interval() {
        let clock = DropClock::new();
        assert_eq!(clock.interval_ms(), 600);
        assert!(clock.is_running());
    }

    #[test]
    fn test_advance_fires_once_per_interval() {
        let mut clock = DropClock::new();
        assert_eq!(clock.advance(599), 0);
        assert_eq!(clock.advance(1), 1);
        assert_eq!(clock.advance(300), 0);
        assert_eq!(clock.advance(900), 2);
    }

    #[test]
    fn test_interval_is_floored() {
        let mut clock = DropClock::new();
        clock.set_interval_ms(10);
        assert_eq!(clock.interval_ms(), 80);
    }

    #[test]
    fn test_stopped_clock_never_ticks() {
        let mut clock = DropClock::new();
        clock.advance(500);
        clock.stop();
        assert_eq!(clock.advance(10_000), 0);
    }
}
