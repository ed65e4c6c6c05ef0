//! Simulation clock: the day counter that drives the farm.
//!
//! Day 0 is the state before anything has happened. Each call to
//! [`SimulationClock::advance`] moves to the next day, and the day number
//! is stamped on ledger entries and day summaries.
//!
//! A week is seven days. The week number is derived from the day counter,
//! never stored.

/// Days in one simulated week.
const DAYS_PER_WEEK: u64 = 7;

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Day counter would overflow.
    #[error("day counter overflow: cannot advance beyond u64::MAX")]
    DayOverflow,
}

/// The simulation's day counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulationClock {
    /// Current day (0 before the first day has run).
    day: u64,
}

impl SimulationClock {
    /// Create a clock at day 0.
    pub const fn new() -> Self {
        Self { day: 0 }
    }

    /// Create a clock at a given day (for state restoration).
    pub const fn from_day(day: u64) -> Self {
        Self { day }
    }

    /// Advance by one day. Returns the new day number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::DayOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.day = self.day.checked_add(1).ok_or(ClockError::DayOverflow)?;
        Ok(self.day)
    }

    /// Current day number.
    pub const fn day(&self) -> u64 {
        self.day
    }

    /// Week the current day falls in. Days 1-7 are week 1; day 0 is week 0.
    pub fn week(&self) -> u64 {
        self.day
            .saturating_add(DAYS_PER_WEEK.saturating_sub(1))
            .checked_div(DAYS_PER_WEEK)
            .unwrap_or(0)
    }

    /// Whether the current day closes a week.
    pub fn is_end_of_week(&self) -> bool {
        self.day > 0 && self.day.checked_rem(DAYS_PER_WEEK) == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_starts_at_day_zero() {
        let clock = SimulationClock::new();
        assert_eq!(clock.day(), 0);
        assert_eq!(clock.week(), 0);
    }

    #[test]
    fn clock_advances() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.advance(), Ok(1));
        assert_eq!(clock.advance(), Ok(2));
        assert_eq!(clock.day(), 2);
    }

    #[test]
    fn clock_overflow_is_an_error() {
        let mut clock = SimulationClock::from_day(u64::MAX);
        assert_eq!(clock.advance(), Err(ClockError::DayOverflow));
        assert_eq!(clock.day(), u64::MAX);
    }

    #[test]
    fn weeks_are_seven_days() {
        assert_eq!(SimulationClock::from_day(1).week(), 1);
        assert_eq!(SimulationClock::from_day(7).week(), 1);
        assert_eq!(SimulationClock::from_day(8).week(), 2);
        assert!(SimulationClock::from_day(14).is_end_of_week());
        assert!(!SimulationClock::from_day(13).is_end_of_week());
        assert!(!SimulationClock::new().is_end_of_week());
    }
}
