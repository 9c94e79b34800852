//! Timer bindings

use core::time::Duration;

use genx_hal::{Platform, TimerError};

/// Delay used when the binding set starts its one-shot timers
pub const ONESHOT_DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Handler called on each expiry
pub type TimerHandler = fn(&mut dyn Platform, &TimerBinding);

/// Named timer binding
///
/// `period` is required for timers started as periodic. One-shot timers
/// may leave it `None` and are armed with an explicit delay.
#[derive(Debug, Clone, Copy)]
pub struct TimerBinding {
    pub name: &'static str,
    pub period: Option<Duration>,
    pub handler: TimerHandler,
}

impl TimerBinding {
    /// Start as a periodic timer
    pub fn start(&self, platform: &mut dyn Platform) -> Result<(), TimerError> {
        let period = self.period.ok_or(TimerError::InvalidPeriod)?;
        platform.start_periodic(self.name, period)
    }

    /// Arm (or re-arm) as a one-shot firing after `delay`
    pub fn start_oneshot(
        &self,
        platform: &mut dyn Platform,
        delay: Duration,
    ) -> Result<(), TimerError> {
        platform.start_oneshot(self.name, delay)
    }

    pub fn stop(&self, platform: &mut dyn Platform) -> Result<(), TimerError> {
        platform.stop_timer(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genx_hal::{Event, EventSource};
    use genx_hal_sim::SimPlatform;

    fn noop(_: &mut dyn Platform, _: &TimerBinding) {}

    static POLL: TimerBinding = TimerBinding {
        name: "Poll",
        period: Some(Duration::from_millis(500)),
        handler: noop,
    };

    static DELAYED: TimerBinding = TimerBinding {
        name: "Delayed",
        period: None,
        handler: noop,
    };

    #[test]
    fn test_start_periodic() {
        let mut sim = SimPlatform::new();
        POLL.start(&mut sim).unwrap();
        sim.advance(Duration::from_secs(1));

        assert_eq!(sim.next_event(), Some(Event::TimerExpired("Poll".into())));
        assert_eq!(sim.next_event(), Some(Event::TimerExpired("Poll".into())));
        assert_eq!(sim.next_event(), None);
    }

    #[test]
    fn test_periodic_without_period_rejected() {
        let mut sim = SimPlatform::new();
        assert_eq!(DELAYED.start(&mut sim), Err(TimerError::InvalidPeriod));
        assert!(sim.calls().is_empty());
    }

    #[test]
    fn test_oneshot_and_stop() {
        let mut sim = SimPlatform::new();
        DELAYED.start_oneshot(&mut sim, ONESHOT_DEFAULT_DELAY).unwrap();
        assert!(sim.timer_running("Delayed"));

        DELAYED.stop(&mut sim).unwrap();
        assert!(!sim.timer_running("Delayed"));
    }
}
