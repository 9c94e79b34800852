//! Timer abstractions
//!
//! Timers are owned by the runtime's event loop and identified by the name
//! of the binding that declared them. Expiry is reported back to the
//! application as [`crate::Event::TimerExpired`].

use core::time::Duration;

/// Errors from timer operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// Runtime could not create or arm the timer
    CreateFailed,
    /// Period or delay of zero
    InvalidPeriod,
    /// Timer was not running
    NotRunning,
}

/// Timer subsystem
pub trait Timers {
    /// Start (or restart) a periodic timer
    fn start_periodic(&mut self, name: &'static str, period: Duration) -> Result<(), TimerError>;

    /// Arm a timer that fires once after `delay`
    fn start_oneshot(&mut self, name: &'static str, delay: Duration) -> Result<(), TimerError>;

    /// Disarm a timer
    fn stop_timer(&mut self, name: &'static str) -> Result<(), TimerError>;
}
