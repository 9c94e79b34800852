//! GPIO abstractions
//!
//! Provides the GPIO driver trait that bindings open and close pins
//! through.

/// Hardware GPIO identifier (e.g. `MT3620_GPIO8`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u16);

/// Electrical level of a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    #[default]
    Low,
    High,
}

impl Level {
    /// Opposite level
    pub fn inverted(self) -> Self {
        match self {
            Level::Low => Level::High,
            Level::High => Level::Low,
        }
    }

    /// Level for a logic value
    pub fn from_bool(high: bool) -> Self {
        if high {
            Level::High
        } else {
            Level::Low
        }
    }

    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
    /// Direction not configured; such a pin cannot be opened
    #[default]
    Unknown,
}

/// Errors from GPIO driver operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Driver refused to open the pin
    OpenFailed,
    /// Pin used before it was opened
    NotOpen,
    /// Write to an input or read of an unsupported pin
    WrongDirection,
    /// Driver level I/O failure
    Io,
}

/// GPIO driver
///
/// Pins are addressed by [`PinId`]. Implementations own the file
/// descriptors (or registers) behind each opened pin.
pub trait Gpio {
    /// Open a pin as output, driving `initial` immediately
    fn open_output(&mut self, pin: PinId, initial: Level) -> Result<(), GpioError>;

    /// Open a pin as input
    fn open_input(&mut self, pin: PinId) -> Result<(), GpioError>;

    /// Release a previously opened pin
    fn close(&mut self, pin: PinId) -> Result<(), GpioError>;

    /// Drive an output pin
    fn write(&mut self, pin: PinId, level: Level) -> Result<(), GpioError>;

    /// Sample a pin
    fn read(&mut self, pin: PinId) -> Result<Level, GpioError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_inversion() {
        assert_eq!(Level::Low.inverted(), Level::High);
        assert_eq!(Level::High.inverted(), Level::Low);
        assert_eq!(Level::from_bool(true), Level::High);
        assert!(!Level::default().is_high());
    }

    #[test]
    fn test_default_direction_is_unknown() {
        assert_eq!(Direction::default(), Direction::Unknown);
    }
}
