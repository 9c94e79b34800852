//! GPIO bindings
//!
//! `initial_state` is the electrical level the pin is opened with.
//! `invert` only changes what "on" means: an inverted pin (active-low LED,
//! relay board) is on when driven low.

use genx_hal::{Direction, GpioError, Level, PinId, Platform};

/// GPIO pin binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioBinding {
    pub pin: PinId,
    pub name: &'static str,
    pub direction: Direction,
    pub initial_state: Level,
    /// Pin is active-low
    pub invert: bool,
}

impl GpioBinding {
    /// Open the pin according to its direction
    pub fn open(&self, platform: &mut dyn Platform) -> Result<(), GpioError> {
        match self.direction {
            Direction::Output => platform.open_output(self.pin, self.initial_state),
            Direction::Input => platform.open_input(self.pin),
            Direction::Unknown => Err(GpioError::WrongDirection),
        }
    }

    pub fn close(&self, platform: &mut dyn Platform) -> Result<(), GpioError> {
        platform.close(self.pin)
    }

    /// Electrical level meaning "on"
    pub fn active_level(&self) -> Level {
        Level::from_bool(!self.invert)
    }

    /// Drive the pin to its active level
    pub fn on(&self, platform: &mut dyn Platform) -> Result<(), GpioError> {
        self.set(platform, true)
    }

    pub fn off(&self, platform: &mut dyn Platform) -> Result<(), GpioError> {
        self.set(platform, false)
    }

    /// Switch the pin on or off, honouring inversion
    pub fn set(&self, platform: &mut dyn Platform, on: bool) -> Result<(), GpioError> {
        if self.direction != Direction::Output {
            return Err(GpioError::WrongDirection);
        }
        let level = if on {
            self.active_level()
        } else {
            self.active_level().inverted()
        };
        platform.write(self.pin, level)
    }

    /// Raw electrical level
    pub fn read(&self, platform: &mut dyn Platform) -> Result<Level, GpioError> {
        platform.read(self.pin)
    }

    /// Whether the pin is at its active level
    pub fn is_on(&self, platform: &mut dyn Platform) -> Result<bool, GpioError> {
        Ok(self.read(platform)?.is_high() != self.invert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genx_hal_sim::SimPlatform;

    const LED: GpioBinding = GpioBinding {
        pin: PinId(8),
        name: "Led",
        direction: Direction::Output,
        initial_state: Level::Low,
        invert: false,
    };

    const RELAY: GpioBinding = GpioBinding {
        pin: PinId(9),
        name: "Relay",
        direction: Direction::Output,
        initial_state: Level::High,
        invert: true,
    };

    const BUTTON: GpioBinding = GpioBinding {
        pin: PinId(12),
        name: "Button",
        direction: Direction::Input,
        initial_state: Level::Low,
        invert: true,
    };

    #[test]
    fn test_open_uses_initial_level() {
        let mut sim = SimPlatform::new();
        LED.open(&mut sim).unwrap();
        RELAY.open(&mut sim).unwrap();

        assert_eq!(sim.pin(PinId(8)).unwrap().level, Level::Low);
        assert_eq!(sim.pin(PinId(9)).unwrap().level, Level::High);
        // Inverted relay opened high is off
        assert!(!RELAY.is_on(&mut sim).unwrap());
    }

    #[test]
    fn test_on_off_plain_pin() {
        let mut sim = SimPlatform::new();
        LED.open(&mut sim).unwrap();

        LED.on(&mut sim).unwrap();
        assert_eq!(sim.pin(PinId(8)).unwrap().level, Level::High);
        LED.off(&mut sim).unwrap();
        assert_eq!(sim.pin(PinId(8)).unwrap().level, Level::Low);
    }

    #[test]
    fn test_on_off_inverted_pin() {
        let mut sim = SimPlatform::new();
        RELAY.open(&mut sim).unwrap();

        RELAY.on(&mut sim).unwrap();
        assert_eq!(sim.pin(PinId(9)).unwrap().level, Level::Low);
        assert!(RELAY.is_on(&mut sim).unwrap());
    }

    #[test]
    fn test_input_pin() {
        let mut sim = SimPlatform::new();
        BUTTON.open(&mut sim).unwrap();
        assert_eq!(BUTTON.on(&mut sim), Err(GpioError::WrongDirection));

        // Active-low button pressed
        sim.set_input(PinId(12), Level::Low);
        assert!(BUTTON.is_on(&mut sim).unwrap());
    }

    #[test]
    fn test_unknown_direction_cannot_open() {
        let mut sim = SimPlatform::new();
        let pin = GpioBinding {
            direction: Direction::Unknown,
            ..LED
        };
        assert_eq!(pin.open(&mut sim), Err(GpioError::WrongDirection));
        assert!(sim.calls().is_empty());
    }
}
