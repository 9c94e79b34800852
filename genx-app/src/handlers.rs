//! Binding handlers
//!
//! Sensor readings are simulated; swap [`read_sensors`] for a real driver
//! on hardware.

use core::ops::RangeInclusive;
use core::sync::atomic::{AtomicU32, Ordering};

use genx_core::{
    DeviceTwinBinding, DirectMethodBinding, MethodResponse, Platform, Telemetry, TimerBinding,
    TwinStatus, TwinUpdate, TwinValue,
};
use log::{info, warn};
use serde_json::{json, Value};

/// Accepted pressure alert thresholds (hPa)
pub const PRESSURE_ALERT_RANGE: RangeInclusive<f32> = 850.0..=1100.0;

/// Bits of the current alert level; `u32::MAX` until a desired value arrives
static PRESSURE_ALERT_LEVEL: AtomicU32 = AtomicU32::new(u32::MAX);

/// Number of measurements taken
static MEASUREMENTS: AtomicU32 = AtomicU32::new(0);

/// Current pressure alert threshold, if one has been set
pub fn pressure_alert_level_value() -> Option<f32> {
    match PRESSURE_ALERT_LEVEL.load(Ordering::Relaxed) {
        u32::MAX => None,
        bits => Some(f32::from_bits(bits)),
    }
}

/// `PressureAlertLevel` desired property
pub fn pressure_alert_level(
    _platform: &mut dyn Platform,
    binding: &DeviceTwinBinding,
    update: &TwinUpdate,
) -> TwinStatus {
    let TwinValue::Float(level) = update.value else {
        return TwinStatus::Invalid;
    };

    if !PRESSURE_ALERT_RANGE.contains(&level) {
        warn!(
            "{} {} outside {:?}",
            binding.property, level, PRESSURE_ALERT_RANGE
        );
        return TwinStatus::Error;
    }

    PRESSURE_ALERT_LEVEL.store(level.to_bits(), Ordering::Relaxed);
    info!("{} set to {}", binding.property, level);
    TwinStatus::Completed
}

/// `OfficeLightOn` direct method
pub fn office_light_on(
    platform: &mut dyn Platform,
    binding: &DirectMethodBinding,
    payload: &Value,
) -> MethodResponse {
    switch_context(platform, binding, payload)
}

/// `FanOn` direct method
pub fn fan_on(
    platform: &mut dyn Platform,
    binding: &DirectMethodBinding,
    payload: &Value,
) -> MethodResponse {
    switch_context(platform, binding, payload)
}

/// Drive the method's GPIO on or off
///
/// Accepts `{"state": bool}`, a bare bool, or no payload (on).
fn switch_context(
    platform: &mut dyn Platform,
    binding: &DirectMethodBinding,
    payload: &Value,
) -> MethodResponse {
    let Some(gpio) = binding.context.gpio() else {
        return MethodResponse::failed("method has no GPIO");
    };

    let on = match payload {
        Value::Null => true,
        Value::Bool(on) => *on,
        Value::Object(fields) => match fields.get("state") {
            None => true,
            Some(Value::Bool(on)) => *on,
            Some(_) => return MethodResponse::failed("state must be true or false"),
        },
        _ => return MethodResponse::failed("expected {\"state\": bool}"),
    };

    match gpio.set(platform, on) {
        Ok(()) => {
            info!("{}: {} {}", binding.method, gpio.name, if on { "on" } else { "off" });
            MethodResponse::succeeded().with_body(&json!({ "state": on }))
        }
        Err(e) => {
            warn!("{}: {} write failed: {:?}", binding.method, gpio.name, e);
            MethodResponse::failed("GPIO write failed")
        }
    }
}

/// Simulated sensor reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Degrees Celsius
    pub temperature: f64,
    /// hPa
    pub pressure: f64,
}

/// Take the next simulated reading
///
/// Walks a fixed sawtooth so successive readings differ.
pub fn read_sensors() -> Reading {
    let n = MEASUREMENTS.fetch_add(1, Ordering::Relaxed);
    Reading {
        temperature: 20.0 + f64::from(n % 10) * 0.5,
        pressure: 1000.0 + f64::from(n % 20),
    }
}

/// `MeasureTemperature` timer
pub fn measure_temperature(platform: &mut dyn Platform, timer: &TimerBinding) {
    let reading = read_sensors();

    let mut telemetry = Telemetry::new()
        .with("Temperature", reading.temperature)
        .with("Pressure", reading.pressure);
    if let Some(level) = pressure_alert_level_value() {
        telemetry.insert("PressureAlert", reading.pressure > f64::from(level));
    }

    if let Err(e) = telemetry.publish(platform) {
        warn!("{}: telemetry not sent: {:?}", timer.name, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::{DM_FAN_ON, DT_PRESSURE_ALERT_LEVEL, GPIO_FAN};
    use genx_core::MethodStatus;
    use genx_hal::{Gpio, Level};
    use genx_hal_sim::SimPlatform;

    fn update(value: TwinValue) -> TwinUpdate {
        TwinUpdate {
            value,
            version: Some(3),
        }
    }

    #[test]
    fn test_pressure_alert_range() {
        let mut sim = SimPlatform::new();
        let binding = &DT_PRESSURE_ALERT_LEVEL;

        assert_eq!(
            pressure_alert_level(&mut sim, binding, &update(TwinValue::Float(1200.0))),
            TwinStatus::Error
        );
        assert_eq!(
            pressure_alert_level(&mut sim, binding, &update(TwinValue::Int(1000))),
            TwinStatus::Invalid
        );
        assert_eq!(
            pressure_alert_level(&mut sim, binding, &update(TwinValue::Float(1013.25))),
            TwinStatus::Completed
        );
        assert!(pressure_alert_level_value().is_some());
    }

    #[test]
    fn test_fan_on_payload_forms() {
        let mut sim = SimPlatform::new();
        GPIO_FAN.open(&mut sim).unwrap();

        let response = fan_on(&mut sim, &DM_FAN_ON, &Value::Null);
        assert_eq!(response.status, MethodStatus::Succeeded);
        assert_eq!(response.body_json(), r#"{"state":true}"#);
        assert_eq!(sim.read(GPIO_FAN.pin), Ok(Level::High));

        let response = fan_on(&mut sim, &DM_FAN_ON, &json!({ "state": false }));
        assert_eq!(response.status, MethodStatus::Succeeded);
        assert_eq!(sim.read(GPIO_FAN.pin), Ok(Level::Low));

        let response = fan_on(&mut sim, &DM_FAN_ON, &json!(true));
        assert_eq!(response.status, MethodStatus::Succeeded);
        assert_eq!(sim.read(GPIO_FAN.pin), Ok(Level::High));

        let response = fan_on(&mut sim, &DM_FAN_ON, &json!({ "state": "yes" }));
        assert_eq!(response.status, MethodStatus::Failed);
        let response = fan_on(&mut sim, &DM_FAN_ON, &json!(7));
        assert_eq!(response.status, MethodStatus::Failed);
        assert_eq!(sim.read(GPIO_FAN.pin), Ok(Level::High));
    }

    #[test]
    fn test_fan_on_unopened_gpio_fails() {
        let mut sim = SimPlatform::new();
        let response = fan_on(&mut sim, &DM_FAN_ON, &Value::Null);
        assert_eq!(response.status, MethodStatus::Failed);
    }

    #[test]
    fn test_readings_stay_in_range() {
        for _ in 0..25 {
            let reading = read_sensors();
            assert!((20.0..25.0).contains(&reading.temperature));
            assert!((1000.0..1020.0).contains(&reading.pressure));
        }
    }
}
