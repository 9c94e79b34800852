//! Binding tables
//!
//! One `static` per twin, method, GPIO and timer, grouped in [`BINDINGS`]
//! for init and close.

use core::time::Duration;

use genx_core::{
    BindingSet, ConnectPolicy, DeviceTwinBinding, DirectMethodBinding, GpioBinding, MethodContext,
    TimerBinding, TwinType,
};
use genx_hal::{Direction, Level};

use crate::board::{FAN_RELAY, NETWORK_CONNECTED_LED};
use crate::handlers;

// Device twins
pub static DT_PRESSURE_ALERT_LEVEL: DeviceTwinBinding = DeviceTwinBinding {
    property: "PressureAlertLevel",
    twin_type: TwinType::Float,
    handler: handlers::pressure_alert_level,
};

// GPIOs
pub static GPIO_LIGHT: GpioBinding = GpioBinding {
    pin: NETWORK_CONNECTED_LED,
    name: "Light",
    direction: Direction::Output,
    initial_state: Level::Low,
    invert: false,
};

pub static GPIO_FAN: GpioBinding = GpioBinding {
    pin: FAN_RELAY,
    name: "Fan",
    direction: Direction::Output,
    initial_state: Level::Low,
    invert: false,
};

// Direct methods
pub static DM_OFFICE_LIGHT_ON: DirectMethodBinding = DirectMethodBinding {
    method: "OfficeLightOn",
    handler: handlers::office_light_on,
    context: MethodContext::Gpio(&GPIO_LIGHT),
};

pub static DM_FAN_ON: DirectMethodBinding = DirectMethodBinding {
    method: "FanOn",
    handler: handlers::fan_on,
    context: MethodContext::Gpio(&GPIO_FAN),
};

// Timers
pub static TMR_MEASURE_TEMPERATURE: TimerBinding = TimerBinding {
    name: "MeasureTemperature",
    period: Some(Duration::from_secs(5)),
    handler: handlers::measure_temperature,
};

/// Everything registered by init and released by close
pub static BINDINGS: BindingSet = BindingSet {
    device_twins: &[&DT_PRESSURE_ALERT_LEVEL],
    direct_methods: &[&DM_OFFICE_LIGHT_ON, &DM_FAN_ON],
    gpios: &[&GPIO_LIGHT, &GPIO_FAN],
    timers: &[&TMR_MEASURE_TEMPERATURE],
    oneshot_timers: &[],
    deferred_update: None,
    connect: ConnectPolicy::WhenBound,
    network_interface: "wlan0",
    model_id: "",
};
