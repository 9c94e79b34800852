//! GenX generated application
//!
//! Office environment node: a `PressureAlertLevel` desired property,
//! `OfficeLightOn` and `FanOn` direct methods switching two GPIOs, and a
//! `MeasureTemperature` timer sending telemetry every five seconds.
//!
//! The binary runs the bindings against the simulated runtime in
//! `genx-hal-sim`.

#![deny(unsafe_code)]

pub mod bindings;
pub mod board;
pub mod config;
pub mod handlers;
pub mod runner;

pub use bindings::BINDINGS;
pub use config::{AppConfig, AppConfigError, EMBEDDED_CONFIG};
pub use runner::run;
