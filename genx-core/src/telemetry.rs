//! Telemetry messages
//!
//! Flat JSON objects built field by field, e.g.
//! `{"Temperature":21.5,"Humidity":40,"DoorOpen":false}`.

use alloc::string::{String, ToString};

use genx_hal::{IotError, Platform};
use serde_json::{Map, Value};

/// Telemetry message builder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Telemetry {
    fields: Map<String, Value>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a field in place
    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }

    /// Send as a device-to-cloud message
    pub fn publish(&self, platform: &mut dyn Platform) -> Result<(), IotError> {
        platform.publish(&self.to_json())
    }
}
