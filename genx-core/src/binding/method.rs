//! Direct method bindings

use alloc::string::{String, ToString};

use genx_hal::Platform;
use serde_json::Value;

use super::gpio::GpioBinding;

/// Result status returned to the method caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MethodStatus {
    Succeeded,
    Failed,
    NotFound,
}

impl MethodStatus {
    /// HTTP-style status code sent to the hub
    pub fn code(self) -> u16 {
        match self {
            MethodStatus::Succeeded => 200,
            MethodStatus::Failed => 500,
            MethodStatus::NotFound => 404,
        }
    }
}

/// Direct method response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodResponse {
    pub status: MethodStatus,
    /// JSON body; `None` sends an empty object
    pub body: Option<String>,
}

impl MethodResponse {
    pub fn succeeded() -> Self {
        Self {
            status: MethodStatus::Succeeded,
            body: None,
        }
    }

    /// Failure carrying a reason string as body
    pub fn failed(reason: &str) -> Self {
        Self {
            status: MethodStatus::Failed,
            body: Some(Value::from(reason).to_string()),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: MethodStatus::NotFound,
            body: None,
        }
    }

    /// Attach a JSON body
    pub fn with_body(mut self, body: &Value) -> Self {
        self.body = Some(body.to_string());
        self
    }

    /// Body as sent on the wire
    pub fn body_json(&self) -> &str {
        self.body.as_deref().unwrap_or("{}")
    }
}

/// Peripheral a method acts on
#[derive(Debug, Clone, Copy)]
pub enum MethodContext {
    None,
    Gpio(&'static GpioBinding),
}

impl MethodContext {
    pub fn gpio(&self) -> Option<&'static GpioBinding> {
        match *self {
            MethodContext::Gpio(gpio) => Some(gpio),
            MethodContext::None => None,
        }
    }
}

/// Handler called with the method's JSON payload (`null` when empty)
pub type MethodHandler = fn(&mut dyn Platform, &DirectMethodBinding, &Value) -> MethodResponse;

/// Direct method binding
#[derive(Debug, Clone, Copy)]
pub struct DirectMethodBinding {
    pub method: &'static str,
    pub handler: MethodHandler,
    pub context: MethodContext,
}
