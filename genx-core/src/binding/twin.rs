//! Device twin bindings
//!
//! A device twin binding subscribes to one desired property. When the cloud
//! changes it, the value is converted to the binding's [`TwinType`], handed
//! to the handler, and the handler's [`TwinStatus`] is sent back as a Plug
//! and Play writable-property acknowledgement.

use alloc::string::{String, ToString};

use genx_hal::{IotError, Platform};
use serde_json::{json, Value};

/// Declared type of a twin property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwinType {
    Bool,
    Float,
    Double,
    Int,
    String,
    JsonObject,
}

/// Typed twin property value
#[derive(Debug, Clone, PartialEq)]
pub enum TwinValue {
    Bool(bool),
    Float(f32),
    Double(f64),
    Int(i64),
    String(String),
    Json(Value),
}

impl TwinValue {
    /// Convert a JSON value to the declared type
    ///
    /// Returns `None` if the JSON does not hold that type. Integers are
    /// accepted for `Float`/`Double`; integral floats (`3.0`) for `Int`.
    /// Numbers outside the range of the declared type are rejected.
    pub fn from_json(twin_type: TwinType, value: &Value) -> Option<Self> {
        match twin_type {
            TwinType::Bool => value.as_bool().map(TwinValue::Bool),
            TwinType::Float => value.as_f64().and_then(single).map(TwinValue::Float),
            TwinType::Double => value.as_f64().map(TwinValue::Double),
            TwinType::Int => value.as_i64().or_else(|| integral(value)).map(TwinValue::Int),
            TwinType::String => value.as_str().map(|s| TwinValue::String(s.into())),
            TwinType::JsonObject => value.is_object().then(|| TwinValue::Json(value.clone())),
        }
    }

    /// JSON form used in reported properties
    pub fn to_json(&self) -> Value {
        match self {
            TwinValue::Bool(v) => Value::from(*v),
            TwinValue::Float(v) => Value::from(*v),
            TwinValue::Double(v) => Value::from(*v),
            TwinValue::Int(v) => Value::from(*v),
            TwinValue::String(v) => Value::from(v.as_str()),
            TwinValue::Json(v) => v.clone(),
        }
    }
}

/// `f64` to `f32`, `None` when it overflows to infinity
fn single(v: f64) -> Option<f32> {
    let narrowed = v as f32;
    narrowed.is_finite().then_some(narrowed)
}

fn integral(value: &Value) -> Option<i64> {
    let v = value.as_f64()?;
    // i64::MAX rounds up to 2^63 as f64, so the upper bound is exclusive
    if !(i64::MIN as f64..i64::MAX as f64).contains(&v) {
        return None;
    }
    let truncated = v as i64;
    (truncated as f64 == v).then_some(truncated)
}

/// Outcome of applying a desired property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwinStatus {
    Completed,
    Error,
    Invalid,
}

impl TwinStatus {
    /// Acknowledgement code (`ac`)
    pub fn code(self) -> u16 {
        match self {
            TwinStatus::Completed => 200,
            TwinStatus::Error => 500,
            TwinStatus::Invalid => 404,
        }
    }

    /// Acknowledgement description (`ad`)
    pub fn description(self) -> &'static str {
        match self {
            TwinStatus::Completed => "completed",
            TwinStatus::Error => "error",
            TwinStatus::Invalid => "invalid",
        }
    }
}

/// Desired property change passed to a handler
#[derive(Debug, Clone, PartialEq)]
pub struct TwinUpdate {
    pub value: TwinValue,
    /// `$version` of the desired document, if present
    pub version: Option<u64>,
}

/// Handler called with each desired value
pub type TwinHandler = fn(&mut dyn Platform, &DeviceTwinBinding, &TwinUpdate) -> TwinStatus;

/// Device twin property binding
#[derive(Debug, Clone, Copy)]
pub struct DeviceTwinBinding {
    /// Twin property name
    pub property: &'static str,
    pub twin_type: TwinType,
    pub handler: TwinHandler,
}

impl DeviceTwinBinding {
    /// Send `{"<property>": value}` as a reported property
    pub fn report(&self, platform: &mut dyn Platform, value: &TwinValue) -> Result<(), IotError> {
        let doc = json!({ self.property: value.to_json() });
        platform.report_properties(&doc.to_string())
    }

    /// Acknowledge a desired value
    ///
    /// Sends `{"<property>": {"value": v, "ac": code, "av": version, "ad": description}}`.
    /// `av` is omitted when the desired document carried no version.
    pub fn ack_desired(
        &self,
        platform: &mut dyn Platform,
        value: &Value,
        version: Option<u64>,
        status: TwinStatus,
    ) -> Result<(), IotError> {
        let mut ack = json!({
            "value": value,
            "ac": status.code(),
            "ad": status.description(),
        });
        if let (Some(version), Some(fields)) = (version, ack.as_object_mut()) {
            fields.insert("av".into(), Value::from(version));
        }
        let doc = json!({ self.property: ack });
        platform.report_properties(&doc.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genx_hal_sim::SimPlatform;
    use genx_hal::{ConnectionConfig, IotHub};

    fn accept(_: &mut dyn Platform, _: &DeviceTwinBinding, _: &TwinUpdate) -> TwinStatus {
        TwinStatus::Completed
    }

    static LEVEL: DeviceTwinBinding = DeviceTwinBinding {
        property: "Level",
        twin_type: TwinType::Float,
        handler: accept,
    };

    fn connected() -> SimPlatform {
        let mut sim = SimPlatform::new();
        sim.connect(&ConnectionConfig::default(), "wlan0", "").unwrap();
        sim
    }

    #[test]
    fn test_from_json_by_type() {
        assert_eq!(
            TwinValue::from_json(TwinType::Bool, &json!(true)),
            Some(TwinValue::Bool(true))
        );
        assert_eq!(
            TwinValue::from_json(TwinType::Float, &json!(2.5)),
            Some(TwinValue::Float(2.5))
        );
        assert_eq!(
            TwinValue::from_json(TwinType::Double, &json!(7)),
            Some(TwinValue::Double(7.0))
        );
        assert_eq!(
            TwinValue::from_json(TwinType::String, &json!("on")),
            Some(TwinValue::String("on".into()))
        );
    }

    #[test]
    fn test_from_json_rejects_wrong_type() {
        assert_eq!(TwinValue::from_json(TwinType::Bool, &json!(1)), None);
        assert_eq!(TwinValue::from_json(TwinType::Float, &json!("1.0")), None);
        assert_eq!(TwinValue::from_json(TwinType::JsonObject, &json!([1, 2])), None);
    }

    #[test]
    fn test_int_accepts_integral_float_only() {
        assert_eq!(
            TwinValue::from_json(TwinType::Int, &json!(3.0)),
            Some(TwinValue::Int(3))
        );
        assert_eq!(TwinValue::from_json(TwinType::Int, &json!(3.5)), None);
        assert_eq!(
            TwinValue::from_json(TwinType::Int, &json!(-12)),
            Some(TwinValue::Int(-12))
        );
    }

    #[test]
    fn test_float_out_of_range_rejected() {
        assert_eq!(TwinValue::from_json(TwinType::Float, &json!(1e300)), None);
        assert_eq!(TwinValue::from_json(TwinType::Float, &json!(-1e39)), None);
        assert_eq!(
            TwinValue::from_json(TwinType::Double, &json!(1e300)),
            Some(TwinValue::Double(1e300))
        );
    }

    #[test]
    fn test_int_rejects_values_beyond_i64() {
        assert_eq!(
            TwinValue::from_json(TwinType::Int, &json!(9_223_372_036_854_775_808u64)),
            None
        );
        assert_eq!(TwinValue::from_json(TwinType::Int, &json!(1e19)), None);
        assert_eq!(TwinValue::from_json(TwinType::Int, &json!(-1e19)), None);
        assert_eq!(
            TwinValue::from_json(TwinType::Int, &json!(i64::MAX)),
            Some(TwinValue::Int(i64::MAX))
        );
    }

    #[test]
    fn test_report_document() {
        let mut sim = connected();
        LEVEL.report(&mut sim, &TwinValue::Float(1.5)).unwrap();

        let sent: Value = serde_json::from_str(&sim.reported()[0]).unwrap();
        assert_eq!(sent, json!({ "Level": 1.5 }));
    }

    #[test]
    fn test_ack_document() {
        let mut sim = connected();
        LEVEL
            .ack_desired(&mut sim, &json!(4.0), Some(7), TwinStatus::Completed)
            .unwrap();

        let sent: Value = serde_json::from_str(&sim.reported()[0]).unwrap();
        assert_eq!(
            sent,
            json!({ "Level": { "value": 4.0, "ac": 200, "av": 7, "ad": "completed" } })
        );
    }

    #[test]
    fn test_ack_without_version() {
        let mut sim = connected();
        LEVEL
            .ack_desired(&mut sim, &json!("x"), None, TwinStatus::Invalid)
            .unwrap();

        let sent: Value = serde_json::from_str(&sim.reported()[0]).unwrap();
        assert_eq!(sent["Level"]["ac"], json!(404));
        assert!(sent["Level"].get("av").is_none());
    }

    #[test]
    fn test_report_needs_connection() {
        let mut sim = SimPlatform::new();
        assert_eq!(
            LEVEL.report(&mut sim, &TwinValue::Float(1.0)),
            Err(IotError::NotConnected)
        );
    }
}
