//! Board pin assignments
//!
//! Pin numbers for the reference development board. Change these when
//! targeting different hardware.

use genx_hal::PinId;

/// Status LED, driven as the office light
pub const NETWORK_CONNECTED_LED: PinId = PinId(4);

/// Relay output for the fan
pub const FAN_RELAY: PinId = PinId(9);
