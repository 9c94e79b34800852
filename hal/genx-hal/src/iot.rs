//! Cloud connection abstractions
//!
//! Covers connecting to the IoT hub and the device twin / direct method
//! subscriptions the bindings depend on.

use alloc::string::String;

/// How the device reaches its hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionType {
    /// Not configured
    #[default]
    NotDefined,
    /// Device Provisioning Service (needs a scope id)
    Dps,
    /// Direct connection to a hub (needs hostname and device id)
    Direct,
    /// Through an IoT Edge gateway (needs hostname and root CA)
    IotEdge,
}

/// Connection settings handed to [`IotHub::connect`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionConfig {
    pub connection_type: ConnectionType,
    /// DPS ID scope
    pub scope_id: Option<String>,
    /// Hub or gateway hostname
    pub hostname: Option<String>,
    /// Device identity for direct connections
    pub device_id: Option<String>,
    /// Path of the IoT Edge root CA certificate
    pub edge_root_ca_path: Option<String>,
}

/// Errors from cloud operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IotError {
    /// Operation needs a connection that is not established
    NotConnected,
    /// Connection attempt rejected
    ConnectFailed,
    /// Twin or method subscription rejected
    SubscribeFailed,
    /// Reported property or telemetry message not accepted
    SendFailed,
}

/// IoT hub client
///
/// Connection is asynchronous in the underlying SDK: `connect` only starts
/// it, and subscriptions made before the link is up are replayed once it is.
pub trait IotHub {
    /// Start connecting with the given settings
    ///
    /// `model_id` is the Plug and Play model announced on connect; an empty
    /// string announces none.
    fn connect(
        &mut self,
        config: &ConnectionConfig,
        network_interface: &str,
        model_id: &str,
    ) -> Result<(), IotError>;

    /// Whether the hub link is currently up
    fn is_connected(&self) -> bool;

    /// Register interest in desired-property updates for these properties
    fn subscribe_twins(&mut self, properties: &[&'static str]) -> Result<(), IotError>;

    /// Drop every device twin subscription
    fn unsubscribe_twins(&mut self);

    /// Register these direct method names
    fn subscribe_methods(&mut self, methods: &[&'static str]) -> Result<(), IotError>;

    /// Drop every direct method subscription
    fn unsubscribe_methods(&mut self);

    /// Return the result of a direct method invocation to the caller
    fn respond_method(&mut self, method: &str, status: u16, body: &str);

    /// Send a reported-properties JSON patch
    fn report_properties(&mut self, json: &str) -> Result<(), IotError>;

    /// Send a device-to-cloud telemetry message
    fn publish(&mut self, json: &str) -> Result<(), IotError>;

    /// Stop cloud-to-device processing and tear the link down
    fn stop_to_device(&mut self);
}
