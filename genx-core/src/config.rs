//! Connection configuration
//!
//! The connection settings come from the application manifest / command
//! line, in the `--Key value` (or `--Key=value`) form:
//!
//! ```text
//! --ConnectionType DPS --ScopeID 0ne0001A2B3
//! --ConnectionType Direct --Hostname hub.azure-devices.net --DeviceID sensor-7
//! --ConnectionType IoTEdge --Hostname gateway.local --IoTEdgeRootCAPath certs/edge.pem
//! ```
//!
//! Option names are matched case-insensitively.

use alloc::string::String;

use genx_hal::{ConnectionConfig, ConnectionType};

use crate::exit::ExitCode;

/// Connection configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Option name not recognised
    UnknownOption,
    /// Option given without a value
    MissingValue,
    /// Connection type missing or not one of DPS / Direct / IoTEdge
    InvalidConnectionType,
    MissingScopeId,
    MissingHostname,
    MissingDeviceId,
    MissingEdgeCaPath,
}

impl ConfigError {
    /// Exit code the application terminates with
    pub fn exit_code(&self) -> ExitCode {
        match self {
            ConfigError::UnknownOption
            | ConfigError::MissingValue
            | ConfigError::InvalidConnectionType => ExitCode::ValidateConnectionType,
            ConfigError::MissingScopeId => ExitCode::ValidateScopeId,
            ConfigError::MissingHostname => ExitCode::ValidateHostname,
            ConfigError::MissingDeviceId => ExitCode::ValidateDeviceId,
            ConfigError::MissingEdgeCaPath => ExitCode::ValidateIotEdgeCaPath,
        }
    }
}

/// Parse a connection type name
pub fn parse_connection_type(value: &str) -> Result<ConnectionType, ConfigError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("dps") {
        Ok(ConnectionType::Dps)
    } else if value.eq_ignore_ascii_case("direct") {
        Ok(ConnectionType::Direct)
    } else if value.eq_ignore_ascii_case("iotedge") {
        Ok(ConnectionType::IotEdge)
    } else {
        Err(ConfigError::InvalidConnectionType)
    }
}

/// Parse command line arguments into a fresh config
pub fn parse_args<'a, I>(args: I) -> Result<ConnectionConfig, ConfigError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut config = ConnectionConfig::default();
    apply_args(&mut config, args)?;
    Ok(config)
}

/// Override fields of `config` from command line arguments
///
/// Arguments that do not start with `--` (program name, positional
/// arguments) are skipped.
pub fn apply_args<'a, I>(config: &mut ConnectionConfig, args: I) -> Result<(), ConfigError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let Some(option) = arg.strip_prefix("--") else {
            continue;
        };

        let (key, value) = match option.split_once('=') {
            Some((key, value)) => (key, value),
            None => (option, args.next().ok_or(ConfigError::MissingValue)?),
        };
        let value = value.trim();
        if value.is_empty() {
            return Err(ConfigError::MissingValue);
        }

        apply_option(config, key, value)?;
    }

    Ok(())
}

fn apply_option(config: &mut ConnectionConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let field = |value: &str| Some(String::from(value));

    if key.eq_ignore_ascii_case("ConnectionType") {
        config.connection_type = parse_connection_type(value)?;
    } else if key.eq_ignore_ascii_case("ScopeID") {
        config.scope_id = field(value);
    } else if key.eq_ignore_ascii_case("Hostname") {
        config.hostname = field(value);
    } else if key.eq_ignore_ascii_case("DeviceID") {
        config.device_id = field(value);
    } else if key.eq_ignore_ascii_case("IoTEdgeRootCAPath") {
        config.edge_root_ca_path = field(value);
    } else {
        return Err(ConfigError::UnknownOption);
    }
    Ok(())
}

/// Check that the settings needed by the connection type are present
pub fn validate(config: &ConnectionConfig) -> Result<(), ConfigError> {
    fn present(value: &Option<String>) -> bool {
        value.as_deref().is_some_and(|v| !v.trim().is_empty())
    }

    match config.connection_type {
        ConnectionType::NotDefined => Err(ConfigError::InvalidConnectionType),
        ConnectionType::Dps => {
            if !present(&config.scope_id) {
                return Err(ConfigError::MissingScopeId);
            }
            Ok(())
        }
        ConnectionType::Direct => {
            if !present(&config.hostname) {
                return Err(ConfigError::MissingHostname);
            }
            if !present(&config.device_id) {
                return Err(ConfigError::MissingDeviceId);
            }
            Ok(())
        }
        ConnectionType::IotEdge => {
            if !present(&config.hostname) {
                return Err(ConfigError::MissingHostname);
            }
            if !present(&config.edge_root_ca_path) {
                return Err(ConfigError::MissingEdgeCaPath);
            }
            Ok(())
        }
    }
}
