//! Application configuration
//!
//! Loads `app.toml` (embedded at build time) and applies command line
//! overrides to the connection section.

use core::fmt;

use genx_core::config::{apply_args, parse_connection_type, ConfigError};
use genx_core::ExitCode;
use genx_hal::ConnectionConfig;
use serde::Deserialize;

/// Embedded default configuration
/// Edit app.toml and rebuild to customize
pub const EMBEDDED_CONFIG: &str = include_str!("../app.toml");

/// Configuration load errors
#[derive(Debug)]
pub enum AppConfigError {
    /// TOML parsing failed
    Toml(toml::de::Error),
    /// Connection section or command line invalid
    Connection(ConfigError),
}

impl AppConfigError {
    /// Exit code the application terminates with
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppConfigError::Toml(_) => ExitCode::ConfigLoad,
            AppConfigError::Connection(e) => e.exit_code(),
        }
    }
}

impl fmt::Display for AppConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppConfigError::Toml(e) => write!(f, "app.toml: {}", e),
            AppConfigError::Connection(e) => write!(f, "connection: {:?}", e),
        }
    }
}

impl From<toml::de::Error> for AppConfigError {
    fn from(e: toml::de::Error) -> Self {
        AppConfigError::Toml(e)
    }
}

impl From<ConfigError> for AppConfigError {
    fn from(e: ConfigError) -> Self {
        AppConfigError::Connection(e)
    }
}

/// Top-level `app.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub connection: ConnectionSection,
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level string passed to the logger (`RUST_LOG` wins when set)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

/// `[connection]` section, mirrors the command line options
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionSection {
    #[serde(rename = "type")]
    pub connection_type: Option<String>,
    pub scope_id: Option<String>,
    pub hostname: Option<String>,
    pub device_id: Option<String>,
    pub iot_edge_root_ca_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Simulated seconds before termination is requested
    pub run_seconds: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { run_seconds: 30 }
    }
}

impl AppConfig {
    /// Parse configuration text
    pub fn parse(text: &str) -> Result<Self, AppConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Build the connection config, then apply `--Key value` overrides
    ///
    /// Not validated here; init validates against the connection type.
    pub fn connection_config<'a, I>(&self, args: I) -> Result<ConnectionConfig, AppConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let section = &self.connection;
        let mut config = ConnectionConfig {
            connection_type: match section.connection_type.as_deref() {
                Some(name) => parse_connection_type(name)?,
                None => Default::default(),
            },
            scope_id: section.scope_id.clone(),
            hostname: section.hostname.clone(),
            device_id: section.device_id.clone(),
            edge_root_ca_path: section.iot_edge_root_ca_path.clone(),
        };
        apply_args(&mut config, args)?;
        Ok(config)
    }
}
