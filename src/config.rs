//! # Configuration Management
//!
//! Centralized configuration for the zone-protocol decoder.
//!
//! Opcode values are re-numbered by the game between patches, so both opcode
//! tables are configuration rather than constants. The diagnostic dump flags
//! and logging setup live here as well.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment overrides via `from_env()`
//!
//! ## Example
//! ```toml
//! [diagnostics]
//! dump_server_messages = true
//! dump_client_messages = false
//!
//! [opcodes.server]
//! action_effect1 = 0x03CA
//! ```

use crate::error::{NetworkError, Result};
use crate::protocol::opcode::{ClientOpcode, ServerOpcode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Main decoder configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct DecoderConfig {
    /// Diagnostic dump switches
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,

    /// Opcode tables for both directions
    #[serde(default)]
    pub opcodes: OpcodeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DecoderConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| NetworkError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| NetworkError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| NetworkError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Defaults overridden by environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("ZONE_NET_DUMP_SERVER") {
            config.diagnostics.dump_server_messages = parse_flag("ZONE_NET_DUMP_SERVER", &value)?;
        }

        if let Ok(value) = std::env::var("ZONE_NET_DUMP_CLIENT") {
            config.diagnostics.dump_client_messages = parse_flag("ZONE_NET_DUMP_CLIENT", &value)?;
        }

        if let Ok(value) = std::env::var("ZONE_NET_LOG_LEVEL") {
            config.logging.log_level = value.parse::<Level>().map_err(|_| {
                NetworkError::ConfigError(format!("Invalid ZONE_NET_LOG_LEVEL: {value}"))
            })?;
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| NetworkError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| NetworkError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration.
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(self.opcodes.validate());
        errors.extend(self.logging.validate());
        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(NetworkError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(NetworkError::ConfigError(format!(
            "Invalid boolean for {name}: '{value}'"
        ))),
    }
}

/// Diagnostic dump switches, one per direction
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// Render every server->client message
    #[serde(default)]
    pub dump_server_messages: bool,

    /// Render every client->server message
    #[serde(default)]
    pub dump_client_messages: bool,
}

/// Opcode tables for both directions
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct OpcodeConfig {
    #[serde(default)]
    pub server: ServerOpcodeTable,

    #[serde(default)]
    pub client: ClientOpcodeTable,
}

impl OpcodeConfig {
    /// Report opcodes bound twice within one direction
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        errors.extend(find_duplicates(
            "server",
            self.server.entries().iter().map(|(op, v)| (op.name(), *v)),
        ));
        errors.extend(find_duplicates(
            "client",
            self.client.entries().iter().map(|(op, v)| (op.name(), *v)),
        ));
        errors
    }
}

fn find_duplicates<'a>(
    direction: &str,
    entries: impl Iterator<Item = (&'a str, u16)>,
) -> Vec<String> {
    let mut seen: HashMap<u16, &str> = HashMap::new();
    let mut errors = Vec::new();
    for (name, opcode) in entries {
        if let Some(first) = seen.insert(opcode, name) {
            errors.push(format!(
                "Duplicate {direction} opcode 0x{opcode:04X} used by {first} and {name}"
            ));
        }
    }
    errors
}

/// Server->client opcode values
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerOpcodeTable {
    pub action_effect1: u16,
    pub action_effect8: u16,
    pub action_effect16: u16,
    pub action_effect24: u16,
    pub action_effect32: u16,
    pub actor_cast: u16,
    pub actor_control: u16,
    pub actor_control_self: u16,
    pub environment_control: u16,
    pub waymark: u16,
    pub preset_waymark: u16,
}

impl Default for ServerOpcodeTable {
    fn default() -> Self {
        Self {
            action_effect1: 0x03CA,
            action_effect8: 0x0339,
            action_effect16: 0x0173,
            action_effect24: 0x0395,
            action_effect32: 0x0089,
            actor_cast: 0x0196,
            actor_control: 0x0278,
            actor_control_self: 0x02B1,
            environment_control: 0x02A4,
            waymark: 0x0254,
            preset_waymark: 0x02E9,
        }
    }
}

impl ServerOpcodeTable {
    pub fn entries(&self) -> [(ServerOpcode, u16); 11] {
        [
            (ServerOpcode::ActionEffect1, self.action_effect1),
            (ServerOpcode::ActionEffect8, self.action_effect8),
            (ServerOpcode::ActionEffect16, self.action_effect16),
            (ServerOpcode::ActionEffect24, self.action_effect24),
            (ServerOpcode::ActionEffect32, self.action_effect32),
            (ServerOpcode::ActorCast, self.actor_cast),
            (ServerOpcode::ActorControl, self.actor_control),
            (ServerOpcode::ActorControlSelf, self.actor_control_self),
            (ServerOpcode::EnvironmentControl, self.environment_control),
            (ServerOpcode::Waymark, self.waymark),
            (ServerOpcode::PresetWaymark, self.preset_waymark),
        ]
    }
}

/// Client->server opcode values
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientOpcodeTable {
    pub action_request: u16,
    pub action_request_ground_targeted: u16,
}

impl Default for ClientOpcodeTable {
    fn default() -> Self {
        Self {
            action_request: 0x02DC,
            action_request_ground_targeted: 0x0278,
        }
    }
}

impl ClientOpcodeTable {
    pub fn entries(&self) -> [(ClientOpcode, u16); 2] {
        [
            (ClientOpcode::ActionRequest, self.action_request),
            (
                ClientOpcode::ActionRequestGroundTargeted,
                self.action_request_ground_targeted,
            ),
        ]
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to log to console
    pub log_to_console: bool,

    /// Whether to log to file
    pub log_to_file: bool,

    /// Path to log file (if log_to_file is true)
    pub log_file_path: Option<String>,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("zone-net"),
            log_level: Level::INFO,
            log_to_console: true,
            log_to_file: false,
            log_file_path: None,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        if self.log_to_file {
            if let Some(ref path) = self.log_file_path {
                if let Some(parent) = Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        errors.push(format!(
                            "Log file directory does not exist: {}",
                            parent.display()
                        ));
                    }
                }
            } else {
                errors.push("log_file_path must be specified when log_to_file is true".to_string());
            }
        }

        if !self.log_to_console && !self.log_to_file {
            errors
                .push("At least one logging output (console or file) must be enabled".to_string());
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
