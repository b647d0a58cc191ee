//! Switch connection parameters.
//!
//! ```rust
//! use switchmgmt::SwitchConfig;
//!
//! let config = SwitchConfig::new("10.10.10.10")
//!     .username("root")
//!     .password("***");
//! assert!(config.device_type.is_none());
//! ```

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use crate::device::DeviceType;
use crate::error::{Error, Result};
use crate::transport::HostKeyVerification;

/// How commands reach the switch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    /// Interactive CLI over SSH.
    #[default]
    Ssh,
    /// Cisco NX-API JSON-RPC over HTTP.
    CiscoApi,
}

/// Everything needed to reach one switch.
///
/// Secrets are held as [`SecretString`] and never printed.
#[derive(Debug, Clone, Deserialize)]
pub struct SwitchConfig {
    pub ip: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<SecretString>,
    /// Enable password.
    #[serde(default)]
    pub secret: Option<SecretString>,
    /// Detected from `show version` when absent.
    #[serde(default)]
    pub device_type: Option<DeviceType>,
    /// Seconds allowed for connecting and authenticating.
    #[serde(default = "default_auth_timeout")]
    pub auth_timeout: u64,
    /// Seconds allowed for a single command.
    #[serde(default = "default_command_timeout")]
    pub command_timeout: u64,
    #[serde(default)]
    pub use_ssh_key: bool,
    #[serde(default)]
    pub key_file: Option<PathBuf>,
    #[serde(default)]
    pub connection_type: ConnectionType,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub host_key_verification: HostKeyVerification,
    #[serde(default)]
    pub known_hosts_path: Option<PathBuf>,
}

fn default_auth_timeout() -> u64 {
    60
}

fn default_command_timeout() -> u64 {
    30
}

fn default_port() -> u16 {
    22
}

impl SwitchConfig {
    /// Create parameters for the given management address.
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            username: None,
            password: None,
            secret: None,
            device_type: None,
            auth_timeout: default_auth_timeout(),
            command_timeout: default_command_timeout(),
            use_ssh_key: false,
            key_file: None,
            connection_type: ConnectionType::default(),
            port: default_port(),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
        }
    }

    /// Load parameters from a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::invalid(format!("Invalid switch config: {e}")))
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(SecretString::from(password.into()));
        self
    }

    /// Set the enable password.
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(SecretString::from(secret.into()));
        self
    }

    pub fn device_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = Some(device_type);
        self
    }

    /// Authenticate with a private key instead of a password.
    pub fn private_key(mut self, key_file: impl Into<PathBuf>) -> Self {
        self.use_ssh_key = true;
        self.key_file = Some(key_file.into());
        self
    }

    pub fn connection_type(mut self, connection_type: ConnectionType) -> Self {
        self.connection_type = connection_type;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout)
    }

    pub fn with_auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = timeout.as_secs();
        self
    }

    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout.as_secs();
        self
    }

    /// Accept any host key. For lab use only.
    pub fn danger_disable_host_key_verification(mut self) -> Self {
        self.host_key_verification = HostKeyVerification::Disabled;
        self
    }
}
