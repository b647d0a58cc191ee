//! SSH connection configuration.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use crate::config::SwitchConfig;

/// Host key verification mode, analogous to OpenSSH's `StrictHostKeyChecking`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostKeyVerification {
    /// Reject unknown and changed keys. Connection fails if the host
    /// is not already in known_hosts.
    Strict,

    /// Accept and auto-learn unknown keys, but reject changed keys.
    #[default]
    AcceptNew,

    /// Accept all keys without checking. For lab use only.
    Disabled,
}

/// SSH connection configuration, resolved from a [`SwitchConfig`].
#[derive(Debug, Clone)]
pub struct SshConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub auth: AuthMethod,
    /// Budget for connecting and authenticating.
    pub auth_timeout: Duration,
    /// Budget for a single command round trip.
    pub command_timeout: Duration,
    pub terminal_width: u32,
    pub terminal_height: u32,
    pub host_key_verification: HostKeyVerification,
    pub known_hosts_path: Option<PathBuf>,
}

impl SshConfig {
    /// Resolve SSH settings from switch parameters.
    ///
    /// With `use_ssh_key` and no explicit key file, `~/.ssh/id_rsa` is used.
    pub fn from_switch(config: &SwitchConfig) -> Self {
        let auth = if config.use_ssh_key {
            let path = config.key_file.clone().unwrap_or_else(default_key_path);
            AuthMethod::PrivateKey {
                path,
                passphrase: None,
            }
        } else {
            AuthMethod::Password(
                config
                    .password
                    .clone()
                    .unwrap_or_else(|| SecretString::from(String::new())),
            )
        };

        Self {
            host: config.ip.clone(),
            port: config.port,
            username: config.username.clone().unwrap_or_default(),
            auth,
            auth_timeout: config.auth_timeout(),
            command_timeout: config.command_timeout(),
            terminal_width: 511,
            terminal_height: 24,
            host_key_verification: config.host_key_verification.clone(),
            known_hosts_path: config.known_hosts_path.clone(),
        }
    }

    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_key_path() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".ssh")
        .join("id_rsa")
}

/// Authentication method for SSH connections.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// Password authentication.
    Password(SecretString),

    /// Private key authentication.
    PrivateKey {
        /// Path to the private key file.
        path: PathBuf,
        /// Optional passphrase for encrypted keys.
        passphrase: Option<SecretString>,
    },
}
