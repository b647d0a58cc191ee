//! Error types for switchmgmt.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for switchmgmt operations.
#[derive(Error, Debug)]
pub enum Error {
    /// An argument was rejected before anything was sent to the switch
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Switch output could not be interpreted, or the switch is in an unexpected state
    #[error("Switch error: {0}")]
    Switch(#[from] SwitchError),

    /// Transport-level failures (SSH, HTTP, reconnect)
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// The port did not hold the requested link state within the budget
    #[error("Port {port} did not hold link {} within {timeout:?}", link_label(.link_up))]
    LinkStateTimeout {
        port: String,
        link_up: bool,
        timeout: Duration,
    },

    /// The dialect does not offer this operation
    #[error("{operation} is not supported on {dialect}")]
    Unsupported {
        dialect: &'static str,
        operation: &'static str,
    },

    /// A shell command exited with a non-zero status
    #[error("Command '{command}' failed with return code {return_code}: {stderr}")]
    CommandFailed {
        command: String,
        return_code: i32,
        stderr: String,
    },
}

/// Argument validation errors. Raised before any command is issued.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Ports are mandatory parameter")]
    MissingPorts,

    #[error("Incorrect port syntax for {dialect}: {ports}")]
    PortSyntax { dialect: &'static str, ports: String },

    #[error("Port is not in ethernet port syntax! {0}")]
    NotEthernetPort(String),

    #[error("Port is not in port-channel syntax! {0}")]
    NotPortChannel(String),

    #[error("Port is not either in ethernet port or port-channel syntax! {0}")]
    NotEthernetOrPortChannel(String),

    #[error("Invalid port format: {0}")]
    InvalidPortFormat(String),

    #[error("VLAN is required {0}")]
    MissingVlan(&'static str),

    #[error("{what} should be integer in range {min}-{max}, got {value}")]
    OutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("{what} {value} is given more than once")]
    Duplicate { what: &'static str, value: i64 },

    #[error("Incorrect MAC address: {0}")]
    InvalidMac(String),

    #[error("{dialect} switch supports up to {max} traffic classes.")]
    TooManyTrafficClasses { dialect: &'static str, max: u8 },

    #[error("Total bandwidth percent cannot exceed 100, got {0}")]
    BandwidthExceeded(u32),

    #[error("{0}")]
    InvalidArgument(String),
}

/// Parse and state errors raised after the switch answered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwitchError {
    #[error("Couldn't retrieve port speed for port {0}")]
    PortSpeed(String),

    #[error("Link status parsing error on: {dialect}; interface: {port}")]
    LinkStatus { dialect: &'static str, port: String },

    #[error("Could not find MAC address {0} on address-table.")]
    MacNotFound(String),

    #[error("Could not find port for MAC address {0}")]
    PortForMacNotFound(String),

    #[error("Could not find VLAN for MAC address {0}")]
    VlanForMacNotFound(String),

    #[error("{0}")]
    Unexpected(String),
}

/// Connection layer errors (SSH session, NX-API endpoint).
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host key does not match the known_hosts entry
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// Host is not in known_hosts and verification is strict
    #[error("Host key for {host}:{port} is unknown")]
    HostKeyUnknown { host: String, port: u16 },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Connection was closed unexpectedly
    #[error("Connection disconnected")]
    Disconnected,

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// The session was lost and could not be re-established
    #[error("Could not re-establish connection to {0}")]
    ReconnectFailed(String),

    /// The device type could not be determined from `show version`
    #[error("Could not detect device type of {0}")]
    DetectionFailed(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-200 status
    #[error("API returned status {0}")]
    Status(u16),

    /// The API answered with something that is not JSON-RPC
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

fn link_label(link_up: &bool) -> &'static str {
    if *link_up { "up" } else { "down" }
}

/// Result type alias using switchmgmt's Error.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for [`ValidationError::InvalidArgument`].
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ValidationError::InvalidArgument(message.into()).into()
    }

    /// Shorthand for [`SwitchError::Unexpected`].
    pub(crate) fn unexpected(message: impl Into<String>) -> Self {
        SwitchError::Unexpected(message.into()).into()
    }
}

/// Check that `value` lies in `min..=max`.
pub(crate) fn check_range(what: &'static str, value: i64, min: i64, max: i64) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            what,
            value,
            min,
            max,
        }
        .into())
    }
}
