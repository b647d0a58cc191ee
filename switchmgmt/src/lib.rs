//! # switchmgmt
//!
//! Async multi-vendor switch management over SSH and NX-API.
//!
//! switchmgmt turns intents such as "set the port speed", "enable PFC on
//! priority 3" or "which port has this MAC" into each vendor's CLI command
//! sequence, sends them over an established connection, and parses the
//! replies back into typed values.
//!
//! ## Features
//!
//! - One [`Switch`] trait over Cisco IOS and NX-OS, Arista EOS, Dell OS9 and
//!   OS10, Mellanox Onyx, ExtremeXOS and IBM NOS
//! - Interactive SSH CLI via russh, or NX-API JSON-RPC via reqwest
//! - Device-type detection from `show version`
//! - Argument validation before anything reaches the switch
//! - Link-state waits that require a stable state, not a single probe
//! - An Open vSwitch helper running `ovs-*` commands locally or over SSH
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use switchmgmt::{SwitchConfig, VlanConfig, VlanType, SwitchportMode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), switchmgmt::Error> {
//!     let config = SwitchConfig::new("192.168.1.1")
//!         .username("admin")
//!         .password("secret");
//!
//!     let mut switch = switchmgmt::connect(&config).await?;
//!
//!     println!("link up: {:?}", switch.is_port_linkup("Ethernet1/1").await?);
//!     println!("speed: {} Mbps", switch.get_port_speed("Ethernet1/1").await?);
//!
//!     switch
//!         .configure_vlan(&VlanConfig::new(
//!             "Ethernet1/1",
//!             100,
//!             VlanType::Tagged,
//!             SwitchportMode::Trunk,
//!         ))
//!         .await?;
//!
//!     switch.disconnect().await?;
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod config;
pub mod connection;
pub mod device;
pub mod dialect;
pub mod error;
pub mod mac;
pub mod ovs;
pub mod parse;
pub mod session;
pub mod switch;
pub mod transport;
pub mod types;
pub mod validate;
pub mod vendors;

// Re-export main types for convenience
pub use config::{ConnectionType, SwitchConfig};
pub use connection::{Connection, Reply};
pub use device::DeviceType;
pub use dialect::Dialect;
pub use error::{ConnectionError, Error, Result, SwitchError, ValidationError};
pub use mac::{MacAddress, MacFormat};
pub use ovs::Ovs;
pub use session::{LinkWait, Session};
pub use switch::Switch;
pub use transport::{AuthMethod, HostKeyVerification, SshConfig};
pub use types::*;
pub use vendors::{connect, for_device};
