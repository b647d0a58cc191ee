//! Dialect implementations.
//!
//! Each vendor module keeps its command builders (`commands`) and output
//! parsers (`parse`) as plain functions; the switch type in `mod.rs` glues
//! them to a [`Session`].

/// Build a `Vec<String>` of command lines from `&str` and `String` items.
macro_rules! lines {
    ($($line:expr),* $(,)?) => {
        vec![$(String::from($line)),*]
    };
}

pub mod arista;
pub mod cisco;
pub mod dell;
pub mod extreme;
pub mod ibm;
pub mod mellanox;
pub mod nxos;

pub use arista::Arista;
pub use cisco::Cisco;
pub use dell::{DellOs10, DellOs9, DellOs9Model};
pub use extreme::Extreme;
pub use ibm::Ibm;
pub use mellanox::{Mellanox, MellanoxModel};
pub use nxos::CiscoNxos;

use log::info;

use crate::config::{ConnectionType, SwitchConfig};
use crate::connection::SshSwitchConnection;
use crate::device::DeviceType;
use crate::error::{ConnectionError, Result};
use crate::session::Session;
use crate::switch::Switch;

/// Bind a session to the dialect of `device`.
pub fn for_device(device: DeviceType, session: Session) -> Box<dyn Switch> {
    match device {
        DeviceType::CiscoIos => Box::new(Cisco::new(session)),
        DeviceType::CiscoNxos => Box::new(CiscoNxos::new(session)),
        DeviceType::AristaEos => Box::new(Arista::new(session)),
        DeviceType::DellForce10 => Box::new(DellOs9::new(session).with_model(DellOs9Model::Force10)),
        DeviceType::DellOs10 => Box::new(DellOs10::new(session)),
        DeviceType::MellanoxMlnxos => Box::new(Mellanox::new(session)),
        DeviceType::ExtremeExos => Box::new(Extreme::new(session)),
        DeviceType::IbmOs => Box::new(Ibm::new(session)),
    }
}

/// Connect and bind the matching dialect.
///
/// NX-API connections are always NX-OS. SSH connections use the configured
/// device type, or the one detected from `show version`.
pub async fn connect(config: &SwitchConfig) -> Result<Box<dyn Switch>> {
    match config.connection_type {
        ConnectionType::CiscoApi => {
            let session = Session::open(config).await?;
            Ok(Box::new(CiscoNxos::new(session)))
        }
        ConnectionType::Ssh => {
            let connection = SshSwitchConnection::open(config.clone()).await?;
            let device = connection
                .device_type()
                .ok_or_else(|| ConnectionError::DetectionFailed(config.ip.clone()))?;
            info!("{}: binding {} dialect", config.ip, device);
            Ok(for_device(device, Session::new(connection)))
        }
    }
}
