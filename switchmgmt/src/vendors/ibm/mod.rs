//! IBM Networking OS (RackSwitch, ISCLI mode).

mod parse;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::config::SwitchConfig;
use crate::dialect::{Dialect, PortSyntax};
use crate::error::{Error, Result, SwitchError};
use crate::mac::MacFormat;
use crate::session::Session;
use crate::switch::Switch;
use crate::types::{SwitchportMode, VlanConfig, VlanType};
use crate::validate::PortParameters;

const ETHERNET: &str = r"^\d+$";
const PORT_CHANNEL: &str = r"(?i)^portchannel ?\d+$";
const PORTS: &str = r"(?i)^(\d+([-,]\d+)*|portchannel ?\d+)$";

static DIALECT: Lazy<Dialect> = Lazy::new(|| Dialect {
    name: "IBM",
    ports: PortSyntax::new(ETHERNET, PORT_CHANNEL, PORTS).expect("IBM port patterns are valid"),
    mac_format: MacFormat::Colon,
    port_channel_max: 64,
    traffic_classes: 8,
    max_frame_size: 9216,
});

/// An IBM Networking OS switch.
pub struct Ibm {
    session: Session,
}

impl Ibm {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn connect(config: &SwitchConfig) -> Result<Self> {
        Ok(Self::new(Session::open(config).await?))
    }

    async fn mac_entry(&mut self, mac: &str) -> Result<(u16, String)> {
        let mac = self.change_standard_to_switch_mac_address(mac)?;
        let output = self
            .session
            .send_text(&format!("show mac-address-table address {mac}"))
            .await?;
        parse::mac_entry(&output, &mac).ok_or_else(|| SwitchError::MacNotFound(mac).into())
    }
}

#[async_trait]
impl Switch for Ibm {
    fn dialect(&self) -> &'static Dialect {
        &DIALECT
    }

    fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    async fn is_port_linkup(&mut self, port: &str) -> Result<Option<bool>> {
        DIALECT.ports.ensure_either(port)?;
        let output = self.session.send_text("show interface link").await?;
        parse::link_state(&output, port).ok_or_else(|| {
            SwitchError::LinkStatus {
                dialect: DIALECT.name,
                port: port.to_string(),
            }
            .into()
        })
    }

    async fn get_port_speed(&mut self, port: &str) -> Result<u32> {
        DIALECT.ports.ensure_either(port)?;
        let output = self.session.send_text("show interface link").await?;
        parse::link_speed(&output, port).ok_or_else(|| SwitchError::PortSpeed(port.to_string()).into())
    }

    async fn get_port_by_mac(&mut self, mac: &str) -> Result<String> {
        Ok(self.mac_entry(mac).await?.1)
    }

    async fn get_vlan_by_mac(&mut self, mac: &str) -> Result<u16> {
        Ok(self.mac_entry(mac).await?.0)
    }

    async fn show_port_running_config(&mut self, port: &str) -> Result<String> {
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.session
            .send_text(&format!("show running-config interface port {port}"))
            .await
    }

    async fn show_vlans(&mut self, vlans: &[u16]) -> Result<String> {
        match vlans {
            [] => self.session.send_text("show vlan").await,
            _ => {
                let ids: Vec<String> = vlans.iter().map(u16::to_string).collect();
                self.session
                    .send_text(&format!("show vlan {}", ids.join(",")))
                    .await
            }
        }
    }

    async fn configure_vlan(&mut self, config: &VlanConfig) -> Result<()> {
        if config.mode == SwitchportMode::Hybrid {
            return Err(Error::invalid(format!("Incorrect switchport mode: {}", config.mode)));
        }
        self.validate_configure_parameters(
            &PortParameters::new(&config.ports)
                .mode(config.mode)
                .vlan(config.vlan)
                .vlan_type(config.vlan_type),
        )?;
        let vlan = config.vlan;
        let membership = match (config.mode, config.vlan_type) {
            (SwitchportMode::Trunk, VlanType::Tagged) if config.override_allowed => {
                format!("switchport trunk allowed vlan {vlan}")
            }
            (SwitchportMode::Trunk, VlanType::Tagged) => {
                format!("switchport trunk allowed vlan add {vlan}")
            }
            (SwitchportMode::Trunk, VlanType::Untagged) => {
                format!("switchport trunk native vlan {vlan}")
            }
            _ => format!("switchport access vlan {vlan}"),
        };
        self.session
            .send_configuration(&lines![
                format!("vlan {vlan}"),
                "exit",
                format!("interface port {}", config.ports),
                format!("switchport mode {}", config.mode),
                membership,
                "exit",
            ])
            .await?;
        Ok(())
    }

    async fn shutdown(&mut self, shutdown: bool, port: &str) -> Result<()> {
        self.validate_configure_parameters(&PortParameters::new(port))?;
        let action = if shutdown { "shutdown" } else { "no shutdown" };
        self.session
            .send_configuration(&lines![format!("interface port {port}"), action, "exit"])
            .await?;
        Ok(())
    }
}
