//! Cisco IOS.
//!
//! The command builders and console parsers here are shared with
//! [`CiscoNxos`](crate::vendors::CiscoNxos).

pub(crate) mod commands;
pub(crate) mod parse;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use crate::config::SwitchConfig;
use crate::dialect::{Dialect, PortSyntax};
use crate::error::{Error, Result, SwitchError};
use crate::mac::MacFormat;
use crate::session::Session;
use crate::switch::Switch;
use crate::types::{
    ChannelGroupMode, LacpRate, LldpDirection, LldpNeighbor, SwitchportMode, VlanConfig,
};
use crate::validate::PortParameters;

const ETHERNET: &str = r"(?i)^(GigabitEthernet|TwoGigabitEthernet|FiveGigabitEthernet|TenGigabitEthernet|TwentyFiveGigE|FortyGigabitEthernet|HundredGigE|Ethernet|Gi|Tw|Fi|Te|Twe|Fo|Hu|Eth|Et) ?\d+(/\d+)*(-\d+)?$";
const PORT_CHANNEL: &str = r"(?i)^(port-channel|po) ?\d+$";
const PORTS: &str = r"(?i)^((GigabitEthernet|TwoGigabitEthernet|FiveGigabitEthernet|TenGigabitEthernet|TwentyFiveGigE|FortyGigabitEthernet|HundredGigE|Ethernet|Gi|Tw|Fi|Te|Twe|Fo|Hu|Eth|Et) ?\d+(/\d+)*(-\d+)?( ?, ?(GigabitEthernet|TwoGigabitEthernet|FiveGigabitEthernet|TenGigabitEthernet|TwentyFiveGigE|FortyGigabitEthernet|HundredGigE|Ethernet|Gi|Tw|Fi|Te|Twe|Fo|Hu|Eth|Et) ?\d+(/\d+)*(-\d+)?)*|(port-channel|po) ?\d+)$";

static DIALECT: Lazy<Dialect> = Lazy::new(|| Dialect {
    name: "Cisco",
    ports: PortSyntax::new(ETHERNET, PORT_CHANNEL, PORTS).expect("Cisco port patterns are valid"),
    mac_format: MacFormat::CiscoDotted,
    port_channel_max: 128,
    traffic_classes: 8,
    max_frame_size: 9216,
});

/// A Cisco IOS switch.
pub struct Cisco {
    session: Session,
}

impl Cisco {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn connect(config: &SwitchConfig) -> Result<Self> {
        Ok(Self::new(Session::open(config).await?))
    }

    /// Look a MAC up, retrying with the short `sh` form on images that
    /// reject `show mac address-table address`.
    async fn mac_entry(&mut self, mac: &str) -> Result<(u16, String)> {
        let mac = self.change_standard_to_switch_mac_address(mac)?;
        let mut output = self
            .session
            .send_text(&format!("show mac address-table address {mac}"))
            .await?;
        if output.contains("% Invalid input") {
            output = self
                .session
                .send_text(&format!("sh mac address-table address {mac}"))
                .await?;
        }
        parse::mac_entry(&output, &mac).ok_or_else(|| SwitchError::MacNotFound(mac).into())
    }

    pub async fn show_lldp_info(&mut self, port: &str) -> Result<String> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_text(&format!("show lldp neighbors interface {port} detail"))
            .await
    }

    pub async fn disable_cdp(&mut self) -> Result<()> {
        self.session.send_configuration(&lines!["no cdp enable"]).await?;
        Ok(())
    }
}

#[async_trait]
impl Switch for Cisco {
    fn dialect(&self) -> &'static Dialect {
        &DIALECT
    }

    fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    async fn is_port_linkup(&mut self, port: &str) -> Result<Option<bool>> {
        DIALECT.ports.ensure_either(port)?;
        let output = self.session.send_text(&format!("show interfaces {port}")).await?;
        parse::line_protocol(&output).ok_or_else(|| {
            SwitchError::LinkStatus {
                dialect: DIALECT.name,
                port: port.to_string(),
            }
            .into()
        })
    }

    async fn get_port_speed(&mut self, port: &str) -> Result<u32> {
        DIALECT.ports.ensure_either(port)?;
        let output = self
            .session
            .send_text(&format!("show interfaces {port} status"))
            .await?;
        parse::status_speed(&output).ok_or_else(|| SwitchError::PortSpeed(port.to_string()).into())
    }

    async fn get_port_by_mac(&mut self, mac: &str) -> Result<String> {
        Ok(self.mac_entry(mac).await?.1)
    }

    async fn get_vlan_by_mac(&mut self, mac: &str) -> Result<u16> {
        Ok(self.mac_entry(mac).await?.0)
    }

    async fn get_lldp_neighbors(&mut self) -> Result<Vec<LldpNeighbor>> {
        let output = self.session.send_text("show lldp neighbors").await?;
        Ok(parse::lldp_neighbors(&output))
    }

    async fn show_port_running_config(&mut self, port: &str) -> Result<String> {
        DIALECT.ensure_ports(port)?;
        self.session
            .send_text(&format!("show running-config interface {port}"))
            .await
    }

    async fn show_vlans(&mut self, vlans: &[u16]) -> Result<String> {
        self.session.send_text(&commands::show_vlans(vlans)).await
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
        self.session
            .send_command_list(&commands::configure_vlan(config))
            .await?;
        Ok(())
    }

    async fn default_ports(&mut self, ports: &str) -> Result<()> {
        self.validate_configure_parameters(&PortParameters::new(ports))?;
        self.session
            .send_command_list(&commands::default_ports(ports))
            .await?;
        Ok(())
    }

    async fn shutdown(&mut self, shutdown: bool, port: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_command_list(&commands::shutdown(shutdown, port))
            .await?;
        Ok(())
    }

    async fn create_port_channel_interface(&mut self, number: u32) -> Result<()> {
        DIALECT.ensure_port_channel_number(number)?;
        self.session
            .send_command_list(&commands::create_port_channel(number))
            .await?;
        Ok(())
    }

    async fn remove_port(&mut self, port: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session.send_command_list(&commands::remove_port(port)).await?;
        Ok(())
    }

    async fn add_port_to_channel_group(
        &mut self,
        port: &str,
        number: u32,
        mode: Option<ChannelGroupMode>,
        force: bool,
    ) -> Result<()> {
        DIALECT.ensure_port_channel_number(number)?;
        DIALECT.ports.ensure_ethernet(port)?;
        self.session
            .send_command_list(&commands::channel_group(port, number, mode, force))
            .await?;
        Ok(())
    }

    async fn remove_port_from_port_channel(&mut self, port: &str) -> Result<()> {
        DIALECT.ports.ensure_ethernet(port)?;
        self.session
            .send_command_list(&commands::remove_channel_group(port))
            .await?;
        Ok(())
    }

    async fn show_port_channel_summary(&mut self, number: Option<u32>) -> Result<String> {
        if let Some(number) = number {
            DIALECT.ensure_port_channel_number(number)?;
        }
        self.session
            .send_text(&commands::show_port_channel_summary(number))
            .await
    }

    async fn set_switchport_mode(&mut self, port: &str, mode: SwitchportMode) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_command_list(&commands::set_switchport_mode(port, mode))
            .await?;
        Ok(())
    }

    async fn set_lacp_rate(&mut self, port: &str, rate: LacpRate) -> Result<()> {
        DIALECT.ports.ensure_ethernet(port)?;
        self.session
            .send_command_list(&commands::lacp_rate(port, rate))
            .await?;
        Ok(())
    }

    async fn disable_lacp_rate(&mut self, port: &str, rate: Option<LacpRate>) -> Result<()> {
        DIALECT.ports.ensure_ethernet(port)?;
        self.session
            .send_command_list(&commands::no_lacp_rate(port, rate))
            .await?;
        Ok(())
    }

    async fn configure_lldp(&mut self, port: &str, directions: &[LldpDirection]) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_configuration(&commands::configure_lldp(port, directions))
            .await?;
        Ok(())
    }

    async fn set_port_flowcontrol(&mut self, port: &str, rx: bool, tx: bool) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_command_list(&commands::flowcontrol(port, rx, tx))
            .await?;
        Ok(())
    }
}
