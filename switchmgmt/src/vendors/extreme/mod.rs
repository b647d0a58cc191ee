//! ExtremeXOS.
//!
//! Ports are slot/port numbers (`17`, `1:4`, `2-4`). QoS is expressed
//! through the eight QoS profiles `QP1`..`QP8`; traffic class `n` maps to
//! `QP<n+1>`.

mod commands;
mod parse;

use async_trait::async_trait;
use log::{debug, info};
use once_cell::sync::Lazy;

use crate::config::SwitchConfig;
use crate::dialect::{Dialect, PortSyntax};
use crate::error::{Error, Result, SwitchError, ValidationError};
use crate::mac::MacFormat;
use crate::session::Session;
use crate::switch::Switch;
use crate::types::{LldpDirection, LldpNeighbor, PfcMode, VlanConfig};
use crate::validate::{self, PortParameters};

const ETHERNET: &str = r"^\d+(:\d+)?$";
// Load-sharing groups are addressed by their master port.
const PORT_CHANNEL: &str = r"^\d+(:\d+)?$";
const PORTS: &str = r"^\d+(:\d+)?(-\d+(:\d+)?)?(,\d+(:\d+)?(-\d+(:\d+)?)?)*$";

static DIALECT: Lazy<Dialect> = Lazy::new(|| Dialect {
    name: "Extreme",
    ports: PortSyntax::new(ETHERNET, PORT_CHANNEL, PORTS).expect("Extreme port patterns are valid"),
    mac_format: MacFormat::Colon,
    port_channel_max: 128,
    traffic_classes: commands::QOS_PROFILES,
    max_frame_size: 9216,
});

/// An ExtremeXOS switch.
pub struct Extreme {
    session: Session,
}

impl Extreme {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn connect(config: &SwitchConfig) -> Result<Self> {
        Ok(Self::new(Session::open(config).await?))
    }

    async fn send_each(&mut self, commands: &[String]) -> Result<()> {
        for command in commands {
            self.session.send_command(command).await?;
        }
        Ok(())
    }

    /// QoS profile number the switch maps 802.1p `priority` to.
    pub async fn get_tc_by_up(&mut self, priority: u8) -> Result<u8> {
        validate::priority(priority)?;
        let output = self.session.send_text("show dot1p").await?;
        parse::dot1p_profile(&output, priority).ok_or_else(|| {
            Error::unexpected(format!("Could not find QoS profile for priority {priority}"))
        })
    }

    /// Minimum bandwidth percent of traffic class `traffic_class` on `port`.
    pub async fn get_dcb_map_bw_by_tc(&mut self, traffic_class: u8, port: &str) -> Result<u8> {
        DIALECT.ports.ensure_either(port)?;
        if traffic_class >= DIALECT.traffic_classes {
            return Err(ValidationError::TooManyTrafficClasses {
                dialect: DIALECT.name,
                max: DIALECT.traffic_classes,
            }
            .into());
        }
        let output = self
            .session
            .send_text(&format!("show qosprofile port {port} | grep QP{traffic_class}"))
            .await?;
        parse::min_bandwidth(&output, traffic_class).ok_or_else(|| {
            Error::unexpected(format!(
                "Error retrieving bandwidth percentage for port {port}, PG {traffic_class}"
            ))
        })
    }

    /// Minimum bandwidth per QoS profile, in traffic-class order. Profiles
    /// are reset first so unlisted ones drop back to 0.
    pub async fn set_port_bandwidth(&mut self, port: &str, bandwidth: &[u8]) -> Result<()> {
        DIALECT.ensure_traffic_class_count(bandwidth.len())?;
        validate::bandwidth_total(bandwidth.iter().copied())?;
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.delete_port_bandwidth(port).await?;
        for (profile, min_bw) in (1..).zip(bandwidth) {
            self.session
                .send_command(&commands::profile_bandwidth(port, profile, *min_bw))
                .await?;
        }
        Ok(())
    }

    pub async fn delete_port_bandwidth(&mut self, port: &str) -> Result<()> {
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.send_each(&commands::reset_bandwidth(port)).await
    }

    /// VLAN of the port detail page, or `None` when it names none.
    async fn port_vlan(&mut self, port: &str) -> Result<Option<u16>> {
        let output = self
            .session
            .send_text(&format!("show ports {port} information detail"))
            .await?;
        Ok(parse::internal_tag(&output))
    }
}

#[async_trait]
impl Switch for Extreme {
    fn dialect(&self) -> &'static Dialect {
        &DIALECT
    }

    fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    async fn is_port_linkup(&mut self, port: &str) -> Result<Option<bool>> {
        DIALECT.ports.ensure_either(port)?;
        let output = self
            .session
            .send_text(&format!("show ports {port} information detail"))
            .await?;
        parse::link_state(&output).ok_or_else(|| {
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
            .send_text(&format!("show ports {port} no-refresh"))
            .await?;
        parse::port_speed(&output, port).ok_or_else(|| SwitchError::PortSpeed(port.to_string()).into())
    }

    /// Look `mac` up in the FDB, then among LLDP neighbour chassis ids.
    async fn get_port_by_mac(&mut self, mac: &str) -> Result<String> {
        let mac = self.change_standard_to_switch_mac_address(mac)?;
        let fdb = self.session.send_text(&format!("show fdb {mac}")).await?;
        if let Some(port) = parse::fdb_port(&fdb, &mac) {
            return Ok(port);
        }
        debug!("{mac} not in FDB, trying LLDP neighbours");
        let lldp = self.session.send_text("show lldp neighbors").await?;
        parse::lldp_port(&lldp, &mac).ok_or_else(|| SwitchError::PortForMacNotFound(mac).into())
    }

    async fn get_vlan_by_mac(&mut self, mac: &str) -> Result<u16> {
        let port = match self.get_port_by_mac(mac).await {
            Err(Error::Switch(SwitchError::PortForMacNotFound(mac))) => {
                return Err(SwitchError::VlanForMacNotFound(mac).into());
            }
            other => other?,
        };
        let mac = self.change_standard_to_switch_mac_address(mac)?;
        self.port_vlan(&port)
            .await?
            .ok_or_else(|| SwitchError::VlanForMacNotFound(mac).into())
    }

    async fn get_lldp_neighbors(&mut self) -> Result<Vec<LldpNeighbor>> {
        let output = self.session.send_text("show lldp neighbors").await?;
        Ok(parse::lldp_neighbors(&output))
    }

    async fn show_port_running_config(&mut self, port: &str) -> Result<String> {
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.session
            .send_text(&format!("show ports {port} configuration no-refresh"))
            .await
    }

    async fn show_vlans(&mut self, vlans: &[u16]) -> Result<String> {
        self.session.send_text(&commands::show_vlans(vlans)).await
    }

    /// Create `VLAN_<id>` and add the ports. EXOS has no switchport mode, so
    /// `config.mode` is not used.
    async fn configure_vlan(&mut self, config: &VlanConfig) -> Result<()> {
        self.validate_configure_parameters(
            &PortParameters::new(&config.ports)
                .vlan(config.vlan)
                .vlan_type(config.vlan_type),
        )?;
        self.session
            .send_configuration(&commands::configure_vlan(config))
            .await?;
        Ok(())
    }

    /// Delete the VLAN and confirm it is gone from `show vlan`.
    async fn remove_vlan(&mut self, vlan: u16) -> Result<bool> {
        if vlan == 0 {
            return Err(Error::invalid("VLAN Id must be specified."));
        }
        if vlan == 1 {
            return Err(Error::invalid("Should not remove the default VLAN."));
        }
        validate::vlan_id(vlan)?;
        self.session
            .send_configuration(&lines![format!("delete vlan {vlan}")])
            .await?;
        let output = self.session.send_text("show vlan").await?;
        Ok(!parse::vlans(&output).iter().any(|(_, vid)| *vid == vlan))
    }

    /// Drop the ports from every VLAN they are in, then restore the default
    /// VLAN, autonegotiation and admin state.
    async fn default_ports(&mut self, ports: &str) -> Result<()> {
        self.validate_configure_parameters(&PortParameters::new(ports))?;
        let output = self
            .session
            .send_text(&format!("show vlan ports {ports}"))
            .await?;
        for (name, _) in parse::vlans(&output) {
            self.session
                .send_command(&commands::delete_from_vlan(&name, ports))
                .await?;
        }
        info!("Restoring default settings on ports {ports}");
        self.send_each(&commands::restore_defaults(ports)).await
    }

    async fn shutdown(&mut self, shutdown: bool, port: &str) -> Result<()> {
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.session
            .send_command(&commands::shutdown(port, shutdown))
            .await?;
        Ok(())
    }

    async fn configure_lldp(&mut self, port: &str, directions: &[LldpDirection]) -> Result<()> {
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.session
            .send_command(&commands::lldp(port, directions))
            .await?;
        Ok(())
    }

    async fn set_port_flowcontrol(&mut self, port: &str, rx: bool, tx: bool) -> Result<()> {
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.send_each(&commands::flowcontrol(port, rx, tx)).await
    }

    async fn set_port_pfc_by_tc(&mut self, port: &str, priority: u8, pfc: PfcMode) -> Result<()> {
        self.validate_configure_parameters(&PortParameters::new(port))?;
        if pfc == PfcMode::Auto {
            return Err(Error::invalid(format!(
                "{pfc} is incorrect option for priority-flow-control mode"
            )));
        }
        let profile = self.get_tc_by_up(priority).await?;
        let commands = match pfc {
            PfcMode::On => commands::enable_pfc(port, priority, profile),
            _ => commands::disable_pfc(port, priority, profile),
        };
        self.send_each(&commands).await
    }

    async fn delete_port_pfc(&mut self, port: &str) -> Result<()> {
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.send_each(&commands::delete_pfc(port)).await
    }

    /// Reset every QoS profile's bandwidth; profiles are per port so there
    /// is no policy name to match.
    async fn delete_port_bw_by_tc(&mut self, port: &str, _suffix: &str) -> Result<()> {
        self.delete_port_bandwidth(port).await
    }
}
