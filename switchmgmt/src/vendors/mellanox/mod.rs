//! Mellanox Onyx (MLNX-OS).
//!
//! Onyx takes interface settings as flat `interface ethernet 1/1 <setting>`
//! lines, so most operations here address ports by their `1/1` number.
//! DCB helpers (ETS, PFC, switch-priority binding) are inherent methods.

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
use crate::types::{
    EtsMode, FecMode, LldpDirection, LldpNeighbor, State, SwitchportMode, VlanConfig,
};
use crate::validate::{self, PortParameters};
use crate::vendors::cisco;

const ETHERNET: &str = r"(?i)^(ethernet|eth) ?\d+(/\d+){1,2}$";
const PORT_CHANNEL: &str = r"(?i)^(port-channel|po) ?\d+$";
const PORTS: &str = r"(?i)^((ethernet|eth) ?\d+(/\d+){1,2}(-\d+(/\d+){1,2})?|(port-channel|po) ?\d+)$";

static DIALECT: Lazy<Dialect> = Lazy::new(|| Dialect {
    name: "Mellanox",
    ports: PortSyntax::new(ETHERNET, PORT_CHANNEL, PORTS).expect("Mellanox port patterns are valid"),
    mac_format: MacFormat::Colon,
    port_channel_max: 4096,
    traffic_classes: 8,
    max_frame_size: 9216,
});

/// Hardware generation; only the 25G line supports FEC override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MellanoxModel {
    #[default]
    Generic,
    Mellanox25G,
}

/// A Mellanox Onyx switch.
pub struct Mellanox {
    session: Session,
    model: MellanoxModel,
}

/// `1/1` from `ethernet 1/1` or `Eth1/1`.
pub fn extract_port_number(port: &str) -> Result<String> {
    parse::port_number(port)
        .map(str::to_string)
        .ok_or_else(|| ValidationError::InvalidPortFormat(port.to_string()).into())
}

fn check_traffic_class(value: u8, message: &str) -> Result<()> {
    if value > 7 {
        return Err(Error::invalid(message));
    }
    Ok(())
}

impl Mellanox {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            model: MellanoxModel::default(),
        }
    }

    pub fn with_model(mut self, model: MellanoxModel) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> MellanoxModel {
        self.model
    }

    pub async fn connect(config: &SwitchConfig) -> Result<Self> {
        Ok(Self::new(Session::open(config).await?))
    }

    /// Leave any open configuration context, then enter the port's.
    pub async fn prepare_port_configuration(&mut self, port: &str) -> Result<()> {
        self.session.exit_port_configuration().await?;
        let number = extract_port_number(port)?;
        self.session
            .send_command_list(&lines!["configure terminal", format!("interface ethernet {number}")])
            .await?;
        Ok(())
    }

    /// ETS bandwidth per traffic class as `(class, percent)` pairs. Classes
    /// not listed share what is left evenly.
    pub async fn set_dcb_qos_conf(&mut self, port: &str, tc_bandwidth: &[(u8, u8)]) -> Result<()> {
        self.validate_configure_parameters(&PortParameters::new(port))?;
        DIALECT.ensure_traffic_class_count(tc_bandwidth.len())?;
        DIALECT.ensure_traffic_classes(tc_bandwidth.iter().map(|(tc, _)| *tc))?;
        validate::bandwidth_total(tc_bandwidth.iter().map(|(_, bw)| *bw))?;
        self.session
            .send_command_list(&commands::dcb_qos(port, tc_bandwidth, DIALECT.traffic_classes))
            .await?;
        Ok(())
    }

    pub async fn set_dcb_priority_flow_control(&mut self, priority: u8, state: State) -> Result<()> {
        check_traffic_class(priority, "Invalid priority value, must be from 0 - 7")?;
        self.session
            .send_command_list(&commands::priority_flow_control(priority, state))
            .await?;
        Ok(())
    }

    /// Turn PFC on globally.
    pub async fn enable_pfc(&mut self) -> Result<()> {
        self.session.send_command_list(&commands::enable_pfc()).await?;
        Ok(())
    }

    pub async fn enable_pfc_priority(&mut self, priority: u8) -> Result<()> {
        self.set_dcb_priority_flow_control(priority, State::Enable).await
    }

    /// Hybrid switchport on all VLANs with link-level pause off, which PFC
    /// requires.
    pub async fn prepare_for_pfc_on_port(&mut self, port: &str) -> Result<()> {
        let number = extract_port_number(port)?;
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.session
            .send_command_list(&commands::prepare_for_pfc(&number))
            .await?;
        Ok(())
    }

    /// Scheduling of one traffic class. WRR needs a bandwidth of 1-100.
    pub async fn set_ets_on_port(
        &mut self,
        port: &str,
        priority: u8,
        mode: EtsMode,
        bandwidth: Option<u8>,
    ) -> Result<()> {
        check_traffic_class(priority, "Priority must be between 0 and 7.")?;
        if mode == EtsMode::Wrr && !bandwidth.is_some_and(|bw| (1..=100).contains(&bw)) {
            return Err(Error::invalid(
                "For WRR mode, bandwidth must be specified and between 1 and 100.",
            ));
        }
        let number = extract_port_number(port)?;
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.session
            .send_command_list(&commands::ets(&number, priority, mode, bandwidth))
            .await?;
        Ok(())
    }

    pub async fn set_bind_switch_priority_on_port(
        &mut self,
        port: &str,
        traffic_class: u8,
        priorities: &[u8],
    ) -> Result<()> {
        check_traffic_class(traffic_class, "Traffic class must be between 0 and 7.")?;
        if priorities.iter().any(|p| *p > 7) {
            return Err(Error::invalid("All switch priorities must be between 0 and 7."));
        }
        let number = extract_port_number(port)?;
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.session
            .send_command_list(&commands::bind_switch_priority(&number, traffic_class, priorities))
            .await?;
        Ok(())
    }

    pub async fn set_lldp_transmit(&mut self, port: &str) -> Result<()> {
        self.set_lldp(port, LldpDirection::Transmit).await
    }

    pub async fn set_lldp_receive(&mut self, port: &str) -> Result<()> {
        self.set_lldp(port, LldpDirection::Receive).await
    }

    async fn set_lldp(&mut self, port: &str, direction: LldpDirection) -> Result<()> {
        let number = extract_port_number(port)?;
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.session
            .send_command_list(&commands::lldp(&number, direction))
            .await?;
        Ok(())
    }

    /// PFC for a userspace (DPDK) host: every priority in class 0 at full
    /// weight, the other classes strict.
    pub async fn set_pfc_on_port_userspace(&mut self, port: &str) -> Result<()> {
        info!("Configuring userspace PFC on {port}");
        self.prepare_for_pfc_on_port(port).await?;
        self.set_bind_switch_priority_on_port(port, 0, &[0, 1, 2, 3, 4, 5, 6, 7])
            .await?;
        self.set_ets_on_port(port, 0, EtsMode::Wrr, Some(100)).await?;
        for tc in 1..8 {
            self.set_ets_on_port(port, tc, EtsMode::Strict, None).await?;
        }
        Ok(())
    }

    /// PFC for a kernel-driver host: priority 3 alone in class 1, split
    /// evenly with class 0, LLDP on for DCBX.
    pub async fn set_pfc_on_port_ndk(&mut self, port: &str) -> Result<()> {
        info!("Configuring NDK PFC on {port}");
        self.prepare_for_pfc_on_port(port).await?;
        self.set_bind_switch_priority_on_port(port, 0, &[0, 1, 2, 4, 5, 6, 7])
            .await?;
        self.set_bind_switch_priority_on_port(port, 1, &[3]).await?;
        self.set_ets_on_port(port, 0, EtsMode::Wrr, Some(50)).await?;
        self.set_ets_on_port(port, 1, EtsMode::Wrr, Some(50)).await?;
        for tc in 2..8 {
            self.set_ets_on_port(port, tc, EtsMode::Strict, None).await?;
        }
        self.set_lldp_transmit(port).await?;
        self.set_lldp_receive(port).await
    }

    pub async fn disable_pfc_on_port(&mut self, port: &str) -> Result<()> {
        let number = extract_port_number(port)?;
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.session
            .send_command_list(&commands::disable_pfc(&number))
            .await?;
        Ok(())
    }

    async fn status_table(&mut self, port: &str) -> Result<(String, String)> {
        let number = extract_port_number(port)?;
        let output = self
            .session
            .send_text(&format!("show interfaces ethernet {number} status"))
            .await?;
        Ok((number, output))
    }

    async fn mac_entry(&mut self, mac: &str) -> Result<(u16, String)> {
        let mac = self.change_standard_to_switch_mac_address(mac)?;
        let output = self
            .session
            .send_text(&format!("show mac-address-table address {mac}"))
            .await?;
        cisco::parse::mac_entry(&output, &mac).ok_or_else(|| SwitchError::MacNotFound(mac).into())
    }

    fn unsupported(operation: &'static str) -> Error {
        Error::Unsupported {
            dialect: DIALECT.name,
            operation,
        }
    }
}

#[async_trait]
impl Switch for Mellanox {
    fn dialect(&self) -> &'static Dialect {
        &DIALECT
    }

    fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    async fn is_port_linkup(&mut self, port: &str) -> Result<Option<bool>> {
        let (number, output) = self.status_table(port).await?;
        parse::status_state(&output, &number).ok_or_else(|| {
            SwitchError::LinkStatus {
                dialect: DIALECT.name,
                port: port.to_string(),
            }
            .into()
        })
    }

    async fn get_port_speed(&mut self, port: &str) -> Result<u32> {
        let (number, output) = self.status_table(port).await?;
        parse::status_speed(&output, &number)
            .ok_or_else(|| SwitchError::PortSpeed(port.to_string()).into())
    }

    async fn get_port_by_mac(&mut self, mac: &str) -> Result<String> {
        Ok(self.mac_entry(mac).await?.1)
    }

    async fn get_vlan_by_mac(&mut self, mac: &str) -> Result<u16> {
        Ok(self.mac_entry(mac).await?.0)
    }

    async fn get_lldp_neighbors(&mut self) -> Result<Vec<LldpNeighbor>> {
        let output = self.session.send_text("show lldp remote").await?;
        Ok(parse::lldp_neighbors(&output))
    }

    /// Lines of the flat running config that configure exactly `port`.
    async fn show_port_running_config(&mut self, port: &str) -> Result<String> {
        let name = format!("ethernet {}", extract_port_number(port)?);
        let config = self.session.send_text("show running-config").await?;
        Ok(crate::parse::interface_config_lines(&config, &name).join("\n"))
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

    async fn shutdown(&mut self, shutdown: bool, port: &str) -> Result<()> {
        let number = extract_port_number(port)?;
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.session
            .send_command_list(&commands::shutdown(&number, shutdown))
            .await?;
        Ok(())
    }

    async fn configure_lldp(&mut self, port: &str, directions: &[LldpDirection]) -> Result<()> {
        let directions = if directions.is_empty() {
            &[LldpDirection::Receive, LldpDirection::Transmit][..]
        } else {
            directions
        };
        for direction in directions {
            self.set_lldp(port, *direction).await?;
        }
        Ok(())
    }

    async fn set_port_flowcontrol(&mut self, port: &str, rx: bool, tx: bool) -> Result<()> {
        let number = extract_port_number(port)?;
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.session
            .send_command_list(&commands::flowcontrol(&number, rx, tx))
            .await?;
        Ok(())
    }

    async fn get_fec(&mut self, port: &str) -> Result<Option<FecMode>> {
        if self.model != MellanoxModel::Mellanox25G {
            return Err(Self::unsupported("get_fec"));
        }
        let config = self.show_port_running_config(port).await?;
        parse::fec_override(&config)
            .ok_or_else(|| Error::unexpected(format!("Error while checking FEC on port: {port}")))
    }

    /// Apply a FEC override with the port bounced, then confirm it stuck.
    async fn set_fec(&mut self, port: &str, mode: FecMode) -> Result<bool> {
        if self.model != MellanoxModel::Mellanox25G {
            return Err(Self::unsupported("set_fec"));
        }
        self.prepare_port_configuration(port).await?;
        self.session
            .send_command_list(&commands::fec_override(mode))
            .await?;
        let current = self.get_fec(port).await?;
        debug!("{port}: FEC is {current:?} after override to {mode}");
        Ok(current == Some(mode))
    }
}
