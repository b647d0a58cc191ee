//! Dell Networking OS10.
//!
//! OS10 only accepts lowercase `ethernet` port names; every port argument
//! is converted before it reaches the console, and ranges or lists open an
//! `interface range`.

mod commands;
mod parse;

use async_trait::async_trait;
use indexmap::IndexMap;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::SwitchConfig;
use crate::dialect::{Dialect, PortSyntax};
use crate::error::{Error, Result, SwitchError};
use crate::mac::MacFormat;
use crate::session::Session;
use crate::switch::{Switch, join, priorities_by_tc};
use crate::types::{
    BreakOutMode, ChannelGroupMode, DcbxVersion, LacpRate, LldpDirection, LldpNeighbor, PfcMode,
    QosClassType, QueueType, SwitchportMode, VlanConfig,
};
use crate::validate::{self, PortParameters};

use commands::convert_port_name;

const ETHERNET: &str = r"(?i)^(eth|ethernet) ?\d+(/\d+)*(:\d+)?$";
const PORT_CHANNEL: &str = r"(?i)^port-channel ?\d+$";
const PORTS: &str = r"(?i)^((eth|ethernet) ?\d+(/\d+)*(:\d+)?(-\d+(/\d+)*(:\d+)?)?(,\d+(/\d+)*(:\d+)?(-\d+(/\d+)*(:\d+)?)?)*|port-channel ?\d+)$";

static DIALECT: Lazy<Dialect> = Lazy::new(|| Dialect {
    name: "DellOS10",
    ports: PortSyntax::new(ETHERNET, PORT_CHANNEL, PORTS).expect("DellOS10 port patterns are valid"),
    mac_format: MacFormat::Colon,
    port_channel_max: 128,
    traffic_classes: 8,
    max_frame_size: 9216,
});

/// Comma list of priorities or qos-groups for a class map.
static PRIORITY_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(,\d+)*$").expect("priority list pattern is valid"));

/// Highest SPAN session id.
const MAX_MONITOR_SESSION: u32 = 65535;

/// A Dell OS10 switch.
pub struct DellOs10 {
    session: Session,
}

impl DellOs10 {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn connect(config: &SwitchConfig) -> Result<Self> {
        Ok(Self::new(Session::open(config).await?))
    }

    async fn mac_table(&mut self, mac: &str) -> Result<(String, Option<(u16, String)>)> {
        let mac = self.change_standard_to_switch_mac_address(mac)?;
        let output = self.session.send_text("show mac address-table").await?;
        let entry = super::mac_entry(&output, &mac);
        Ok((mac, entry))
    }

    async fn configure(&mut self, lines: Vec<String>) -> Result<()> {
        self.session.send_configuration(&lines).await?;
        Ok(())
    }

    /// Enter configuration mode on `port` and stay there.
    pub async fn prepare_port_configuration(&mut self, port: &str) -> Result<()> {
        DIALECT.ensure_ports(port)?;
        self.session
            .send_command_list(&lines!["configure terminal", commands::interface(port)])
            .await?;
        Ok(())
    }

    /// Names of the configured VLAN interfaces (`vlan1`, `vlan2`, ...).
    pub async fn list_vlan_id(&mut self) -> Result<Vec<String>> {
        let output = self
            .session
            .send_text("show running-configuration | grep \"interface vlan\"")
            .await?;
        Ok(parse::vlan_ids(&output))
    }

    pub async fn show_lldp_info(&mut self, port: &str) -> Result<String> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_text(&format!(
                "show lldp neighbors interface {} detail",
                convert_port_name(port)
            ))
            .await
    }

    pub async fn set_ets_mode_on(&mut self, port: &str) -> Result<()> {
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.configure(commands::ets_mode_on(port)).await
    }

    /// Class map matching `priority`, a comma list such as `0,1,2`.
    pub async fn create_qos_class_map(
        &mut self,
        name: &str,
        priority: &str,
        class_type: QosClassType,
    ) -> Result<()> {
        if !PRIORITY_LIST.is_match(priority) {
            return Err(Error::unexpected(format!(
                "Incorrect priority format for class map {name}: {priority}"
            )));
        }
        self.configure(commands::class_map(name, priority, class_type)).await
    }

    /// Traffic-class map with one queue per class used in `queues`.
    pub async fn create_qos_map(
        &mut self,
        queues: &[u8],
        tc_name: &str,
        queue_type: QueueType,
    ) -> Result<()> {
        DIALECT.ensure_traffic_class_count(queues.len())?;
        for queue in queues {
            DIALECT.ensure_traffic_class(*queue)?;
        }
        self.configure(commands::qos_map(queues, tc_name, queue_type)).await
    }

    /// Queuing policy giving each class its bandwidth share.
    pub async fn create_qos_queuing_policy_map(
        &mut self,
        name: &str,
        class_bandwidth: &[(&str, u8)],
    ) -> Result<()> {
        validate::bandwidth_total(class_bandwidth.iter().map(|(_, bw)| *bw))?;
        self.configure(commands::queuing_policy_map(name, class_bandwidth))
            .await
    }

    /// Network-qos policy pairing each class with the CoS values it pauses.
    pub async fn create_network_qos_policy_map(
        &mut self,
        name: &str,
        classes: &[&str],
        cos: &[&str],
    ) -> Result<()> {
        if classes.len() != cos.len() {
            return Err(Error::unexpected(format!(
                "Got {} classes but {} CoS values for policy map {name}",
                classes.len(),
                cos.len()
            )));
        }
        self.configure(commands::network_qos_policy_map(name, classes, cos))
            .await
    }

    /// Apply queuing, trust and network-qos policies, ETS and iSCSI PFC to
    /// one port.
    pub async fn configure_qos_pfc_interface(
        &mut self,
        port: &str,
        qos_policy: &str,
        traffic_policy: &str,
        trust_policy: &str,
        service_policy: &str,
    ) -> Result<()> {
        DIALECT.ensure_ports(port)?;
        let blocks =
            commands::qos_pfc_interface(port, qos_policy, traffic_policy, trust_policy, service_policy);
        for block in blocks {
            self.configure(block).await?;
        }
        Ok(())
    }

    pub async fn create_iscsi_policy_map(&mut self, name: &str) -> Result<()> {
        self.configure(commands::iscsi_policy_map(name)).await
    }

    /// Member ports of every port group.
    pub async fn get_port_groups(&mut self) -> Result<IndexMap<String, Vec<String>>> {
        let output = self.session.send_text("show port-group").await?;
        Ok(parse::port_groups(&output))
    }

    /// Break a port group, or one port of it, out into `mode`.
    pub async fn set_port_group_mode(
        &mut self,
        port_group: &str,
        port: Option<&str>,
        mode: BreakOutMode,
    ) -> Result<()> {
        self.configure(commands::port_group_mode(port_group, port, mode))
            .await
    }

    /// Mirror received traffic of `source` to `destination`, or tear the
    /// session down.
    pub async fn set_port_mirroring(
        &mut self,
        source: &str,
        destination: &str,
        session: u32,
        enabled: bool,
    ) -> Result<()> {
        if session > MAX_MONITOR_SESSION {
            return Err(Error::invalid(format!(
                "Invalid Session ID. Valid Range 0 - {MAX_MONITOR_SESSION}"
            )));
        }
        self.validate_configure_parameters(&PortParameters::new(source))?;
        self.validate_configure_parameters(&PortParameters::new(destination))?;

        let running = self
            .session
            .send_text("show running-configuration | grep \"monitor session\"")
            .await?;
        let defined = parse::has_monitor_session(&running, session);
        let source = convert_port_name(source);
        let destination = convert_port_name(destination);

        match (enabled, defined) {
            (true, true) => Err(Error::invalid(
                "Session ID Requested to be Added is Already Defined!",
            )),
            (false, false) => Err(Error::invalid(
                "Session ID Requested to be Removed Cannot Be Found.",
            )),
            (true, false) => {
                info!("Mirroring {source} to {destination} in session {session}");
                for block in commands::start_mirroring(session, &source, &destination) {
                    self.configure(block).await?;
                }
                Ok(())
            }
            (false, true) => {
                info!("Removing monitor session {session}");
                self.configure(commands::stop_mirroring(
                    session,
                    &destination,
                    DIALECT.max_frame_size,
                ))
                .await
            }
        }
    }
}

#[async_trait]
impl Switch for DellOs10 {
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
            .send_text(&format!("show interface {}", convert_port_name(port)))
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
            .send_text(&format!("show interface {}", convert_port_name(port)))
            .await?;
        parse::line_speed(&output).ok_or_else(|| SwitchError::PortSpeed(port.to_string()).into())
    }

    async fn get_port_by_mac(&mut self, mac: &str) -> Result<String> {
        match self.mac_table(mac).await? {
            (_, Some((_, port))) => Ok(port),
            (mac, None) => Err(SwitchError::PortForMacNotFound(mac).into()),
        }
    }

    async fn get_vlan_by_mac(&mut self, mac: &str) -> Result<u16> {
        match self.mac_table(mac).await? {
            (_, Some((vlan, _))) => Ok(vlan),
            (mac, None) => Err(SwitchError::VlanForMacNotFound(mac).into()),
        }
    }

    async fn get_lldp_neighbors(&mut self) -> Result<Vec<LldpNeighbor>> {
        let output = self.session.send_text("show lldp neighbors").await?;
        Ok(parse::lldp_neighbors(&output))
    }

    async fn show_port_running_config(&mut self, port: &str) -> Result<String> {
        DIALECT.ensure_ports(port)?;
        self.session
            .send_text(&format!(
                "show running-configuration interface {}",
                convert_port_name(port)
            ))
            .await
    }

    async fn show_vlans(&mut self, vlans: &[u16]) -> Result<String> {
        let command = if vlans.is_empty() {
            "show vlan".to_string()
        } else {
            format!("show vlan {}", join(vlans, ","))
        };
        self.session.send_text(&command).await
    }

    /// VLAN 1 is the default VLAN and is left alone.
    async fn configure_vlan(&mut self, config: &VlanConfig) -> Result<()> {
        if config.vlan == 1 {
            debug!("VLAN 1 is the default VLAN, nothing to configure");
            return Ok(());
        }
        if config.mode == SwitchportMode::Hybrid {
            return Err(Error::invalid(format!("Incorrect switchport mode: {}", config.mode)));
        }
        self.validate_configure_parameters(
            &PortParameters::new(&config.ports)
                .mode(config.mode)
                .vlan(config.vlan)
                .vlan_type(config.vlan_type),
        )?;
        let vlan_interface = format!("interface vlan {}", config.vlan);
        self.configure(lines![vlan_interface.as_str()]).await?;
        self.configure(commands::vlan_membership(config)).await?;
        self.configure(lines![vlan_interface, "no shutdown"]).await
    }

    async fn remove_vlan(&mut self, vlan: u16) -> Result<bool> {
        match vlan {
            0 => return Err(Error::invalid("VLAN Id must be specified.")),
            1 => return Err(Error::invalid("Should not remove the default VLAN.")),
            _ => validate::vlan_id(vlan)?,
        }
        self.configure(lines![format!("no interface vlan {vlan}")]).await?;
        let remaining = self.list_vlan_id().await?;
        Ok(!remaining.contains(&format!("vlan{vlan}")))
    }

    async fn shutdown(&mut self, shutdown: bool, port: &str) -> Result<()> {
        DIALECT.ensure_ports(port)?;
        self.configure(commands::shutdown(shutdown, port)).await
    }

    async fn create_port_channel_interface(&mut self, number: u32) -> Result<()> {
        DIALECT.ensure_port_channel_number(number)?;
        self.session
            .send_command_list(&lines![
                "configure terminal",
                format!("interface port-channel{number}"),
                "end",
            ])
            .await?;
        Ok(())
    }

    async fn remove_port(&mut self, port: &str) -> Result<()> {
        DIALECT.ports.ensure_port_channel(port)?;
        self.session
            .send_command_list(&lines![
                "configure terminal",
                format!("no interface {}", convert_port_name(port)),
            ])
            .await?;
        Ok(())
    }

    async fn add_port_to_channel_group(
        &mut self,
        port: &str,
        number: u32,
        mode: Option<ChannelGroupMode>,
        _force: bool,
    ) -> Result<()> {
        DIALECT.ensure_port_channel_number(number)?;
        DIALECT.ports.ensure_ethernet(port)?;
        let mode = mode.unwrap_or(ChannelGroupMode::Active);
        self.session
            .send_command_list(&lines![
                "configure terminal",
                commands::interface(port),
                format!("channel-group {number} mode {mode}"),
            ])
            .await?;
        Ok(())
    }

    async fn set_switchport_mode(&mut self, port: &str, mode: SwitchportMode) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        if mode == SwitchportMode::Hybrid {
            return Err(Error::invalid(format!("Incorrect switchport mode: {mode}")));
        }
        self.session
            .send_command_list(&lines![
                "configure terminal",
                commands::interface(port),
                format!("switchport mode {mode}"),
            ])
            .await?;
        Ok(())
    }

    async fn set_lacp_rate(&mut self, port: &str, rate: LacpRate) -> Result<()> {
        DIALECT.ports.ensure_ethernet(port)?;
        self.session
            .send_command_list(&lines![
                "configure terminal",
                commands::interface(port),
                format!("lacp rate {rate}"),
            ])
            .await?;
        Ok(())
    }

    /// OS10 needs the rate being removed.
    async fn disable_lacp_rate(&mut self, port: &str, rate: Option<LacpRate>) -> Result<()> {
        DIALECT.ports.ensure_ethernet(port)?;
        let rate = rate.ok_or_else(|| Error::invalid("no rate is incorrect option for LACP rate"))?;
        self.session
            .send_command_list(&lines![
                "configure terminal",
                commands::interface(port),
                format!("no lacp rate {rate}"),
            ])
            .await?;
        Ok(())
    }

    async fn configure_lldp(&mut self, port: &str, directions: &[LldpDirection]) -> Result<()> {
        DIALECT.ensure_ports(port)?;
        self.configure(commands::configure_lldp(port, directions)).await
    }

    async fn set_port_flowcontrol(&mut self, port: &str, rx: bool, tx: bool) -> Result<()> {
        DIALECT.ensure_ports(port)?;
        self.configure(commands::flowcontrol(port, rx, tx)).await
    }

    async fn show_port_dcbx(&mut self, port: &str) -> Result<String> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_text(&format!(
                "show lldp dcbx interface {}",
                convert_port_name(port)
            ))
            .await
    }

    async fn set_port_dcbx_version(&mut self, port: &str, version: DcbxVersion) -> Result<()> {
        DIALECT.ensure_ports(port)?;
        self.configure(commands::dcbx_version(port, version)).await
    }

    async fn clear_port_dcbx(&mut self, port: &str) -> Result<()> {
        DIALECT.ensure_ports(port)?;
        self.configure(commands::clear_dcbx(port)).await
    }

    async fn set_port_pfc_by_tc(&mut self, port: &str, priority: u8, pfc: PfcMode) -> Result<()> {
        DIALECT.ensure_ports(port)?;
        validate::priority(priority)?;
        self.configure(commands::pfc_mode(port, pfc)).await
    }

    async fn delete_port_pfc(&mut self, port: &str) -> Result<()> {
        DIALECT.ensure_ports(port)?;
        self.configure(commands::no_pfc(port)).await
    }

    /// Trust map, unicast and multicast qos maps, one queuing class per
    /// traffic class, the queuing policy `PM_<suffix>`, and a network-qos
    /// policy `PMQ_<suffix>` pausing every priority outside class 0.
    async fn create_qos_policy(&mut self, bandwidth: &[u8], up2tc: &[u8], suffix: &str) -> Result<()> {
        DIALECT.ensure_traffic_class_count(up2tc.len())?;
        for tc in up2tc {
            DIALECT.ensure_traffic_class(*tc)?;
        }
        validate::bandwidth_total(bandwidth.iter().copied())?;

        self.configure(commands::trust_map(up2tc, suffix)).await?;
        let qos_map = format!("QM_{suffix}");
        self.create_qos_map(up2tc, &qos_map, QueueType::Ucast).await?;
        self.create_qos_map(up2tc, &qos_map, QueueType::Mcast).await?;

        let classes: Vec<u8> = priorities_by_tc(up2tc).keys().copied().collect();
        for tc in &classes {
            self.create_qos_class_map(&format!("Q{tc}_{suffix}"), &tc.to_string(), QosClassType::Queuing)
                .await?;
        }
        let class_names: Vec<String> = classes.iter().map(|tc| format!("Q{tc}_{suffix}")).collect();
        let class_bandwidth: Vec<(&str, u8)> = classes
            .iter()
            .zip(&class_names)
            .map(|(tc, class)| {
                let share = bandwidth.get(usize::from(*tc)).copied().unwrap_or(0);
                (class.as_str(), share)
            })
            .collect();
        self.create_qos_queuing_policy_map(&format!("PM_{suffix}"), &class_bandwidth)
            .await?;

        let lossless: Vec<usize> = up2tc
            .iter()
            .enumerate()
            .filter(|(_, tc)| **tc != 0)
            .map(|(priority, _)| priority)
            .collect();
        if lossless.is_empty() {
            return Ok(());
        }
        let lossless = join(&lossless, ",");
        let network_class = format!("CMQ_{suffix}");
        self.create_qos_class_map(&network_class, &lossless, QosClassType::NetworkQos)
            .await?;
        self.create_network_qos_policy_map(&format!("PMQ_{suffix}"), &[network_class.as_str()], &[lossless.as_str()])
            .await
    }

    async fn delete_qos_policy(&mut self, suffix: &str) -> Result<()> {
        self.configure(commands::delete_qos_policy(suffix)).await
    }

    async fn set_port_bw_by_tc(&mut self, port: &str, suffix: &str) -> Result<()> {
        DIALECT.ensure_ports(port)?;
        self.configure(commands::attach_policies(port, suffix)).await
    }

    async fn delete_port_bw_by_tc(&mut self, port: &str, suffix: &str) -> Result<()> {
        DIALECT.ensure_ports(port)?;
        self.configure(commands::detach_policies(port, suffix)).await
    }
}
