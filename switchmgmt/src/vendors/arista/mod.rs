//! Arista EOS.

mod commands;
mod parse;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::SwitchConfig;
use crate::dialect::{Dialect, PortSyntax};
use crate::error::{Error, Result, SwitchError, ValidationError};
use crate::mac::MacFormat;
use crate::session::Session;
use crate::switch::Switch;
use crate::types::{
    ChannelGroupMode, DcbxVersion, FecMode, LldpDirection, PfcMode, SwitchportMode, VlanConfig,
};
use crate::validate::{self, PortParameters};

pub use commands::{DEFAULT_COS_TO_TC, DEFAULT_TC_BANDWIDTH};

const ETHERNET: &str = r"(?i)^(et|eth|ethernet) ?\d+(/\d+){0,2}$";
const PORT_CHANNEL: &str = r"(?i)^(po|port-channel) ?\d+$";
const PORTS: &str = r"(?i)^((et|eth|ethernet) ?\d+(/\d+){0,2}(-\d+)?(, ?(et|eth|ethernet) ?\d+(/\d+){0,2}(-\d+)?)*|(po|port-channel) ?\d+)$";

static DIALECT: Lazy<Dialect> = Lazy::new(|| Dialect {
    name: "Arista",
    ports: PortSyntax::new(ETHERNET, PORT_CHANNEL, PORTS).expect("Arista port patterns are valid"),
    mac_format: MacFormat::CiscoDotted,
    port_channel_max: 2000,
    traffic_classes: 8,
    max_frame_size: 9214,
});

/// `port-channel` optionally followed by a comma list of numbers.
static PORT_CHANNEL_LIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^port-channel( +\d+(, *\d+)*)?$").expect("port-channel list pattern is valid")
});

/// An Arista EOS switch.
pub struct Arista {
    session: Session,
}

impl Arista {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub async fn connect(config: &SwitchConfig) -> Result<Self> {
        Ok(Self::new(Session::open(config).await?))
    }

    async fn mac_entry(&mut self, mac: &str) -> Result<(u16, String)> {
        let mac = self.change_standard_to_switch_mac_address(mac)?;
        let output = self.session.send_text("show mac address-table").await?;
        parse::mac_entry(&output, &mac).ok_or_else(|| SwitchError::MacNotFound(mac).into())
    }

    async fn prepare_port_configuration(&mut self, port: &str) -> Result<()> {
        self.session.send_command_list(&commands::interface(port)).await?;
        Ok(())
    }

    /// The `speed` line currently configured on `port`, or empty.
    pub async fn speed_command_from_configuration(&mut self, port: &str) -> Result<String> {
        let config = self.show_port_running_config(port).await?;
        Ok(parse::speed_command(&config))
    }

    /// Show the given port-channels: `port-channel` or
    /// `port-channel 111, 222`.
    pub async fn show_port_channel(&mut self, port_channels: &str) -> Result<String> {
        if !PORT_CHANNEL_LIST.is_match(port_channels) {
            return Err(ValidationError::NotPortChannel(port_channels.to_string()).into());
        }
        self.session.send_text(&format!("show {port_channels}")).await
    }

    /// Turn FEC off and report whether it is off.
    pub async fn disable_fec(&mut self, port: &str) -> Result<bool> {
        self.set_fec(port, FecMode::NoFec).await
    }

    pub async fn configure_trunking(&mut self, port: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session.send_configuration(&commands::configure_trunking(port)).await?;
        Ok(())
    }

    pub async fn configure_dcbx_mode(&mut self, port: &str) -> Result<()> {
        self.set_port_dcbx_version(port, DcbxVersion::Ieee).await
    }

    pub async fn disable_flowcontrol(&mut self, port: &str) -> Result<()> {
        self.set_port_flowcontrol(port, false, false).await
    }

    pub async fn configure_priority_flow_control(&mut self, port: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_configuration(&commands::priority_flow_control(port))
            .await?;
        Ok(())
    }

    /// Map CoS values to traffic classes, or remove the mapping.
    pub async fn configure_dcbx_qos_map(&mut self, cos_to_tc: &[(u8, u8)], disable: bool) -> Result<()> {
        for (cos, tc) in cos_to_tc {
            validate::priority(*cos)?;
            DIALECT.ensure_traffic_class(*tc)?;
        }
        validate::distinct("Priority", cos_to_tc.iter().map(|(cos, _)| *cos))?;
        self.session
            .send_configuration(&commands::dcbx_qos_map(cos_to_tc, disable))
            .await?;
        Ok(())
    }

    /// Assign ETS bandwidth to traffic classes, or remove it.
    pub async fn configure_dcbx_ets_traffic_class(
        &mut self,
        class_bandwidth: &[(u8, u8)],
        disable: bool,
    ) -> Result<()> {
        DIALECT.ensure_traffic_classes(class_bandwidth.iter().map(|(tc, _)| *tc))?;
        validate::bandwidth_total(class_bandwidth.iter().map(|(_, bw)| *bw))?;
        self.session
            .send_configuration(&commands::dcbx_ets_traffic_class(class_bandwidth, disable))
            .await?;
        Ok(())
    }

    /// Global DCBX maps of the userspace PFC profile.
    pub async fn configure_dcbx(&mut self) -> Result<()> {
        self.configure_dcbx_qos_map(&DEFAULT_COS_TO_TC, false).await?;
        self.configure_dcbx_ets_traffic_class(&DEFAULT_TC_BANDWIDTH, false)
            .await
    }

    /// Apply the userspace PFC profile to `port`.
    pub async fn configure_pfc_userspace(&mut self, port: &str) -> Result<()> {
        self.configure_dcbx().await?;
        self.configure_lldp(port, &[]).await?;
        self.configure_trunking(port).await?;
        self.configure_dcbx_mode(port).await?;
        self.disable_flowcontrol(port).await?;
        self.configure_priority_flow_control(port).await
    }

    /// Undo [`Arista::configure_pfc_userspace`].
    pub async fn disable_pfc_userspace(&mut self, port: &str) -> Result<()> {
        DIALECT.ports.ensure_ethernet(port)?;
        self.session
            .send_configuration(&lines![format!("default interface {port}")])
            .await?;
        self.configure_dcbx_ets_traffic_class(&DEFAULT_TC_BANDWIDTH, true)
            .await?;
        self.configure_dcbx_qos_map(&DEFAULT_COS_TO_TC, true).await
    }
}

#[async_trait]
impl Switch for Arista {
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
            .send_text(&format!("show interfaces {port} phy"))
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
            .send_text(&format!("show interfaces {port} status"))
            .await?;
        parse::port_speed(&output, port).ok_or_else(|| SwitchError::PortSpeed(port.to_string()).into())
    }

    async fn get_port_by_mac(&mut self, mac: &str) -> Result<String> {
        Ok(self.mac_entry(mac).await?.1)
    }

    async fn get_vlan_by_mac(&mut self, mac: &str) -> Result<u16> {
        Ok(self.mac_entry(mac).await?.0)
    }

    async fn show_port_running_config(&mut self, port: &str) -> Result<String> {
        DIALECT.ensure_ports(port)?;
        self.session
            .send_text(&format!("show running-config interfaces {port}"))
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
        let speed = self.speed_command_from_configuration(ports).await?;
        self.session
            .send_command_list(&commands::default_ports(ports, &speed))
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
        _force: bool,
    ) -> Result<()> {
        DIALECT.ensure_port_channel_number(number)?;
        DIALECT.ports.ensure_either(port)?;
        let mode = mode.unwrap_or(ChannelGroupMode::Active);
        self.session
            .send_command_list(&commands::add_to_channel_group(port, number, mode))
            .await?;
        Ok(())
    }

    async fn remove_port_from_port_channel(&mut self, port: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.prepare_port_configuration(port).await?;
        self.session
            .send_command_list(&lines!["no channel-group", "end"])
            .await?;
        Ok(())
    }

    async fn show_port_channel_summary(&mut self, number: Option<u32>) -> Result<String> {
        let command = match number {
            Some(number) => {
                DIALECT.ensure_port_channel_number(number)?;
                format!("show port-channel {number} summary")
            }
            None => "show port-channel summary".to_string(),
        };
        self.session.send_text(&command).await
    }

    async fn set_switchport_mode(&mut self, port: &str, mode: SwitchportMode) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_configuration(&commands::set_switchport_mode(port, mode))
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
            .send_configuration(&commands::flowcontrol(port, rx, tx))
            .await?;
        Ok(())
    }

    async fn show_port_dcbx(&mut self, port: &str) -> Result<String> {
        DIALECT.ports.ensure_either(port)?;
        self.session.send_text(&format!("show dcbx {port}")).await
    }

    async fn set_port_dcbx_version(&mut self, port: &str, version: DcbxVersion) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_configuration(&commands::dcbx_mode(port, Some(version)))
            .await?;
        Ok(())
    }

    async fn clear_port_dcbx(&mut self, port: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_configuration(&commands::dcbx_mode(port, None))
            .await?;
        Ok(())
    }

    async fn set_port_pfc_by_tc(&mut self, port: &str, priority: u8, pfc: PfcMode) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        validate::priority(priority)?;
        if pfc == PfcMode::Auto {
            return Err(Error::invalid("Arista supports only 'on' and 'off' PFC per priority"));
        }
        self.session
            .send_configuration(&commands::pfc_priority(port, priority, pfc))
            .await?;
        Ok(())
    }

    async fn delete_port_pfc(&mut self, port: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_configuration(&commands::delete_pfc(port))
            .await?;
        Ok(())
    }

    async fn get_fec(&mut self, port: &str) -> Result<Option<FecMode>> {
        DIALECT.ports.ensure_either(port)?;
        let output = self
            .session
            .send_command_list(&commands::show_fec(port))
            .await?
            .into_text();
        parse::operational_fec(&output).ok_or_else(|| {
            Error::unexpected(format!(
                "Cannot recognize Forward Error Correction status on port {port}"
            ))
        })
    }

    async fn set_fec(&mut self, port: &str, mode: FecMode) -> Result<bool> {
        DIALECT.ports.ensure_either(port)?;
        let mut lines = commands::interface(port);
        lines.extend(lines![commands::fec_encoding(mode), "end"]);
        self.session.send_command_list(&lines).await?;
        Ok(self.get_fec(port).await? == Some(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::testing::{Call, CallLog, ScriptedConnection};
    use crate::types::VlanType;

    fn arista(replies: &[&str]) -> (Arista, CallLog) {
        let connection = ScriptedConnection::new().replies(replies.iter().copied());
        let log = connection.log();
        (Arista::new(Session::new(connection)), log)
    }

    const MAC_TABLE: &str = "\
Arista-1A>show mac address-table
Mac Address Table
------------------------------------------------------------------

Vlan Mac Address Type Ports Moves Last Move
---- ----------- ---- ----- ----- ---------
1 0000.0000.0314 DYNAMIC Et11/3/0 1 27 days, 20:34:21 ago
1 0000.0000.0315 DYNAMIC Et11/3/1 1 27 days, 20:34:21 ago
1 0000.0000.0316 DYNAMIC Et11/3/2 1 27 days, 20:34:21 ago";

    #[tokio::test]
    async fn test_get_port_by_mac() {
        let (mut switch, log) = arista(&[MAC_TABLE]);
        assert_eq!(
            switch.get_port_by_mac("00:00:00:00:03:14").await.unwrap(),
            "Et11/3/0"
        );
        assert_eq!(log.calls(), vec![Call::command("show mac address-table")]);
    }

    #[tokio::test]
    async fn test_get_port_by_mac_short_port_id() {
        let table = MAC_TABLE.replace("Et11/3/0", "Et123");
        let (mut switch, _) = arista(&[table.as_str()]);
        assert_eq!(switch.get_port_by_mac("00:00:00:00:03:14").await.unwrap(), "Et123");
    }

    #[tokio::test]
    async fn test_get_port_by_mac_empty_table() {
        let (mut switch, _) = arista(&[""]);
        let err = switch.get_port_by_mac("00:00:00:00:03:14").await.unwrap_err();
        assert!(err.to_string().contains("0000.0000.0314"));
    }

    #[tokio::test]
    async fn test_get_vlan_by_mac() {
        let (mut switch, _) = arista(&[MAC_TABLE]);
        assert_eq!(switch.get_vlan_by_mac("0000.0000.0316").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_port_speed() {
        let output = "
Port       Name   Status       Vlan     Duplex Speed  Type         Flags Encapsulation
Et19/1            notconnect   600      full   25G    40GBASE-CR4jf3418-18A2-tsw-30041#
";
        let (mut switch, _) = arista(&[output]);
        assert_eq!(switch.get_port_speed("Et19/1").await.unwrap(), 25000);
    }

    #[tokio::test]
    async fn test_get_port_speed_corrupted_output() {
        let output = "
Port       Name   Status       Vlan     Duplex Speed  Type         Flags Encapsulation
Et19/1          ###################################sw-30041#
";
        let (mut switch, _) = arista(&[output]);
        let err = switch.get_port_speed("Et19/1").await.unwrap_err();
        assert!(err.to_string().contains("Couldn't retrieve port speed for port"));
    }

    #[tokio::test]
    async fn test_default_ports_restores_speed() {
        let config = "interface Ethernet9/1\n   speed forced 100\n   no error-correction encoding";
        let (mut switch, log) = arista(&[config]);
        switch.default_ports("Eth9/1").await.unwrap();
        assert_eq!(
            log.last(),
            Some(Call::list(&[
                "configure terminal",
                "default interface Eth9/1",
                "interface Eth9/1",
                "default switchport",
                "default mtu",
                "speed forced 100",
            ]))
        );
    }

    #[tokio::test]
    async fn test_default_ports_rejects_bad_syntax() {
        let (mut switch, log) = arista(&[]);
        assert!(switch.default_ports("Gi1/0/1").await.is_err());
        assert!(log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_configure_vlan() {
        let (mut switch, log) = arista(&[]);
        let config = VlanConfig::new("Et3/1", 11, VlanType::Tagged, SwitchportMode::Trunk);
        switch.configure_vlan(&config).await.unwrap();
        assert_eq!(
            log.last(),
            Some(Call::list(&[
                "configure terminal",
                "vlan 11",
                "exit",
                "interface Et3/1",
                "switchport",
                "switchport trunk allowed vlan add 11",
                "switchport mode trunk",
                "spanning-tree portfast trunk",
                "no shutdown",
            ]))
        );
    }

    #[tokio::test]
    async fn test_disable_fec() {
        let output = "
Interface           Configured              Available        Operational
----------------    --------------------    --------------   -----------
Ethernet3/1         Default                 Reed-Solomon     Disabled
";
        let (mut switch, log) = arista(&["", output]);
        assert!(switch.disable_fec("Ethernet3/1").await.unwrap());
        assert_eq!(
            log.calls()[0],
            Call::list(&[
                "configure terminal",
                "interface Ethernet3/1",
                "no error-correction encoding",
                "end",
            ])
        );

        let still_on = output.replace("Disabled", "Reed-Solomon");
        let (mut switch, _) = arista(&["", still_on.as_str()]);
        assert!(!switch.disable_fec("Ethernet3/1").await.unwrap());
    }

    #[tokio::test]
    async fn test_disable_fec_unrecognised_output() {
        let (mut switch, _) = arista(&["", ""]);
        let err = switch.disable_fec("Ethernet3/1").await.unwrap_err();
        assert!(err.to_string().contains("Cannot recognize Forward Error Correction status"));
    }

    #[tokio::test]
    async fn test_port_channel_lifecycle() {
        let (mut switch, log) = arista(&[]);
        switch.create_port_channel_interface(1024).await.unwrap();
        switch.remove_port("port-channel 82").await.unwrap();
        switch
            .add_port_to_channel_group("Ethernet 15/1", 1555, Some(ChannelGroupMode::Passive), false)
            .await
            .unwrap();
        switch.remove_port_from_port_channel("Et12/1").await.unwrap();

        assert_eq!(
            log.calls(),
            vec![
                Call::list(&["configure terminal", "interface port-channel 1024", "end"]),
                Call::list(&["configure terminal", "no interface port-channel 82", "end"]),
                Call::list(&[
                    "configure terminal",
                    "interface Ethernet 15/1",
                    "channel-group 1555 mode passive",
                    "end",
                ]),
                Call::list(&["configure terminal", "interface Et12/1"]),
                Call::list(&["no channel-group", "end"]),
            ]
        );
    }

    #[tokio::test]
    async fn test_port_channel_number_range() {
        let (mut switch, log) = arista(&[]);
        for number in [0, 2001] {
            let err = switch.create_port_channel_interface(number).await.unwrap_err();
            assert!(
                err.to_string()
                    .contains("Port channel interface number should be integer in range 1-2000")
            );
        }
        assert!(log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_show_port_channel() {
        let (mut switch, _) = arista(&["Port Channel Port-Channel111:\n  No Active Ports"; 7]);
        for invalid in [
            "port-channe",
            "port-channel ",
            "port-channel111,222",
            "port-channel, 111,222",
            "port-channel ,111,222",
            "port-channel 111,222,",
        ] {
            let err = switch.show_port_channel(invalid).await.unwrap_err();
            assert!(err.to_string().contains(&format!("Port is not in port-channel syntax! {invalid}")));
        }
        for valid in [
            "port-channel",
            "port-channel 111,222",
            "port-channel 111, 222",
            "port-channel 111,    222",
            "port-channel    111,222",
            "pOrT-cHaNnEl",
        ] {
            assert!(switch.show_port_channel(valid).await.is_ok(), "{valid}");
        }
    }

    #[tokio::test]
    async fn test_shutdown_and_flap() {
        let (mut switch, log) = arista(&[]);
        switch.disable_port("Et11/3/0", 5).await.unwrap();
        assert_eq!(log.calls().len(), 5);
        assert_eq!(
            log.last(),
            Some(Call::list(&["configure terminal", "interface Et11/3/0", "shutdown"]))
        );

        switch.shutdown(false, "Et11/3/0").await.unwrap();
        assert_eq!(
            log.last(),
            Some(Call::list(&["configure terminal", "interface Et11/3/0", "no shutdown"]))
        );
    }

    #[tokio::test]
    async fn test_is_port_linkup() {
        let (mut switch, log) = arista(&[
            "Ethernet15/1       Up     linkUp   linkUp                     0:42:01 ago",
            "Ethernet15/1       Up     linkDown linkDown                   0:42:01 ago",
            "% Invalid input",
        ]);
        assert_eq!(switch.is_port_linkup("Et15/1").await.unwrap(), Some(true));
        assert_eq!(switch.is_port_linkup("Et15/1").await.unwrap(), Some(false));
        let err = switch.is_port_linkup("Et15/1").await.unwrap_err();
        assert!(
            err.to_string()
                .contains("Link status parsing error on: Arista; interface: Et15/1")
        );
        assert_eq!(log.calls()[0], Call::command("show interfaces Et15/1 phy"));
    }

    #[tokio::test]
    async fn test_show_vlans_and_running_config() {
        let (mut switch, log) = arista(&[]);
        switch.show_vlans(&[1, 123]).await.unwrap();
        switch.show_vlans(&[]).await.unwrap();
        switch.show_port_running_config("Et15/1").await.unwrap();
        assert_eq!(
            log.calls(),
            vec![
                Call::command("show vlan 1,123"),
                Call::command("show vlan"),
                Call::command("show running-config interfaces Et15/1"),
            ]
        );
    }

    #[tokio::test]
    async fn test_configure_pfc_userspace() {
        let (mut switch, log) = arista(&[]);
        switch.configure_pfc_userspace("Et1/1").await.unwrap();

        let calls = log.calls();
        assert_eq!(calls[0], Call::config(&["dcbx ets qos map cos 3 traffic-class 1"]));
        assert_eq!(calls[1], Call::config(&["dcbx ets traffic-class 1 bandwidth 100"]));
        assert_eq!(calls[2], Call::config(&["interface Et1/1", "lldp transmit", "lldp receive"]));
        assert_eq!(
            calls[3],
            Call::config(&[
                "interface Et1/1",
                "switchport mode trunk",
                "switchport trunk allowed vlan all",
            ])
        );
        assert_eq!(calls[4], Call::config(&["interface Et1/1", "dcbx mode ieee"]));
        assert_eq!(
            calls[5],
            Call::config(&["interface Et1/1", "flowcontrol send off", "flowcontrol receive off"])
        );
        assert_eq!(calls.len(), 7);
    }

    #[tokio::test]
    async fn test_disable_pfc_userspace() {
        let (mut switch, log) = arista(&[]);
        switch.disable_pfc_userspace("ethernet 1/1").await.unwrap();
        assert_eq!(
            log.calls(),
            vec![
                Call::config(&["default interface ethernet 1/1"]),
                Call::config(&["no dcbx ets traffic-class 1 bandwidth 100"]),
                Call::config(&["no dcbx ets qos map cos 3 traffic-class 1"]),
            ]
        );
    }

    #[tokio::test]
    async fn test_port_scoped_operations_reject_bad_port_names() {
        let (mut switch, log) = arista(&[]);
        for port in ["", "Gi1/0/1; reload", "not a port", "Et1/1/1/1"] {
            for err in [
                switch.shutdown(true, port).await.unwrap_err(),
                switch.is_port_linkup(port).await.unwrap_err(),
                switch.get_port_speed(port).await.unwrap_err(),
                switch.set_port_flowcontrol(port, true, true).await.unwrap_err(),
                switch.configure_lldp(port, &[]).await.unwrap_err(),
                switch.set_port_dcbx_version(port, DcbxVersion::Ieee).await.unwrap_err(),
                switch.set_port_pfc_by_tc(port, 3, PfcMode::On).await.unwrap_err(),
                switch.get_fec(port).await.unwrap_err(),
                switch.set_fec(port, FecMode::NoFec).await.unwrap_err(),
                switch.show_port_running_config(port).await.unwrap_err(),
            ] {
                assert!(matches!(err, Error::Validation(_)), "{port}: {err}");
            }
        }
        assert!(log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dcbx_maps_reject_bad_traffic_classes() {
        let (mut switch, log) = arista(&[]);
        let err = switch
            .configure_dcbx_ets_traffic_class(&[(200, 50)], false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Traffic class should be integer in range 0-7, got 200"));
        assert!(matches!(
            switch
                .configure_dcbx_ets_traffic_class(&[(1, 40), (1, 40)], false)
                .await,
            Err(Error::Validation(ValidationError::Duplicate { value: 1, .. }))
        ));
        assert!(switch.configure_dcbx_qos_map(&[(3, 8)], false).await.is_err());
        assert!(switch.configure_dcbx_qos_map(&[(3, 1), (3, 2)], false).await.is_err());
        assert!(log.calls().is_empty());

        switch
            .configure_dcbx_qos_map(&[(3, 1), (4, 1)], false)
            .await
            .unwrap();
        assert_eq!(log.calls().len(), 1);
    }
}
